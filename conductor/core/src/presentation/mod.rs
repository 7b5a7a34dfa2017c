//! Presentation Surfaces
//!
//! The engine never touches a UI directly. Everything visible goes through
//! the [`PresentationAdapter`] trait: reel preparation and animation, result
//! rendering, the status line, control enablement and reel highlights.
//!
//! # Available Surfaces
//!
//! - **ChannelSurface**: forwards [`SurfaceCommand`]s over a tokio channel to
//!   whatever renders them (a web bridge, a terminal, a test harness)
//!
//! # Usage
//!
//! ```ignore
//! use rhythm_slot_core::presentation::ChannelSurface;
//!
//! let (surface, mut commands) = ChannelSurface::new_pair();
//! tokio::spawn(async move {
//!     while let Some(command) = commands.recv().await {
//!         bridge.push(command.to_json()?);
//!     }
//! });
//! ```
//!
//! [`SurfaceCommand`]: crate::messages::SurfaceCommand

mod channel;
mod traits;

pub use channel::ChannelSurface;
pub use traits::{PresentationAdapter, DEFAULT_ITEM_EXTENT};
