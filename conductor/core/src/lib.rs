//! Rhythm Slot Core - Spin, Reveal and Playback Engine
//!
//! This crate provides the engine behind the rhythm slot-machine widget: four
//! reels that land on random rhythmic patterns, and a metronome-paced
//! demonstration of the patterns they landed on. It is independent of any UI
//! framework; a browser, a terminal or a test harness renders it through the
//! [`PresentationAdapter`] trait.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Surfaces                                │
//! │   ┌──────────────┐   ┌──────────────┐   ┌────────────────────┐  │
//! │   │  Web bridge  │   │   Terminal   │   │ Headless / Tests   │  │
//! │   └──────┬───────┘   └──────┬───────┘   └─────────┬──────────┘  │
//! │          └──────────────────┴─────────────────────┘             │
//! │                             │                                    │
//! │                   UserIntent (up)                                │
//! │                 SurfaceCommand (down)                            │
//! └─────────────────────────────┼────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┼────────────────────────────────────┐
//! │                      RHYTHM SLOT CORE                            │
//! │  ┌──────────────────────────┴─────────────────────────────────┐  │
//! │  │                     RhythmWidget                            │  │
//! │  │  ┌────────────┐  ┌─────────────┐  ┌──────────┐  ┌────────┐ │  │
//! │  │  │    Spin    │  │  Playback   │  │  Audio   │  │ Control│ │  │
//! │  │  │Orchestrator│  │  Conductor  │  │  Player  │  │  Gate  │ │  │
//! │  │  └─────┬──────┘  └──────┬──────┘  └──────────┘  └────────┘ │  │
//! │  │        └──── Selection ─┘         Pattern Registry          │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`RhythmWidget`]: The mounted widget, entry point for every user action
//! - [`SpinOrchestrator`]: Random outcomes, timed reel animation, atomic commit
//! - [`PlaybackConductor`]: Countdown and sequential playback on a beat grid
//! - [`AudioPlayer`]: Exclusive cue playback over an [`AudioBackend`]
//! - [`PatternRegistry`]: The immutable pattern catalog
//! - [`SelectionState`]: The four pattern ids on the reels
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use rhythm_slot_core::{load_config, ChannelSurface, RhythmWidget, SilentBackend, UserIntent};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let (surface, mut commands) = ChannelSurface::new_pair();
//!     tokio::spawn(async move {
//!         while let Some(command) = commands.recv().await {
//!             // Render the command
//!         }
//!     });
//!
//!     let widget = RhythmWidget::from_config(
//!         &config,
//!         Arc::new(surface),
//!         Arc::new(SilentBackend::new()),
//!     )?;
//!     widget.mount().await?;
//!     widget.handle_intent(UserIntent::Spin).await?;
//!     widget.handle_intent(UserIntent::PlayAll).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`animation`]: Reel geometry, motion and easing
//! - [`audio`]: Cue playback and the audio backend traits
//! - [`conductor`]: Sequential playback
//! - [`config`]: Layered configuration (defaults, TOML, environment)
//! - [`error`]: Error types
//! - [`events`]: Intents from surfaces to the widget
//! - [`gate`]: Mutual exclusion over user operations
//! - [`messages`]: Commands from the widget to surfaces
//! - [`patterns`]: Pattern catalog and randomness
//! - [`presentation`]: The surface adapter trait and the channel surface
//! - [`selection`]: The shared selection
//! - [`spin`]: Reel spins
//! - [`widget`]: The widget facade

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod audio;
pub mod conductor;
pub mod config;
pub mod error;
pub mod events;
pub mod gate;
pub mod messages;
pub mod patterns;
pub mod presentation;
pub mod selection;
pub mod spin;
pub mod widget;

// Re-exports for convenience
pub use animation::{EasingFunction, ReelGeometry, ReelMotion};
pub use audio::{
    AudioBackend, AudioPlayer, Cue, CueExclusivity, CueFailure, CueHandle, SilentBackend,
};
pub use conductor::{PlaybackConductor, PlaybackPhase, PlaybackSession, PlaybackSettings};
pub use error::{AdapterError, EngineError, Operation, OutOfRangeError, PlaybackError};
pub use events::UserIntent;
pub use gate::{ControlGate, GatePass};
pub use messages::{StatusMessage, SurfaceCommand};
pub use patterns::{Pattern, PatternId, PatternRegistry, RandomSource, RngSource};
pub use presentation::{ChannelSurface, PresentationAdapter, DEFAULT_ITEM_EXTENT};
pub use selection::{Selection, SelectionState, REEL_COUNT};
pub use spin::{ReelSpinTask, SpinOrchestrator, SpinSettings};
pub use widget::{IntentOutcome, RhythmWidget};

// Config exports
pub use config::{
    load_config, load_config_from_path, ConfigError, ConfigOverrides, ConfigSource, WidgetConfig,
    WidgetToml,
};
