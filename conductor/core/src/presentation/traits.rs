//! Presentation Adapter Trait
//!
//! Implemented by the UI layer. Every call may fail with
//! [`AdapterError::Unavailable`] when the render target is missing or the
//! surface has gone away; the engine treats that as fatal for the current
//! operation.

use async_trait::async_trait;

use crate::animation::{ReelGeometry, ReelMotion};
use crate::error::AdapterError;
use crate::messages::StatusMessage;
use crate::patterns::Pattern;

/// Glyph size assumed when a surface cannot measure its reels
pub const DEFAULT_ITEM_EXTENT: f32 = 150.0;

/// What the engine needs from a UI
#[async_trait]
pub trait PresentationAdapter: Send + Sync {
    /// Reset a reel to its full strip, ready to spin
    ///
    /// Returns the reel's measured geometry; surfaces that cannot measure
    /// should answer with [`ReelGeometry::uniform`] of `item_extent_hint`.
    async fn render_spinning_state(
        &self,
        slot: usize,
        item_extent_hint: f32,
    ) -> Result<ReelGeometry, AdapterError>;

    /// Start a reel transition
    ///
    /// Returns once the transition is issued, not when it finishes. The
    /// engine owns the timing of the spin.
    async fn animate_to(&self, slot: usize, motion: ReelMotion) -> Result<(), AdapterError>;

    /// Show a reel's static result with its "listen" affordance
    async fn render_result(&self, slot: usize, pattern: &Pattern) -> Result<(), AdapterError>;

    /// Update the status line
    async fn set_status(&self, status: &StatusMessage) -> Result<(), AdapterError>;

    /// Enable or disable every user control
    async fn set_controls_enabled(&self, enabled: bool) -> Result<(), AdapterError>;

    /// Turn a reel's highlight on or off
    async fn set_highlight(&self, slot: usize, on: bool) -> Result<(), AdapterError>;
}
