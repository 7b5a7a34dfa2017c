//! Channel Surface
//!
//! Adapter that turns every presentation call into a [`SurfaceCommand`] on a
//! tokio channel. Used when the renderer lives in another task or behind a
//! bridge (the headless runner, a WebSocket relay, tests).

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::traits::PresentationAdapter;
use crate::animation::{ReelGeometry, ReelMotion};
use crate::error::AdapterError;
use crate::messages::{StatusMessage, SurfaceCommand};
use crate::patterns::Pattern;

/// Default command buffer between engine and renderer
const DEFAULT_CAPACITY: usize = 100;

/// Presentation adapter backed by an mpsc channel
///
/// The receiving side cannot report measurements back, so reel geometry is
/// either fixed with [`ChannelSurface::with_geometry`] or derived from the
/// engine's extent hint.
#[derive(Clone, Debug)]
pub struct ChannelSurface {
    tx: mpsc::Sender<SurfaceCommand>,
    geometry: Option<ReelGeometry>,
}

impl ChannelSurface {
    /// Create a surface and the receiver its commands arrive on
    #[must_use]
    pub fn new_pair() -> (Self, mpsc::Receiver<SurfaceCommand>) {
        Self::new_pair_with_capacity(DEFAULT_CAPACITY)
    }

    /// Create with custom channel capacity
    #[must_use]
    pub fn new_pair_with_capacity(capacity: usize) -> (Self, mpsc::Receiver<SurfaceCommand>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx, geometry: None }, rx)
    }

    /// Report this geometry for every reel instead of the extent hint
    #[must_use]
    pub fn with_geometry(mut self, geometry: ReelGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Whether the renderer is still listening
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.tx.is_closed()
    }

    async fn send(&self, command: SurfaceCommand) -> Result<(), AdapterError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| AdapterError::Unavailable("surface channel closed".to_string()))
    }
}

#[async_trait]
impl PresentationAdapter for ChannelSurface {
    async fn render_spinning_state(
        &self,
        slot: usize,
        item_extent_hint: f32,
    ) -> Result<ReelGeometry, AdapterError> {
        self.send(SurfaceCommand::PrepareReel {
            slot,
            item_extent_hint,
        })
        .await?;
        Ok(self
            .geometry
            .unwrap_or_else(|| ReelGeometry::uniform(item_extent_hint)))
    }

    async fn animate_to(&self, slot: usize, motion: ReelMotion) -> Result<(), AdapterError> {
        self.send(SurfaceCommand::AnimateReel { slot, motion }).await
    }

    async fn render_result(&self, slot: usize, pattern: &Pattern) -> Result<(), AdapterError> {
        self.send(SurfaceCommand::ShowResult {
            slot,
            pattern: pattern.clone(),
        })
        .await
    }

    async fn set_status(&self, status: &StatusMessage) -> Result<(), AdapterError> {
        self.send(SurfaceCommand::status(status.clone())).await
    }

    async fn set_controls_enabled(&self, enabled: bool) -> Result<(), AdapterError> {
        self.send(SurfaceCommand::ControlsEnabled { enabled }).await
    }

    async fn set_highlight(&self, slot: usize, on: bool) -> Result<(), AdapterError> {
        self.send(SurfaceCommand::Highlight { slot, on }).await
    }
}
