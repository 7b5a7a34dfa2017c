//! Silent backend for headless runs. Cues keep a playing flag and log their
//! transitions but produce no sound.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::traits::{AudioBackend, CueHandle};
use crate::error::PlaybackError;

/// Backend whose cues only exist in the logs
#[derive(Debug, Default)]
pub struct SilentBackend;

impl SilentBackend {
    /// Create a silent backend
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug)]
struct SilentCue {
    asset_ref: String,
    playing: AtomicBool,
}

impl CueHandle for SilentCue {
    fn play(&self) -> Result<(), PlaybackError> {
        self.playing.store(true, Ordering::SeqCst);
        tracing::debug!(asset = %self.asset_ref, "cue started");
        Ok(())
    }

    fn stop(&self) {
        if self.playing.swap(false, Ordering::SeqCst) {
            tracing::debug!(asset = %self.asset_ref, "cue stopped");
        }
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl AudioBackend for SilentBackend {
    fn name(&self) -> &str {
        "silent"
    }

    fn load(&self, asset_ref: &str) -> Result<Arc<dyn CueHandle>, PlaybackError> {
        Ok(Arc::new(SilentCue {
            asset_ref: asset_ref.to_string(),
            playing: AtomicBool::new(false),
        }))
    }
}
