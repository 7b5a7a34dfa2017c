//! Audio Backend Traits
//!
//! Trait definitions for the media layer underneath the [`AudioPlayer`]. The
//! player only needs to load a cue once and then start or stop it; how the
//! media is decoded and routed (HTML audio elements, a native mixer, nothing
//! at all) is up to the implementation.
//!
//! [`AudioPlayer`]: super::AudioPlayer

use std::sync::Arc;

use crate::error::PlaybackError;

/// A loaded audio cue
pub trait CueHandle: Send + Sync {
    /// Start the cue from its beginning
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] if the media refuses to play (not ready,
    /// blocked by the host, decoding failure).
    fn play(&self) -> Result<(), PlaybackError>;

    /// Halt the cue and rewind it to the start
    fn stop(&self);

    /// Whether the cue is currently audible
    fn is_playing(&self) -> bool;
}

/// Media layer that turns asset references into playable cues
pub trait AudioBackend: Send + Sync {
    /// Backend name for logs (e.g., "html-audio", "silent")
    fn name(&self) -> &str;

    /// Resolve an asset reference to a playable handle
    ///
    /// # Errors
    ///
    /// Returns a [`PlaybackError`] if the asset cannot be loaded.
    fn load(&self, asset_ref: &str) -> Result<Arc<dyn CueHandle>, PlaybackError>;
}
