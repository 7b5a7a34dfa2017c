//! Engine Errors
//!
//! Error kinds raised by the spin/playback engine. They are split by how the
//! engine reacts to them:
//!
//! - [`OutOfRangeError`]: an invalid pattern id. Programmer error, fails fast.
//! - [`PlaybackError`]: a cue could not play. Recovered locally, logged, and
//!   published on the audio player's failure channel.
//! - [`AdapterError`]: the presentation surface is gone. Aborts the current
//!   spin or playback session after restoring the controls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;
use crate::patterns::PatternId;

/// A pattern id outside the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("pattern id {id} is out of range (catalog has {len} patterns)")]
pub struct OutOfRangeError {
    /// The rejected id
    pub id: PatternId,
    /// Catalog size at the time of the lookup
    pub len: usize,
}

/// A cue failed to start
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Media for the cue is not loaded yet
    #[error("cue {asset} is not ready")]
    NotReady {
        /// Asset reference of the cue
        asset: String,
    },

    /// The audio backend refused to play the cue
    #[error("audio backend failed on {asset}: {reason}")]
    Backend {
        /// Asset reference of the cue
        asset: String,
        /// Backend-provided reason
        reason: String,
    },

    /// The cue does not map to any catalog entry
    #[error("no cue for pattern id {0}")]
    UnknownCue(PatternId),
}

/// The presentation surface could not carry out a command
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// Render target missing or surface disconnected
    #[error("presentation surface unavailable: {0}")]
    Unavailable(String),
}

/// User-initiated operations guarded by the control gate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Reel spin
    Spin,
    /// Countdown plus sequential playback
    PlayAll,
    /// Single cue preview ("listen" button)
    Preview,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spin => write!(f, "spin"),
            Self::PlayAll => write!(f, "play-all"),
            Self::Preview => write!(f, "preview"),
        }
    }
}

/// Errors returned by widget operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid pattern id
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    /// Presentation surface failure; the operation was aborted
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Another operation holds the controls
    #[error("{requested} rejected: controls are disabled while {active} is running")]
    Busy {
        /// Operation that was rejected
        requested: Operation,
        /// Operation currently holding the gate
        active: Operation,
    },

    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Whether the error came from the control gate rejecting the request
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
