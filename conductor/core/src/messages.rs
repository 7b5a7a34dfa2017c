//! Surface Commands
//!
//! Messages sent from the engine to the presentation surface. These represent
//! everything the engine can ask a UI to do: prepare and animate reels, show
//! results, update the status line, toggle controls and highlight a reel.
//!
//! # Design Philosophy
//!
//! The surface is a pure renderer. It never decides what a spin lands on or
//! when a beat happens; it draws what it is told. Commands are plain serde
//! types so a web bridge can forward them as JSON.

use serde::{Deserialize, Serialize};

use crate::animation::ReelMotion;
use crate::patterns::Pattern;

/// Status line shown above the reels
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMessage {
    /// Widget mounted, nothing in flight
    Ready,
    /// Reels are spinning
    Spinning,
    /// A spin or playback finished
    Stopped,
    /// Countdown beat (1-based)
    Counting {
        /// Beat number
        beat: u32,
    },
    /// Pattern phase of the sequential playback
    Playing,
    /// An operation was aborted
    Error(String),
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "¡Listo!"),
            Self::Spinning => write!(f, "¡Girando...! 🥁"),
            Self::Stopped => write!(f, "¡Stop!"),
            Self::Counting { beat } => write!(f, "🎵 Contando... {beat}"),
            Self::Playing => write!(f, "🎶 ¡Solfeo Rítmico!"),
            Self::Error(reason) => write!(f, "⚠️ {reason}"),
        }
    }
}

/// Commands from the engine to the surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SurfaceCommand {
    /// Reset a reel to its full strip, ready to spin
    PrepareReel {
        /// Reel slot (0-3)
        slot: usize,
        /// Glyph size to assume if the surface cannot measure
        item_extent_hint: f32,
    },

    /// Start a reel transition
    AnimateReel {
        /// Reel slot (0-3)
        slot: usize,
        /// Offsets, duration and easing
        motion: ReelMotion,
    },

    /// Replace a reel with its static result and a "listen" button
    ShowResult {
        /// Reel slot (0-3)
        slot: usize,
        /// The pattern the reel landed on
        pattern: Pattern,
    },

    /// Update the status line
    Status {
        /// Structured status
        status: StatusMessage,
        /// Rendered text
        text: String,
    },

    /// Enable or disable every user control
    ControlsEnabled {
        /// New state
        enabled: bool,
    },

    /// Turn a reel's highlight on or off
    Highlight {
        /// Reel slot (0-3)
        slot: usize,
        /// Highlight state
        on: bool,
    },
}

impl SurfaceCommand {
    /// Status command with its rendered text
    #[must_use]
    pub fn status(status: StatusMessage) -> Self {
        let text = status.to_string();
        Self::Status { status, text }
    }

    /// Wire form for a web bridge
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the wire form
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a command.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
