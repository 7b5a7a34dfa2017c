//! User Intents
//!
//! What a surface sends up when the user presses something. Surfaces do not
//! interpret the press; they report it and the widget decides whether it may
//! run (see [`ControlGate`](crate::gate::ControlGate)).

use serde::{Deserialize, Serialize};

use crate::error::Operation;
use crate::patterns::PatternId;

/// Button presses routed from a surface to the widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserIntent {
    /// The spin button
    Spin,
    /// The play-all button
    PlayAll,
    /// A "listen" button on a result or in the rhythm guide
    Preview {
        /// Pattern to play
        pattern: PatternId,
    },
}

impl UserIntent {
    /// Gated operation this intent maps to
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::Spin => Operation::Spin,
            Self::PlayAll => Operation::PlayAll,
            Self::Preview { .. } => Operation::Preview,
        }
    }

    /// Parse the wire form sent by a web bridge
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe an intent.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
