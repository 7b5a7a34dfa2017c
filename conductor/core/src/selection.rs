//! Selection State
//!
//! The four pattern ids currently shown on the reels. The state lives behind a
//! cloneable [`SelectionState`] handle that is passed explicitly to the spin
//! orchestrator (the only writer) and to the playback conductor and the
//! surface (readers). Writes replace all four slots in one assignment, so a
//! reader never sees a half-updated selection.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::OutOfRangeError;
use crate::patterns::{PatternId, PatternRegistry};

/// Number of reels on the machine
pub const REEL_COUNT: usize = 4;

/// One pattern id per reel slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection(pub [PatternId; REEL_COUNT]);

impl Selection {
    /// Pattern id in a slot
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<PatternId> {
        self.0.get(slot).copied()
    }

    /// Slot/pattern pairs in reel order
    pub fn iter(&self) -> impl Iterator<Item = (usize, PatternId)> + '_ {
        self.0.iter().copied().enumerate()
    }

    /// Check every slot against the catalog
    ///
    /// # Errors
    ///
    /// Returns the first slot value that is not a catalog index.
    pub fn validate(&self, registry: &PatternRegistry) -> Result<(), OutOfRangeError> {
        for id in self.0 {
            registry.get(id)?;
        }
        Ok(())
    }
}

impl From<[PatternId; REEL_COUNT]> for Selection {
    fn from(ids: [PatternId; REEL_COUNT]) -> Self {
        Self(ids)
    }
}

/// Shared handle to the current selection
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    inner: Arc<RwLock<Selection>>,
}

impl SelectionState {
    /// New state with every slot on pattern 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current selection
    #[must_use]
    pub fn snapshot(&self) -> Selection {
        *self.inner.read()
    }

    /// Replace all four slots at once.
    ///
    /// Only the spin orchestrator commits; it validates ids before calling.
    pub(crate) fn commit(&self, selection: Selection) {
        *self.inner.write() = selection;
    }
}
