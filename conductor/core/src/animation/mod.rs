//! Reel Motion
//!
//! Surface-agnostic description of a reel's spin. The engine decides where a
//! strip starts, where it stops and how long the trip takes; surfaces only
//! translate a [`ReelMotion`] into their native transform.
//!
//! # Strip Layout
//!
//! A reel strip is the catalog's glyphs repeated end to end. Offsets are
//! negative translations along the strip axis, in the surface's own units:
//!
//! ```text
//! offset 0 ─┬─ glyph 0
//!           ├─ glyph 1
//!           │   ...
//!           ├─ glyph N-1
//!           ├─ glyph 0      (second cycle)
//!           │   ...
//! ```
//!
//! Stopping at `-(cycles * N + outcome) * item_extent` leaves glyph `outcome`
//! in view after `cycles` full turns.

mod timing;

pub use timing::EasingFunction;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::patterns::PatternId;

/// Measured size of one reel, reported by the surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReelGeometry {
    /// Rendered size of a single glyph along the strip axis
    pub item_extent: f32,
    /// Visible window of the reel along the strip axis
    pub viewport_extent: f32,
}

impl ReelGeometry {
    /// Geometry where the window shows exactly one glyph
    #[must_use]
    pub fn uniform(item_extent: f32) -> Self {
        Self {
            item_extent,
            viewport_extent: item_extent,
        }
    }

    /// Offset that parks the strip one full cycle in, with the glyph aligned
    /// to the bottom of the window so nothing from the result is visible yet
    #[must_use]
    pub fn start_offset(&self, pattern_count: usize) -> f32 {
        let margin = (self.viewport_extent - self.item_extent).max(0.0);
        -(pattern_count as f32 * self.item_extent + margin)
    }

    /// Offset that lands `outcome` in the window after `total_cycles` turns
    #[must_use]
    pub fn stop_offset(&self, pattern_count: usize, total_cycles: u32, outcome: PatternId) -> f32 {
        let travelled = total_cycles as f32 * pattern_count as f32 + outcome as f32;
        -(travelled * self.item_extent)
    }
}

/// A single reel transition, from one offset to another
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReelMotion {
    /// Offset before the transition starts
    pub from: f32,
    /// Offset once the transition ends
    pub to: f32,
    /// Transition length in milliseconds
    pub duration_ms: u64,
    /// Easing curve
    pub easing: EasingFunction,
}

impl ReelMotion {
    /// Transition of a given length
    #[must_use]
    pub fn new(from: f32, to: f32, duration: Duration, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            easing,
        }
    }

    /// Transition length
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Offset after `elapsed` of the transition
    #[must_use]
    pub fn offset_at(&self, elapsed: Duration) -> f32 {
        if self.duration_ms == 0 {
            return self.to;
        }
        let progress = elapsed.as_secs_f32() / self.duration().as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Whether the strip moves forward (towards more negative offsets)
    #[must_use]
    pub fn moves_forward(&self) -> bool {
        self.to < self.from
    }
}
