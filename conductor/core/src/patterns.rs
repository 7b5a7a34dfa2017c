//! Pattern Registry
//!
//! The fixed catalog of rhythmic patterns. Each entry carries the visual glyph
//! shown on the reels, a display name, and the audio demonstration cue. The
//! catalog is built once and never mutated; ids are the catalog indices
//! `0..N`.
//!
//! Random draws go through [`RandomSource`] so callers decide where the
//! randomness comes from. Production code wraps a `StdRng`; tests inject
//! fixed sequences.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::OutOfRangeError;

/// Index of a pattern in the catalog
pub type PatternId = usize;

/// Display names of the reference catalog, in id order
const REFERENCE_NAMES: [&str; 9] = [
    "Dos Corcheas",
    "Corchea con Puntillo y Semicorchea",
    "Dos Semicorcheas y Corchea",
    "Semicorchea y Corchea con Puntillo",
    "Semicorchea, Corchea y Semicorchea",
    "Cuatro Semicorcheas",
    "Tresillo de Corcheas",
    "Corchea y Dos Semicorcheas",
    "Negra",
];

/// A rhythmic figure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Catalog index
    pub id: PatternId,
    /// Opaque reference to the glyph image
    pub visual_asset_ref: String,
    /// Human-readable name
    pub display_name: String,
    /// Opaque reference to the demonstration cue
    pub audio_asset_ref: String,
}

/// Source of uniformly distributed indices
pub trait RandomSource: Send {
    /// Draw an index in `[0, bound)`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// [`RandomSource`] backed by any `rand` generator
#[derive(Debug)]
pub struct RngSource<R: RngCore + Send>(R);

impl RngSource<StdRng> {
    /// Entropy-seeded generator
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Reproducible generator
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore + Send> RngSource<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl<R: RngCore + Send> RandomSource for RngSource<R> {
    fn next_index(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}

/// Immutable pattern catalog plus the metronome cue
#[derive(Clone, Debug)]
pub struct PatternRegistry {
    patterns: Arc<[Pattern]>,
    metronome_asset_ref: String,
}

impl PatternRegistry {
    /// Build a registry from catalog entries, renumbering ids by position.
    ///
    /// Returns `None` for an empty catalog.
    #[must_use]
    pub fn new(patterns: Vec<Pattern>, metronome_asset_ref: impl Into<String>) -> Option<Self> {
        if patterns.is_empty() {
            return None;
        }
        let patterns: Vec<Pattern> = patterns
            .into_iter()
            .enumerate()
            .map(|(id, pattern)| Pattern { id, ..pattern })
            .collect();
        Some(Self {
            patterns: patterns.into(),
            metronome_asset_ref: metronome_asset_ref.into(),
        })
    }

    /// The nine-pattern reference catalog with assets under the given
    /// directories (`images/00.png`, `sounds/s_00.mp3`, `sounds/metronome.mp3`)
    #[must_use]
    pub fn reference(image_dir: &str, sound_dir: &str) -> Self {
        let patterns = REFERENCE_NAMES
            .iter()
            .enumerate()
            .map(|(id, name)| Pattern {
                id,
                visual_asset_ref: format!("{image_dir}{id:02}.png"),
                display_name: (*name).to_string(),
                audio_asset_ref: format!("{sound_dir}s_{id:02}.mp3"),
            })
            .collect::<Vec<_>>();

        Self {
            patterns: patterns.into(),
            metronome_asset_ref: format!("{sound_dir}metronome.mp3"),
        }
    }

    /// Look up a pattern
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `id` is not a catalog index.
    pub fn get(&self, id: PatternId) -> Result<&Pattern, OutOfRangeError> {
        self.patterns.get(id).ok_or(OutOfRangeError {
            id,
            len: self.patterns.len(),
        })
    }

    /// Draw a pattern id uniformly from the catalog
    pub fn random_pattern_id(&self, source: &mut dyn RandomSource) -> PatternId {
        // Clamp so a misbehaving source cannot break the catalog invariant.
        source.next_index(self.patterns.len()).min(self.patterns.len() - 1)
    }

    /// Number of patterns (`N`)
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Always false; empty catalogs are rejected at construction
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `id` is a catalog index
    #[must_use]
    pub fn contains(&self, id: PatternId) -> bool {
        id < self.patterns.len()
    }

    /// Iterate the catalog in id order
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// Asset reference of the metronome tic
    #[must_use]
    pub fn metronome_asset_ref(&self) -> &str {
        &self.metronome_asset_ref
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::reference("images/", "sounds/")
    }
}
