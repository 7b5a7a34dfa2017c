//! Audio Playback
//!
//! The [`AudioPlayer`] owns one handle per cue (the metronome tic and each
//! pattern's demonstration) and enforces exclusivity: starting a cue stops the
//! cue already sounding in its domain. Media output sits behind the
//! [`AudioBackend`] trait so the engine runs the same against browser audio,
//! a native mixer or the [`SilentBackend`].
//!
//! # Usage
//!
//! ```ignore
//! use rhythm_slot_core::audio::{AudioPlayer, Cue, CueExclusivity, SilentBackend};
//!
//! let player = AudioPlayer::new(Arc::new(SilentBackend::new()), registry, CueExclusivity::Shared);
//! player.preload();
//! player.play_cue(Cue::Metronome);
//! player.play_cue(Cue::Pattern(3)); // stops the tic first
//! ```

mod player;
mod silent;
mod traits;

pub use player::{AudioPlayer, Cue, CueExclusivity, CueFailure};
pub use silent::SilentBackend;
pub use traits::{AudioBackend, CueHandle};
