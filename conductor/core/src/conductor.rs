//! Playback Conductor
//!
//! Plays the current selection at a fixed tempo: a metronome countdown, then
//! each reel's pattern in order with the reel highlighted.
//!
//! ```text
//! t0          t0+T        ...  t0+cT        t0+(c+1)T   ...  t0+(c+4)T
//! │ beat 1    │ beat 2         │ slot 0     │ slot 1         │ stopped
//! │ tic       │ tic            │ tic+cue 0  │ tic+cue 1      │
//! ```
//!
//! # Design Philosophy
//!
//! Steps sit on a fixed beat grid from `tokio::time::interval`, so step `k`
//! starts at `t0 + k * tempo` no matter how long the surface takes to draw.
//! Audio failures never break the grid; they are reported by the
//! [`AudioPlayer`] and the sequence moves on. A surface failure ends the
//! session: audio stops, the status shows the error and the controls come
//! back.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::time::{interval, MissedTickBehavior};

use crate::audio::{AudioPlayer, Cue};
use crate::config::{ConfigError, WidgetConfig};
use crate::error::{EngineError, Operation};
use crate::gate::ControlGate;
use crate::messages::StatusMessage;
use crate::presentation::PresentationAdapter;
use crate::selection::{Selection, SelectionState, REEL_COUNT};

/// Tempo and countdown length
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackSettings {
    /// Interval between steps
    pub tempo: Duration,
    /// Metronome beats before the first pattern
    pub countdown_beats: u32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::from(&WidgetConfig::default())
    }
}

impl From<&WidgetConfig> for PlaybackSettings {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            tempo: config.tempo(),
            countdown_beats: config.countdown_beats,
        }
    }
}

impl PlaybackSettings {
    /// Reject settings the beat grid cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero tempo.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tempo.is_zero() {
            return Err(ConfigError::ValidationError(
                "tempo must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Steps in one session (countdown plus one per reel)
    #[must_use]
    pub fn total_steps(&self) -> u32 {
        let reels = u32::try_from(REEL_COUNT).unwrap_or(u32::MAX);
        self.countdown_beats.saturating_add(reels)
    }

    /// Length of one session on the beat grid
    #[must_use]
    pub fn session_length(&self) -> Duration {
        self.tempo * self.total_steps()
    }
}

/// Phase of a playback session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Metronome-only beats
    Countdown,
    /// One step per reel
    Patterns,
}

/// Progress of the running play-all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSession {
    /// Current phase
    pub phase: PlaybackPhase,
    /// Steps started so far, across both phases
    pub step: u32,
    /// Countdown beat (1-based), 0 before the first beat
    pub beat: u32,
    /// Selection captured when the session started
    pub selection: Selection,
}

/// Runs play-all sessions
pub struct PlaybackConductor {
    selection: SelectionState,
    surface: Arc<dyn PresentationAdapter>,
    audio: Arc<AudioPlayer>,
    gate: ControlGate,
    settings: PlaybackSettings,
    session: Mutex<Option<PlaybackSession>>,
}

impl std::fmt::Debug for PlaybackConductor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackConductor")
            .field("settings", &self.settings)
            .field("session", &*self.session.lock())
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl PlaybackConductor {
    /// Create a conductor
    ///
    /// Pass the same `selection` and `gate` handles as the spin orchestrator.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the settings fail validation.
    pub fn new(
        selection: SelectionState,
        surface: Arc<dyn PresentationAdapter>,
        audio: Arc<AudioPlayer>,
        gate: ControlGate,
        settings: PlaybackSettings,
    ) -> Result<Self, EngineError> {
        settings.validate()?;
        Ok(Self {
            selection,
            surface,
            audio,
            gate,
            settings,
            session: Mutex::new(None),
        })
    }

    /// Playback settings in effect
    #[must_use]
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    /// Snapshot of the running session, if any
    #[must_use]
    pub fn current_session(&self) -> Option<PlaybackSession> {
        *self.session.lock()
    }

    /// Count in and play every reel's pattern
    ///
    /// Controls are disabled for the whole session and re-enabled exactly
    /// once before this returns. Dropping the future mid-session skips that:
    /// the gate reopens but the surface keeps its controls disabled and the
    /// session snapshot stays set until the next play-all.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Busy`] if another operation holds the controls
    /// - [`EngineError::Adapter`] if the surface failed mid-session
    pub async fn play_all(&self) -> Result<(), EngineError> {
        let pass = self.gate.try_acquire(Operation::PlayAll)?;

        let result = match self.surface.set_controls_enabled(false).await {
            Ok(()) => self.run().await,
            Err(e) => Err(e.into()),
        };
        *self.session.lock() = None;

        if let Err(err) = &result {
            tracing::error!(error = %err, "playback aborted");
            self.audio.stop_all();
            if let Err(e) = self
                .surface
                .set_status(&StatusMessage::Error(err.to_string()))
                .await
            {
                tracing::warn!(error = %e, "could not report playback failure");
            }
        }

        if let Err(e) = self.surface.set_controls_enabled(true).await {
            tracing::warn!(error = %e, "could not re-enable controls after playback");
        }
        pass.release();

        result
    }

    fn enter(&self, phase: PlaybackPhase, beat: u32) {
        if let Some(session) = self.session.lock().as_mut() {
            session.phase = phase;
            session.step += 1;
            session.beat = beat;
        }
    }

    async fn run(&self) -> Result<(), EngineError> {
        let selection = self.selection.snapshot();
        tracing::info!(
            selection = ?selection.0,
            tempo_ms = u64::try_from(self.settings.tempo.as_millis()).unwrap_or(u64::MAX),
            beats = self.settings.countdown_beats,
            "playback started"
        );
        *self.session.lock() = Some(PlaybackSession {
            phase: PlaybackPhase::Countdown,
            step: 0,
            beat: 0,
            selection,
        });

        let mut beats = interval(self.settings.tempo);
        beats.set_missed_tick_behavior(MissedTickBehavior::Burst);
        // The first tick completes immediately and marks t0
        beats.tick().await;

        for beat in 1..=self.settings.countdown_beats {
            self.enter(PlaybackPhase::Countdown, beat);
            tracing::debug!(beat, "countdown");
            self.surface
                .set_status(&StatusMessage::Counting { beat })
                .await?;
            self.audio.play_cue(Cue::Metronome);
            beats.tick().await;
        }

        self.surface.set_status(&StatusMessage::Playing).await?;
        for (slot, pattern) in selection.iter() {
            self.enter(PlaybackPhase::Patterns, self.settings.countdown_beats);
            tracing::debug!(slot, pattern, "pattern step");
            self.surface.set_highlight(slot, true).await?;
            self.audio.play_cue(Cue::Metronome);
            self.audio.play_cue(Cue::Pattern(pattern));
            beats.tick().await;
            self.surface.set_highlight(slot, false).await?;
        }

        self.surface.set_status(&StatusMessage::Stopped).await?;
        tracing::info!("playback finished");
        Ok(())
    }
}
