//! Rhythm Widget
//!
//! The single in-page instance that wires the catalog, the shared selection,
//! the audio player, the spin orchestrator and the playback conductor to one
//! presentation surface. A surface mounts it once, then forwards every button
//! press as a [`UserIntent`].

use std::sync::Arc;

use crate::audio::{AudioBackend, AudioPlayer, Cue};
use crate::conductor::{PlaybackConductor, PlaybackSettings};
use crate::config::WidgetConfig;
use crate::error::{EngineError, Operation};
use crate::events::UserIntent;
use crate::gate::ControlGate;
use crate::messages::StatusMessage;
use crate::patterns::{PatternId, PatternRegistry, RandomSource, RngSource};
use crate::presentation::PresentationAdapter;
use crate::selection::{Selection, SelectionState};
use crate::spin::{SpinOrchestrator, SpinSettings};

/// What a handled intent produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    /// A spin landed on this selection
    Spun(Selection),
    /// A play-all session finished
    Played,
    /// A preview cue started
    Previewed(PatternId),
}

/// The widget
pub struct RhythmWidget {
    registry: PatternRegistry,
    selection: SelectionState,
    surface: Arc<dyn PresentationAdapter>,
    audio: Arc<AudioPlayer>,
    gate: ControlGate,
    spinner: SpinOrchestrator,
    conductor: PlaybackConductor,
}

impl std::fmt::Debug for RhythmWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RhythmWidget")
            .field("selection", &self.selection.snapshot())
            .field("spinner", &self.spinner)
            .field("conductor", &self.conductor)
            .finish_non_exhaustive()
    }
}

impl RhythmWidget {
    /// Build a widget from resolved configuration
    ///
    /// Uses the reference catalog under the configured asset directories and
    /// a seeded generator when `config.seed` is set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn from_config(
        config: &WidgetConfig,
        surface: Arc<dyn PresentationAdapter>,
        backend: Arc<dyn AudioBackend>,
    ) -> Result<Self, EngineError> {
        let registry = PatternRegistry::reference(&config.image_dir, &config.sound_dir);
        let source: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        };
        Self::new(config, registry, surface, backend, source)
    }

    /// Build a widget over an explicit catalog and randomness source
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the configuration is invalid.
    pub fn new(
        config: &WidgetConfig,
        registry: PatternRegistry,
        surface: Arc<dyn PresentationAdapter>,
        backend: Arc<dyn AudioBackend>,
        source: Box<dyn RandomSource>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let selection = SelectionState::new();
        let gate = ControlGate::new();
        let audio = Arc::new(AudioPlayer::new(
            backend,
            registry.clone(),
            config.exclusivity,
        ));

        let spinner = SpinOrchestrator::new(
            registry.clone(),
            selection.clone(),
            Arc::clone(&surface),
            gate.clone(),
            source,
            SpinSettings::from(config),
        );
        let conductor = PlaybackConductor::new(
            selection.clone(),
            Arc::clone(&surface),
            Arc::clone(&audio),
            gate.clone(),
            PlaybackSettings::from(config),
        )?;

        Ok(Self {
            registry,
            selection,
            surface,
            audio,
            gate,
            spinner,
            conductor,
        })
    }

    /// Show the widget for the first time
    ///
    /// Loads every cue, renders the initial selection as results, sets the
    /// ready status and enables the controls.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Adapter`] if the surface is unavailable.
    pub async fn mount(&self) -> Result<(), EngineError> {
        let ready = self.audio.preload();
        tracing::info!(
            cues = ready,
            patterns = self.registry.len(),
            "mounting rhythm widget"
        );

        let selection = self.selection.snapshot();
        for (slot, id) in selection.iter() {
            let pattern = self.registry.get(id)?;
            self.surface.render_result(slot, pattern).await?;
        }
        self.surface.set_status(&StatusMessage::Ready).await?;
        self.surface.set_controls_enabled(true).await?;
        Ok(())
    }

    /// Spin the reels
    ///
    /// # Errors
    ///
    /// See [`SpinOrchestrator::spin`].
    pub async fn spin(&self) -> Result<Selection, EngineError> {
        self.spinner.spin().await
    }

    /// Count in and play the current selection
    ///
    /// # Errors
    ///
    /// See [`PlaybackConductor::play_all`].
    pub async fn play_all(&self) -> Result<(), EngineError> {
        self.conductor.play_all().await
    }

    /// Play one pattern's cue ("listen")
    ///
    /// # Errors
    ///
    /// - [`EngineError::Busy`] while a spin or play-all is running
    /// - [`EngineError::OutOfRange`] for an id outside the catalog
    pub fn preview(&self, pattern: PatternId) -> Result<(), EngineError> {
        self.gate.ensure_idle(Operation::Preview)?;
        self.registry.get(pattern)?;
        tracing::debug!(pattern, "preview");
        self.audio.play_cue(Cue::Pattern(pattern));
        Ok(())
    }

    /// Dispatch a button press from the surface
    ///
    /// # Errors
    ///
    /// Whatever the underlying operation returns.
    pub async fn handle_intent(&self, intent: UserIntent) -> Result<IntentOutcome, EngineError> {
        match intent {
            UserIntent::Spin => self.spin().await.map(IntentOutcome::Spun),
            UserIntent::PlayAll => self.play_all().await.map(|()| IntentOutcome::Played),
            UserIntent::Preview { pattern } => {
                self.preview(pattern).map(|()| IntentOutcome::Previewed(pattern))
            }
        }
    }

    /// Current selection
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection.snapshot()
    }

    /// Shared selection handle
    #[must_use]
    pub fn selection_state(&self) -> &SelectionState {
        &self.selection
    }

    /// The pattern catalog
    #[must_use]
    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// The audio player
    #[must_use]
    pub fn audio(&self) -> &Arc<AudioPlayer> {
        &self.audio
    }

    /// Whether a spin or play-all holds the controls
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }
}
