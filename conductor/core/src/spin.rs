//! Spin Orchestrator
//!
//! Runs one spin of the four reels:
//!
//! ```text
//! draw 4 outcomes ─► prepare reels ─► settle ─┬─ reel 0: animate, wait ─┐
//!                                             ├─ reel 1: animate, wait ─┤
//!                                             ├─ reel 2: animate, wait ─┼─► commit ─► results
//!                                             └─ reel 3: animate, wait ─┘
//! ```
//!
//! Outcomes are drawn in reel order before the first suspension point, so a
//! deterministic [`RandomSource`] always produces the same spin and no reel
//! can see another's outcome before the commit. The commit writes all four
//! ids at once, or nothing if any reel failed.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use parking_lot::Mutex;

use crate::animation::{EasingFunction, ReelGeometry, ReelMotion};
use crate::config::WidgetConfig;
use crate::error::{AdapterError, EngineError, Operation};
use crate::gate::ControlGate;
use crate::messages::StatusMessage;
use crate::patterns::{PatternId, PatternRegistry, RandomSource};
use crate::presentation::{PresentationAdapter, DEFAULT_ITEM_EXTENT};
use crate::selection::{Selection, SelectionState, REEL_COUNT};

/// Timing and shape of a spin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinSettings {
    /// How long each reel travels
    pub spin_duration: Duration,
    /// Pause between resetting the strips and starting the transitions
    pub settle_delay: Duration,
    /// Full strip cycles before landing
    pub total_cycles: u32,
    /// Easing curve of the transition
    pub easing: EasingFunction,
}

impl Default for SpinSettings {
    fn default() -> Self {
        Self::from(&WidgetConfig::default())
    }
}

impl From<&WidgetConfig> for SpinSettings {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            spin_duration: config.spin_duration(),
            settle_delay: config.settle_delay(),
            total_cycles: config.total_cycles,
            easing: config.easing,
        }
    }
}

/// One reel's part of a spin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReelSpinTask {
    /// Reel slot (0-3)
    pub reel_slot: usize,
    /// Pattern the reel lands on
    pub outcome: PatternId,
    /// Offset the strip starts from
    pub start_offset: f32,
    /// Offset that shows `outcome`
    pub end_offset: f32,
    /// Transition length
    pub duration: Duration,
}

impl ReelSpinTask {
    fn plan(
        reel_slot: usize,
        outcome: PatternId,
        geometry: ReelGeometry,
        pattern_count: usize,
        settings: &SpinSettings,
    ) -> Self {
        Self {
            reel_slot,
            outcome,
            start_offset: geometry.start_offset(pattern_count),
            end_offset: geometry.stop_offset(pattern_count, settings.total_cycles, outcome),
            duration: settings.spin_duration,
        }
    }

    /// The transition the surface is asked to run
    #[must_use]
    pub fn motion(&self, easing: EasingFunction) -> ReelMotion {
        ReelMotion::new(self.start_offset, self.end_offset, self.duration, easing)
    }
}

/// Drives spins against a presentation surface
pub struct SpinOrchestrator {
    registry: PatternRegistry,
    selection: SelectionState,
    surface: Arc<dyn PresentationAdapter>,
    gate: ControlGate,
    source: Mutex<Box<dyn RandomSource>>,
    settings: SpinSettings,
}

impl std::fmt::Debug for SpinOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpinOrchestrator")
            .field("patterns", &self.registry.len())
            .field("settings", &self.settings)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl SpinOrchestrator {
    /// Create an orchestrator
    ///
    /// `selection` and `gate` are shared handles; pass the same ones to the
    /// playback conductor so both see one selection and one set of controls.
    pub fn new(
        registry: PatternRegistry,
        selection: SelectionState,
        surface: Arc<dyn PresentationAdapter>,
        gate: ControlGate,
        source: Box<dyn RandomSource>,
        settings: SpinSettings,
    ) -> Self {
        Self {
            registry,
            selection,
            surface,
            gate,
            source: Mutex::new(source),
            settings,
        }
    }

    /// Spin settings in effect
    #[must_use]
    pub fn settings(&self) -> &SpinSettings {
        &self.settings
    }

    /// Spin all four reels and commit the result
    ///
    /// Controls are disabled for the whole spin and re-enabled exactly once
    /// before this returns, whatever the outcome. Dropping the future
    /// mid-spin skips that: the gate reopens but the surface keeps its
    /// controls disabled.
    ///
    /// Once all four reels land the selection is committed and returned, even
    /// if drawing the results afterwards fails. That failure only shows up as
    /// an error status, so the returned selection always matches the state.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Busy`] if another operation holds the controls
    /// - [`EngineError::Adapter`] if the surface failed before the reels
    ///   landed; the selection is left untouched
    pub async fn spin(&self) -> Result<Selection, EngineError> {
        let pass = self.gate.try_acquire(Operation::Spin)?;
        tracing::info!("spin started");

        let result = match self.surface.set_controls_enabled(false).await {
            Ok(()) => self.land().await,
            Err(e) => Err(e.into()),
        };

        match &result {
            Ok(selection) => {
                if let Err(err) = self.present(*selection).await {
                    tracing::error!(error = %err, "spin landed but results were not shown");
                    self.report_failure(&err).await;
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "spin aborted");
                self.report_failure(err).await;
            }
        }

        if let Err(e) = self.surface.set_controls_enabled(true).await {
            tracing::warn!(error = %e, "could not re-enable controls after spin");
        }
        pass.release();

        result
    }

    /// Draw one outcome per reel, in reel order
    fn draw_outcomes(&self) -> [PatternId; REEL_COUNT] {
        let mut source = self.source.lock();
        let mut outcomes = [0; REEL_COUNT];
        for outcome in &mut outcomes {
            *outcome = self.registry.random_pattern_id(source.as_mut());
        }
        outcomes
    }

    async fn report_failure(&self, err: &EngineError) {
        if let Err(e) = self
            .surface
            .set_status(&StatusMessage::Error(err.to_string()))
            .await
        {
            tracing::warn!(error = %e, "could not report spin failure");
        }
    }

    /// Spin every reel and commit where they landed
    async fn land(&self) -> Result<Selection, EngineError> {
        let outcomes = self.draw_outcomes();
        tracing::debug!(?outcomes, "outcomes drawn");

        self.surface.set_status(&StatusMessage::Spinning).await?;

        let mut tasks = Vec::with_capacity(REEL_COUNT);
        for (slot, outcome) in outcomes.iter().copied().enumerate() {
            let geometry = self
                .surface
                .render_spinning_state(slot, DEFAULT_ITEM_EXTENT)
                .await?;
            tasks.push(ReelSpinTask::plan(
                slot,
                outcome,
                geometry,
                self.registry.len(),
                &self.settings,
            ));
        }

        tokio::time::sleep(self.settings.settle_delay).await;

        let landed = try_join_all(tasks.iter().map(|task| self.run_reel(task))).await?;

        let mut ids = [0; REEL_COUNT];
        ids.copy_from_slice(&landed);
        let selection = Selection(ids);
        self.selection.commit(selection);
        tracing::info!(selection = ?selection.0, "spin committed");

        Ok(selection)
    }

    /// Show a committed selection
    async fn present(&self, selection: Selection) -> Result<(), EngineError> {
        self.surface.set_status(&StatusMessage::Stopped).await?;
        for (slot, id) in selection.iter() {
            let pattern = self.registry.get(id)?;
            self.surface.render_result(slot, pattern).await?;
        }
        Ok(())
    }

    async fn run_reel(&self, task: &ReelSpinTask) -> Result<PatternId, AdapterError> {
        tracing::debug!(
            slot = task.reel_slot,
            pattern = task.outcome,
            from = task.start_offset,
            to = task.end_offset,
            "reel spinning"
        );
        self.surface
            .animate_to(task.reel_slot, task.motion(self.settings.easing))
            .await?;
        tokio::time::sleep(task.duration).await;
        Ok(task.outcome)
    }
}
