//! Shared fixtures for the integration tests: a surface that records every
//! call with its (virtual) timestamp, an audio backend that records every
//! play and can be told to fail, and deterministic randomness.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use rhythm_slot_core::{
    AdapterError, AudioBackend, CueHandle, Pattern, PatternId, PatternRegistry,
    PlaybackError, PresentationAdapter, RandomSource, ReelGeometry, ReelMotion, RhythmWidget,
    StatusMessage, WidgetConfig,
};

// =============================================================================
// Recording Surface
// =============================================================================

/// One presentation call
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Prepare(usize),
    Animate(usize, ReelMotion),
    Result(usize, PatternId),
    Status(StatusMessage),
    Controls(bool),
    Highlight(usize, bool),
}

/// Where the surface should refuse to work
#[derive(Clone, Copy, Debug, Default)]
pub struct FailPoints {
    pub animate_slot: Option<usize>,
    pub highlight_slot: Option<usize>,
    pub result_slot: Option<usize>,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<(Instant, Call)>>,
    fail: Mutex<FailPoints>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(points: FailPoints) -> Arc<Self> {
        let surface = Self::default();
        *surface.fail.lock() = points;
        Arc::new(surface)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().iter().filter(|(_, c)| c == call).count()
    }

    pub fn statuses(&self) -> Vec<StatusMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Status(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push((Instant::now(), call));
    }
}

fn unavailable(what: &str) -> AdapterError {
    AdapterError::Unavailable(format!("{what} missing"))
}

#[async_trait]
impl PresentationAdapter for RecordingSurface {
    async fn render_spinning_state(
        &self,
        slot: usize,
        item_extent_hint: f32,
    ) -> Result<ReelGeometry, AdapterError> {
        self.record(Call::Prepare(slot));
        Ok(ReelGeometry::uniform(item_extent_hint))
    }

    async fn animate_to(&self, slot: usize, motion: ReelMotion) -> Result<(), AdapterError> {
        if self.fail.lock().animate_slot == Some(slot) {
            return Err(unavailable(&format!("reel-{slot}")));
        }
        self.record(Call::Animate(slot, motion));
        Ok(())
    }

    async fn render_result(&self, slot: usize, pattern: &Pattern) -> Result<(), AdapterError> {
        if self.fail.lock().result_slot == Some(slot) {
            return Err(unavailable(&format!("result-{slot}")));
        }
        self.record(Call::Result(slot, pattern.id));
        Ok(())
    }

    async fn set_status(&self, status: &StatusMessage) -> Result<(), AdapterError> {
        self.record(Call::Status(status.clone()));
        Ok(())
    }

    async fn set_controls_enabled(&self, enabled: bool) -> Result<(), AdapterError> {
        self.record(Call::Controls(enabled));
        Ok(())
    }

    async fn set_highlight(&self, slot: usize, on: bool) -> Result<(), AdapterError> {
        if on && self.fail.lock().highlight_slot == Some(slot) {
            return Err(unavailable(&format!("reel-{slot}")));
        }
        self.record(Call::Highlight(slot, on));
        Ok(())
    }
}

// =============================================================================
// Recording Audio Backend
// =============================================================================

/// Shared log of successful plays
pub type PlayLog = Arc<Mutex<Vec<(Instant, String)>>>;

#[derive(Debug, Default)]
pub struct FakeBackend {
    plays: PlayLog,
    failing: HashSet<String>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Backend whose cues for these assets refuse to play
    pub fn failing(assets: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            plays: PlayLog::default(),
            failing: assets.iter().map(|a| (*a).to_string()).collect(),
        })
    }

    pub fn plays(&self) -> Vec<(Instant, String)> {
        self.plays.lock().clone()
    }

    pub fn play_times_of(&self, asset: &str) -> Vec<Instant> {
        self.plays
            .lock()
            .iter()
            .filter(|(_, a)| a == asset)
            .map(|(t, _)| *t)
            .collect()
    }
}

struct FakeCue {
    asset: String,
    fail: bool,
    playing: AtomicBool,
    plays: PlayLog,
}

impl CueHandle for FakeCue {
    fn play(&self) -> Result<(), PlaybackError> {
        if self.fail {
            return Err(PlaybackError::Backend {
                asset: self.asset.clone(),
                reason: "decoder refused".to_string(),
            });
        }
        self.playing.store(true, Ordering::SeqCst);
        self.plays.lock().push((Instant::now(), self.asset.clone()));
        Ok(())
    }

    fn stop(&self) {
        self.playing.store(false, Ordering::SeqCst);
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl AudioBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn load(&self, asset_ref: &str) -> Result<Arc<dyn CueHandle>, PlaybackError> {
        Ok(Arc::new(FakeCue {
            asset: asset_ref.to_string(),
            fail: self.failing.contains(asset_ref),
            playing: AtomicBool::new(false),
            plays: Arc::clone(&self.plays),
        }))
    }
}

// =============================================================================
// Randomness and Wiring
// =============================================================================

/// Always draws the same index
pub struct FixedSource(pub usize);

impl RandomSource for FixedSource {
    fn next_index(&mut self, bound: usize) -> usize {
        self.0.min(bound - 1)
    }
}

/// Draws the given indices in order, then repeats the last one
pub struct SequenceSource {
    values: Vec<usize>,
    next: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<usize>) -> Self {
        Self { values, next: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn next_index(&mut self, bound: usize) -> usize {
        let value = self
            .values
            .get(self.next)
            .or_else(|| self.values.last())
            .copied()
            .unwrap_or(0);
        self.next += 1;
        value % bound
    }
}

pub fn widget(
    config: &WidgetConfig,
    surface: &Arc<RecordingSurface>,
    backend: &Arc<FakeBackend>,
    source: Box<dyn RandomSource>,
) -> Arc<RhythmWidget> {
    let surface: Arc<dyn PresentationAdapter> = surface.clone();
    let backend: Arc<dyn AudioBackend> = backend.clone();
    let widget = RhythmWidget::new(config, PatternRegistry::default(), surface, backend, source)
        .expect("test configuration is valid");
    Arc::new(widget)
}
