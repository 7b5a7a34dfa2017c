//! Exclusive cue playback.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::traits::{AudioBackend, CueHandle};
use crate::error::PlaybackError;
use crate::patterns::{PatternId, PatternRegistry};

/// Capacity of the failure channel; slow subscribers lose the oldest reports
const FAILURE_CHANNEL_CAPACITY: usize = 64;

/// Something the player can make audible
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// The metronome tic
    Metronome,
    /// A pattern's demonstration
    Pattern(PatternId),
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metronome => write!(f, "metronome"),
            Self::Pattern(id) => write!(f, "pattern-{id}"),
        }
    }
}

/// Which cues interrupt each other
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueExclusivity {
    /// One domain for everything: a metronome tic and a pattern cue cancel
    /// each other, so at most one cue is ever audible
    #[default]
    Shared,
    /// The metronome has its own domain and may sound over a pattern cue
    Separate,
}

impl FromStr for CueExclusivity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "separate" => Ok(Self::Separate),
            _ => Err(()),
        }
    }
}

/// Exclusivity domain a cue plays in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Domain {
    Main,
    Metronome,
}

impl Domain {
    fn of(cue: Cue, exclusivity: CueExclusivity) -> Self {
        match (exclusivity, cue) {
            (CueExclusivity::Separate, Cue::Metronome) => Self::Metronome,
            _ => Self::Main,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Main => 0,
            Self::Metronome => 1,
        }
    }
}

/// A cue that failed to play, as published on the failure channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CueFailure {
    /// The cue that was requested
    pub cue: Cue,
    /// Why it did not play
    pub error: PlaybackError,
}

/// Plays cues with last-writer-wins exclusivity
///
/// Starting a cue first stops whatever is sounding in the same domain. The
/// player never returns playback errors to the caller: failures are logged and
/// broadcast to [`AudioPlayer::subscribe_failures`] so timed sequences keep
/// their schedule.
pub struct AudioPlayer {
    backend: Arc<dyn AudioBackend>,
    registry: PatternRegistry,
    exclusivity: CueExclusivity,
    /// Resolved handles, filled by `preload` or on first use
    handles: DashMap<Cue, Arc<dyn CueHandle>>,
    /// Last cue started per domain
    current: Mutex<[Option<Cue>; 2]>,
    failures: broadcast::Sender<CueFailure>,
}

impl AudioPlayer {
    /// Create a player over a backend
    pub fn new(
        backend: Arc<dyn AudioBackend>,
        registry: PatternRegistry,
        exclusivity: CueExclusivity,
    ) -> Self {
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);
        Self {
            backend,
            registry,
            exclusivity,
            handles: DashMap::new(),
            current: Mutex::new([None, None]),
            failures,
        }
    }

    /// Exclusivity mode in effect
    #[must_use]
    pub fn exclusivity(&self) -> CueExclusivity {
        self.exclusivity
    }

    /// Receive every cue failure from now on
    pub fn subscribe_failures(&self) -> broadcast::Receiver<CueFailure> {
        self.failures.subscribe()
    }

    /// Load the metronome and every pattern cue up front
    ///
    /// Returns how many cues are ready. Cues that fail to load are reported
    /// and retried lazily on first use.
    pub fn preload(&self) -> usize {
        let cues = std::iter::once(Cue::Metronome)
            .chain(self.registry.iter().map(|p| Cue::Pattern(p.id)))
            .collect::<Vec<_>>();

        let mut ready = 0;
        for cue in cues {
            match self.handle(cue) {
                Ok(_) => ready += 1,
                Err(error) => self.report(cue, error),
            }
        }

        tracing::info!(
            backend = self.backend.name(),
            ready,
            total = self.registry.len() + 1,
            "Audio cues preloaded"
        );
        ready
    }

    /// Stop whatever sounds in the cue's domain, then start the cue
    pub fn play_cue(&self, cue: Cue) {
        let domain = Domain::of(cue, self.exclusivity);
        let mut current = self.current.lock();

        if let Some(previous) = current[domain.index()].take() {
            if let Some(handle) = self.handles.get(&previous) {
                handle.stop();
            }
        }

        let started = self.handle(cue).and_then(|handle| {
            handle.stop();
            handle.play()
        });

        match started {
            Ok(()) => {
                current[domain.index()] = Some(cue);
                tracing::trace!(cue = %cue, "cue playing");
            }
            Err(error) => {
                drop(current);
                self.report(cue, error);
            }
        }
    }

    /// Halt every cue
    pub fn stop_all(&self) {
        let mut current = self.current.lock();
        for entry in self.handles.iter() {
            entry.value().stop();
        }
        *current = [None, None];
    }

    /// Cues that are audible right now
    #[must_use]
    pub fn now_playing(&self) -> Vec<Cue> {
        let current = self.current.lock();
        current
            .iter()
            .flatten()
            .filter(|cue| {
                self.handles
                    .get(*cue)
                    .is_some_and(|handle| handle.is_playing())
            })
            .copied()
            .collect()
    }

    fn handle(&self, cue: Cue) -> Result<Arc<dyn CueHandle>, PlaybackError> {
        if let Some(handle) = self.handles.get(&cue) {
            return Ok(Arc::clone(handle.value()));
        }

        let asset_ref = match cue {
            Cue::Metronome => self.registry.metronome_asset_ref().to_string(),
            Cue::Pattern(id) => self
                .registry
                .get(id)
                .map_err(|_| PlaybackError::UnknownCue(id))?
                .audio_asset_ref
                .clone(),
        };

        let handle = self.backend.load(&asset_ref)?;
        self.handles.insert(cue, Arc::clone(&handle));
        Ok(handle)
    }

    fn report(&self, cue: Cue, error: PlaybackError) {
        tracing::warn!(cue = %cue, error = %error, "Cue failed to play");
        // No subscribers is fine; the log line is the record
        let _ = self.failures.send(CueFailure { cue, error });
    }
}

impl fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("backend", &self.backend.name())
            .field("exclusivity", &self.exclusivity)
            .field("loaded", &self.handles.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct FakeCue {
        playing: AtomicBool,
        fail: bool,
        plays: AtomicUsize,
    }

    impl CueHandle for FakeCue {
        fn play(&self) -> Result<(), PlaybackError> {
            if self.fail {
                return Err(PlaybackError::NotReady {
                    asset: "broken".into(),
                });
            }
            self.plays.fetch_add(1, Ordering::SeqCst);
            self.playing.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&self) {
            self.playing.store(false, Ordering::SeqCst);
        }

        fn is_playing(&self) -> bool {
            self.playing.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        broken: HashSet<String>,
        unloadable: HashSet<String>,
        loads: AtomicUsize,
    }

    impl AudioBackend for FakeBackend {
        fn name(&self) -> &str {
            "fake"
        }

        fn load(&self, asset_ref: &str) -> Result<Arc<dyn CueHandle>, PlaybackError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.unloadable.contains(asset_ref) {
                return Err(PlaybackError::Backend {
                    asset: asset_ref.to_string(),
                    reason: "404".into(),
                });
            }
            Ok(Arc::new(FakeCue {
                fail: self.broken.contains(asset_ref),
                ..Default::default()
            }))
        }
    }

    fn player_with(
        backend: FakeBackend,
        exclusivity: CueExclusivity,
    ) -> (AudioPlayer, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let player = AudioPlayer::new(
            Arc::clone(&backend) as Arc<dyn AudioBackend>,
            PatternRegistry::default(),
            exclusivity,
        );
        (player, backend)
    }

    #[test]
    fn test_second_cue_preempts_first() {
        let (player, _) = player_with(FakeBackend::default(), CueExclusivity::Shared);

        player.play_cue(Cue::Pattern(1));
        player.play_cue(Cue::Pattern(2));

        assert_eq!(player.now_playing(), vec![Cue::Pattern(2)]);
    }

    #[test]
    fn test_shared_domain_metronome_cancels_pattern() {
        let (player, _) = player_with(FakeBackend::default(), CueExclusivity::Shared);

        player.play_cue(Cue::Metronome);
        player.play_cue(Cue::Pattern(4));
        assert_eq!(player.now_playing(), vec![Cue::Pattern(4)]);

        player.play_cue(Cue::Metronome);
        assert_eq!(player.now_playing(), vec![Cue::Metronome]);
    }

    #[test]
    fn test_separate_domain_allows_overlap() {
        let (player, _) = player_with(FakeBackend::default(), CueExclusivity::Separate);

        player.play_cue(Cue::Metronome);
        player.play_cue(Cue::Pattern(4));

        let playing = player.now_playing();
        assert_eq!(playing.len(), 2);
        assert!(playing.contains(&Cue::Metronome));
        assert!(playing.contains(&Cue::Pattern(4)));

        player.play_cue(Cue::Pattern(5));
        let playing = player.now_playing();
        assert!(playing.contains(&Cue::Metronome));
        assert!(playing.contains(&Cue::Pattern(5)));
        assert!(!playing.contains(&Cue::Pattern(4)));
    }

    #[test]
    fn test_replaying_same_cue_restarts_it() {
        let (player, _) = player_with(FakeBackend::default(), CueExclusivity::Shared);

        player.play_cue(Cue::Pattern(0));
        player.play_cue(Cue::Pattern(0));
        assert_eq!(player.now_playing(), vec![Cue::Pattern(0)]);
    }

    #[test]
    fn test_stop_all() {
        let (player, _) = player_with(FakeBackend::default(), CueExclusivity::Separate);

        player.play_cue(Cue::Metronome);
        player.play_cue(Cue::Pattern(3));
        player.stop_all();

        assert!(player.now_playing().is_empty());
    }

    #[test]
    fn test_failure_is_reported_not_returned() {
        let backend = FakeBackend {
            broken: HashSet::from(["sounds/s_06.mp3".to_string()]),
            ..Default::default()
        };
        let (player, _) = player_with(backend, CueExclusivity::Shared);
        let mut failures = player.subscribe_failures();

        player.play_cue(Cue::Pattern(1));
        player.play_cue(Cue::Pattern(6));

        let failure = failures.try_recv().unwrap();
        assert_eq!(failure.cue, Cue::Pattern(6));
        assert!(matches!(failure.error, PlaybackError::NotReady { .. }));
        // The preempted cue stays stopped
        assert!(player.now_playing().is_empty());
    }

    #[test]
    fn test_unknown_pattern_reported() {
        let (player, _) = player_with(FakeBackend::default(), CueExclusivity::Shared);
        let mut failures = player.subscribe_failures();

        player.play_cue(Cue::Pattern(42));

        let failure = failures.try_recv().unwrap();
        assert_eq!(failure.error, PlaybackError::UnknownCue(42));
    }

    #[test]
    fn test_preload_resolves_once() {
        let backend = FakeBackend {
            unloadable: HashSet::from(["sounds/s_08.mp3".to_string()]),
            ..Default::default()
        };
        let (player, backend) = player_with(backend, CueExclusivity::Shared);

        assert_eq!(player.preload(), 9);
        assert_eq!(backend.loads.load(Ordering::SeqCst), 10);

        // Loaded cues are reused, the failed one is retried lazily
        player.play_cue(Cue::Pattern(0));
        player.play_cue(Cue::Pattern(8));
        assert_eq!(backend.loads.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_exclusivity_from_str() {
        assert_eq!("shared".parse(), Ok(CueExclusivity::Shared));
        assert_eq!(" Separate ".parse(), Ok(CueExclusivity::Separate));
        assert_eq!("both".parse::<CueExclusivity>(), Err(()));
    }
}
