//! Widget Configuration
//!
//! Timing, audio and asset settings for the rhythm slot widget. Page variants
//! of the widget differ only in these values.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. Explicit overrides ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [timing]
//! tempo_ms = 750
//! countdown_beats = 4
//! spin_duration_ms = 2000
//! total_cycles = 4
//! settle_delay_ms = 50
//! easing = "EaseOut"
//!
//! [audio]
//! exclusivity = "shared"
//!
//! [assets]
//! image_dir = "images/"
//! sound_dir = "sounds/"
//!
//! [random]
//! seed = 42
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::EasingFunction;
use crate::audio::CueExclusivity;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from an explicit override
    Override,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Timing section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingToml {
    /// Tempo interval in milliseconds
    pub tempo_ms: Option<u64>,

    /// Countdown beats before the pattern phase
    pub countdown_beats: Option<u32>,

    /// Reel spin duration in milliseconds
    pub spin_duration_ms: Option<u64>,

    /// Full strip cycles each reel travels before settling
    pub total_cycles: Option<u32>,

    /// Pause between resetting the strips and starting the spin
    pub settle_delay_ms: Option<u64>,

    /// Easing curve of the spin
    pub easing: Option<EasingFunction>,
}

/// Audio section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioToml {
    /// Whether the metronome shares the pattern cues' exclusivity domain
    pub exclusivity: Option<CueExclusivity>,
}

/// Assets section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsToml {
    /// Prefix for glyph images
    pub image_dir: Option<String>,

    /// Prefix for audio cues
    pub sound_dir: Option<String>,
}

/// Random section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomToml {
    /// Fixed seed for reproducible spins
    pub seed: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetToml {
    /// Timing configuration section
    pub timing: TimingToml,

    /// Audio configuration section
    pub audio: AudioToml,

    /// Assets configuration section
    pub assets: AssetsToml,

    /// Random configuration section
    pub random: RandomToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved widget configuration
#[derive(Clone, Debug)]
pub struct WidgetConfig {
    /// Tempo interval in milliseconds
    pub tempo_ms: u64,

    /// Countdown beats before the pattern phase
    pub countdown_beats: u32,

    /// Reel spin duration in milliseconds
    pub spin_duration_ms: u64,

    /// Full strip cycles each reel travels before settling
    pub total_cycles: u32,

    /// Pause between resetting the strips and starting the spin
    pub settle_delay_ms: u64,

    /// Easing curve of the spin
    pub easing: EasingFunction,

    /// Whether the metronome shares the pattern cues' exclusivity domain
    pub exclusivity: CueExclusivity,

    /// Prefix for glyph images
    pub image_dir: String,

    /// Prefix for audio cues
    pub sound_dir: String,

    /// Fixed seed for reproducible spins (entropy when `None`)
    pub seed: Option<u64>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            tempo_ms: 750,
            countdown_beats: 4,
            spin_duration_ms: 2000,
            total_cycles: 4,
            settle_delay_ms: 50,
            easing: EasingFunction::EaseOut,
            exclusivity: CueExclusivity::Shared,
            image_dir: "images/".to_string(),
            sound_dir: "sounds/".to_string(),
            seed: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl WidgetConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML on top of the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let toml_config: WidgetToml = toml::from_str(content)?;
        let mut config = Self::default();
        apply_toml_config(&mut config, &toml_config);
        config.source = ConfigSource::File;
        config.validate()?;
        Ok(config)
    }

    /// Tempo interval
    #[must_use]
    pub fn tempo(&self) -> Duration {
        Duration::from_millis(self.tempo_ms)
    }

    /// Reel spin duration
    #[must_use]
    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    /// Layout pause before the spin starts
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Reject values the engine cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tempo_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tempo_ms must be greater than zero".to_string(),
            ));
        }
        if self.spin_duration_ms == 0 {
            return Err(ConfigError::ValidationError(
                "spin_duration_ms must be greater than zero".to_string(),
            ));
        }
        if self.total_cycles == 0 {
            return Err(ConfigError::ValidationError(
                "total_cycles must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Load configuration from defaults and the environment only
///
/// # Errors
///
/// Returns an error if an environment value fails validation.
pub fn load_config() -> Result<WidgetConfig, ConfigError> {
    load_config_from_path(None)
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used. A path that does not exist is not an
///   error.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed, or
/// if the merged configuration fails validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<WidgetConfig, ConfigError> {
    let mut config = WidgetConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: WidgetToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded widget configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut WidgetConfig, toml: &WidgetToml) {
    if let Some(tempo) = toml.timing.tempo_ms {
        config.tempo_ms = tempo;
    }
    if let Some(beats) = toml.timing.countdown_beats {
        config.countdown_beats = beats;
    }
    if let Some(duration) = toml.timing.spin_duration_ms {
        config.spin_duration_ms = duration;
    }
    if let Some(cycles) = toml.timing.total_cycles {
        config.total_cycles = cycles;
    }
    if let Some(delay) = toml.timing.settle_delay_ms {
        config.settle_delay_ms = delay;
    }
    if let Some(easing) = toml.timing.easing {
        config.easing = easing;
    }

    if let Some(exclusivity) = toml.audio.exclusivity {
        config.exclusivity = exclusivity;
    }

    if let Some(ref dir) = toml.assets.image_dir {
        config.image_dir = dir.clone();
    }
    if let Some(ref dir) = toml.assets.sound_dir {
        config.sound_dir = dir.clone();
    }

    if toml.random.seed.is_some() {
        config.seed = toml.random.seed;
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut WidgetConfig) {
    if let Some(ms) = env_parse::<u64>("RHYTHM_SLOT_TEMPO_MS") {
        config.tempo_ms = ms;
        config.source = ConfigSource::Env;
    }
    if let Some(beats) = env_parse::<u32>("RHYTHM_SLOT_COUNTDOWN_BEATS") {
        config.countdown_beats = beats;
        config.source = ConfigSource::Env;
    }
    if let Some(ms) = env_parse::<u64>("RHYTHM_SLOT_SPIN_DURATION_MS") {
        config.spin_duration_ms = ms;
        config.source = ConfigSource::Env;
    }
    if let Some(cycles) = env_parse::<u32>("RHYTHM_SLOT_TOTAL_CYCLES") {
        config.total_cycles = cycles;
        config.source = ConfigSource::Env;
    }
    if let Ok(value) = std::env::var("RHYTHM_SLOT_EXCLUSIVITY") {
        match value.parse::<CueExclusivity>() {
            Ok(exclusivity) => {
                config.exclusivity = exclusivity;
                config.source = ConfigSource::Env;
            }
            Err(()) => {
                tracing::warn!(value = %value, "Ignoring unknown RHYTHM_SLOT_EXCLUSIVITY");
            }
        }
    }
    if let Some(seed) = env_parse::<u64>("RHYTHM_SLOT_SEED") {
        config.seed = Some(seed);
        config.source = ConfigSource::Env;
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

// =============================================================================
// Explicit Overrides
// =============================================================================

/// Builder for applying explicit overrides to configuration
///
/// Use this after [`load_config`] when the embedding page passes its own
/// values.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Tempo override (milliseconds)
    pub tempo_ms: Option<u64>,

    /// Countdown beats override
    pub countdown_beats: Option<u32>,

    /// Spin duration override (milliseconds)
    pub spin_duration_ms: Option<u64>,

    /// Total cycles override
    pub total_cycles: Option<u32>,

    /// Exclusivity override
    pub exclusivity: Option<CueExclusivity>,

    /// Seed override
    pub seed: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set tempo override
    #[must_use]
    pub fn with_tempo_ms(mut self, ms: u64) -> Self {
        self.tempo_ms = Some(ms);
        self
    }

    /// Set countdown beats override
    #[must_use]
    pub fn with_countdown_beats(mut self, beats: u32) -> Self {
        self.countdown_beats = Some(beats);
        self
    }

    /// Set spin duration override
    #[must_use]
    pub fn with_spin_duration_ms(mut self, ms: u64) -> Self {
        self.spin_duration_ms = Some(ms);
        self
    }

    /// Set total cycles override
    #[must_use]
    pub fn with_total_cycles(mut self, cycles: u32) -> Self {
        self.total_cycles = Some(cycles);
        self
    }

    /// Set exclusivity override
    #[must_use]
    pub fn with_exclusivity(mut self, exclusivity: CueExclusivity) -> Self {
        self.exclusivity = Some(exclusivity);
        self
    }

    /// Set seed override
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut WidgetConfig) {
        if self.tempo_ms.is_some()
            || self.countdown_beats.is_some()
            || self.spin_duration_ms.is_some()
            || self.total_cycles.is_some()
            || self.exclusivity.is_some()
            || self.seed.is_some()
        {
            config.source = ConfigSource::Override;
        }

        if let Some(ms) = self.tempo_ms {
            config.tempo_ms = ms;
        }
        if let Some(beats) = self.countdown_beats {
            config.countdown_beats = beats;
        }
        if let Some(ms) = self.spin_duration_ms {
            config.spin_duration_ms = ms;
        }
        if let Some(cycles) = self.total_cycles {
            config.total_cycles = cycles;
        }
        if let Some(exclusivity) = self.exclusivity {
            config.exclusivity = exclusivity;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
