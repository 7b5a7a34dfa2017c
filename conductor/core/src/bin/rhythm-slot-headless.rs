//! Rhythm Slot Headless Runner
//!
//! Mounts a widget on a channel surface with silent audio, spins once, plays
//! the result and logs every surface command along the way. Useful for
//! checking timing and configuration without a UI.
//!
//! # Usage
//!
//! ```bash
//! # Reference timing
//! rhythm-slot-headless
//!
//! # Reproducible spin at a faster tempo, with per-step logs
//! RHYTHM_SLOT_SEED=7 RHYTHM_SLOT_TEMPO_MS=500 RUST_LOG=debug rhythm-slot-headless
//! ```
//!
//! # Environment Variables
//!
//! - `RHYTHM_SLOT_CONFIG`: Path to a TOML config file
//! - `RHYTHM_SLOT_*`: Per-setting overrides (see `rhythm_slot_core::config`)
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use rhythm_slot_core::{
    load_config_from_path, ChannelSurface, RhythmWidget, SilentBackend, SurfaceCommand,
    UserIntent,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rhythm_slot_headless=info".parse()?)
                .add_directive("rhythm_slot_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let config_path = std::env::var("RHYTHM_SLOT_CONFIG").ok().map(PathBuf::from);
    let config = load_config_from_path(config_path)?;
    info!(
        source = %config.source(),
        tempo_ms = config.tempo_ms,
        countdown_beats = config.countdown_beats,
        spin_duration_ms = config.spin_duration_ms,
        "Starting headless rhythm slot"
    );

    let (surface, mut commands) = ChannelSurface::new_pair();
    let renderer = tokio::spawn(async move {
        let mut count = 0usize;
        while let Some(command) = commands.recv().await {
            count += 1;
            match &command {
                SurfaceCommand::Status { text, .. } => info!(status = %text, "status"),
                SurfaceCommand::ShowResult { slot, pattern } => {
                    info!(slot, pattern = %pattern.display_name, "result");
                }
                other => match other.to_json() {
                    Ok(json) => tracing::debug!(command = %json, "surface command"),
                    Err(e) => warn!(error = %e, "unserializable surface command"),
                },
            }
        }
        count
    });

    let widget = RhythmWidget::from_config(
        &config,
        Arc::new(surface),
        Arc::new(SilentBackend::new()),
    )?;

    let mut failures = widget.audio().subscribe_failures();
    tokio::spawn(async move {
        while let Ok(failure) = failures.recv().await {
            warn!(cue = %failure.cue, error = %failure.error, "cue failed");
        }
    });

    widget.mount().await?;
    for intent in [UserIntent::Spin, UserIntent::PlayAll] {
        let outcome = widget.handle_intent(intent).await?;
        info!(?intent, ?outcome, "intent handled");
    }

    drop(widget);
    let commands = renderer.await?;
    info!(commands, "Headless run finished");
    Ok(())
}
