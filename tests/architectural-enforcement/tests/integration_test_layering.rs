//! Integration Test: Layering
//!
//! **Policy**: The audio layer is synchronous and never talks to a surface;
//! the presentation layer never plays audio. The widget is the only place
//! both meet, through the orchestrator and the conductor.

use architectural_enforcement::{engine_src, find_violations};

#[test]
fn test_audio_does_not_touch_presentation() {
    let audio = engine_src().join("audio");
    let violations = find_violations(
        &audio,
        |code| code.contains("presentation") || code.contains(".await"),
        |_| false,
    );
    assert!(
        violations.is_empty(),
        "audio layer reaches into presentation or awaits:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[test]
fn test_presentation_does_not_play_audio() {
    let presentation = engine_src().join("presentation");
    let violations = find_violations(&presentation, |code| code.contains("audio"), |_| false);
    assert!(
        violations.is_empty(),
        "presentation layer reaches into audio:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}
