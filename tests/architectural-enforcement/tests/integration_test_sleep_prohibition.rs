//! Integration Test: Sleep Prohibition
//!
//! **Policy**: The engine never blocks a thread, and timed waits live only in
//! the modules that own a schedule.
//! **Exceptions**: `spin.rs` (settle delay and spin duration) and
//! `conductor.rs` (beat grid), test code.

use std::path::Path;

use architectural_enforcement::{engine_src, find_violations, Violation};

fn report(title: &str, violations: &[Violation]) {
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }

    panic!("\nFound {} violation(s): {title}", violations.len());
}

fn is_scheduling_module(path: &Path) -> bool {
    path.ends_with("spin.rs") || path.ends_with("conductor.rs")
}

#[test]
fn test_engine_sources_exist() {
    assert!(
        engine_src().join("lib.rs").exists(),
        "engine sources not found at {}",
        engine_src().display()
    );
}

/// Blocking sleeps would stall every reel and the beat grid
#[test]
fn test_no_blocking_sleep() {
    let violations = find_violations(
        &engine_src(),
        |code| code.contains("thread::sleep"),
        |_| false,
    );
    report("Blocking sleep in engine code", &violations);
}

/// Only spin and playback schedule time
#[test]
fn test_timed_waits_only_in_scheduling_modules() {
    let violations = find_violations(
        &engine_src(),
        |code| {
            code.contains("::sleep(")
                || code.contains(".sleep(")
                || code.contains("interval(")
                || code.contains("sleep_until(")
        },
        is_scheduling_module,
    );
    report("Timed wait outside spin/conductor", &violations);
}
