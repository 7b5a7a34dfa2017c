//! Control Gate
//!
//! Mutual exclusion over every user-initiated entry point. While a spin or a
//! play-all holds the gate, new spins, play-alls and previews are rejected
//! with [`EngineError::Busy`]; nothing is queued.
//!
//! The gate only tracks ownership. Toggling the surface's controls is the
//! holder's job, done once when the gate is taken and once when it is
//! released, because the surface call is async and cannot run from `Drop`.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::error::{EngineError, Operation};

const IDLE: u8 = 0;

fn encode(op: Operation) -> u8 {
    match op {
        Operation::Spin => 1,
        Operation::PlayAll => 2,
        Operation::Preview => 3,
    }
}

fn decode(raw: u8) -> Option<Operation> {
    match raw {
        1 => Some(Operation::Spin),
        2 => Some(Operation::PlayAll),
        3 => Some(Operation::Preview),
        _ => None,
    }
}

/// Shared gate; clones refer to the same state
#[derive(Clone, Debug, Default)]
pub struct ControlGate {
    active: Arc<AtomicU8>,
}

impl ControlGate {
    /// Create an open gate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Operation currently holding the gate
    #[must_use]
    pub fn active(&self) -> Option<Operation> {
        decode(self.active.load(Ordering::Acquire))
    }

    /// Whether any operation holds the gate
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.active().is_some()
    }

    /// Take the gate for `op`
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Busy`] if another operation holds the gate.
    pub fn try_acquire(&self, op: Operation) -> Result<GatePass, EngineError> {
        match self
            .active
            .compare_exchange(IDLE, encode(op), Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                tracing::debug!(operation = %op, "control gate acquired");
                Ok(GatePass {
                    gate: self.clone(),
                    op,
                    released: false,
                })
            }
            Err(raw) => Err(EngineError::Busy {
                requested: op,
                active: decode(raw).unwrap_or(op),
            }),
        }
    }

    /// Fail with [`EngineError::Busy`] if the gate is held, without taking it
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Busy`] naming the holder.
    pub fn ensure_idle(&self, requested: Operation) -> Result<(), EngineError> {
        match self.active() {
            Some(active) => Err(EngineError::Busy { requested, active }),
            None => Ok(()),
        }
    }
}

/// Proof of holding the gate
///
/// Call [`GatePass::release`] once the controls have been restored. A pass
/// dropped without release still opens the gate, so a panicking or cancelled
/// operation cannot lock out later ones. Dropping only reopens the gate: the
/// surface's controls stay disabled and any playback session snapshot is left
/// in place until the holder's owner runs again.
#[derive(Debug)]
pub struct GatePass {
    gate: ControlGate,
    op: Operation,
    released: bool,
}

impl GatePass {
    /// Operation this pass was issued for
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.op
    }

    /// Open the gate
    pub fn release(mut self) {
        self.open();
    }

    fn open(&mut self) {
        if !self.released {
            self.released = true;
            self.gate.active.store(IDLE, Ordering::Release);
            tracing::debug!(operation = %self.op, "control gate released");
        }
    }
}

impl Drop for GatePass {
    fn drop(&mut self) {
        self.open();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let gate = ControlGate::new();
        let pass = gate.try_acquire(Operation::Spin).unwrap();

        let err = gate.try_acquire(Operation::PlayAll).unwrap_err();
        match err {
            EngineError::Busy { requested, active } => {
                assert_eq!(requested, Operation::PlayAll);
                assert_eq!(active, Operation::Spin);
            }
            other => panic!("expected Busy, got {other:?}"),
        }

        pass.release();
        assert!(!gate.is_busy());
        assert!(gate.try_acquire(Operation::PlayAll).is_ok());
    }

    #[test]
    fn test_drop_opens_gate() {
        let gate = ControlGate::new();
        {
            let _pass = gate.try_acquire(Operation::PlayAll).unwrap();
            assert_eq!(gate.active(), Some(Operation::PlayAll));
            assert!(gate.ensure_idle(Operation::Preview).unwrap_err().is_busy());
        }
        assert_eq!(gate.active(), None);
        assert!(gate.ensure_idle(Operation::Preview).is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let gate = ControlGate::new();
        let other = gate.clone();
        let _pass = gate.try_acquire(Operation::Spin).unwrap();
        assert!(other.is_busy());
    }
}
