//! Single-flight gate for scrape sessions
//!
//! At most one session may drive the browser and write the output directory
//! at a time. The gate is a compare-and-swap flag, so a second caller is
//! rejected immediately instead of queueing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide flag guarding the scrape pipeline. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    held: Arc<AtomicBool>,
}

impl SessionGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate if it is free. Returns `false` when another holder has it.
    ///
    /// A successful acquire happens-after the previous holder's `release`.
    #[must_use]
    pub fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Free the gate. Must be called exactly once per successful acquire;
    /// prefer [`SessionGate::acquire_guard`], which does it on drop.
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Acquire and return a guard that releases on every exit path,
    /// panics included
    #[must_use]
    pub fn acquire_guard(&self) -> Option<SessionGuard> {
        self.try_acquire().then(|| SessionGuard { gate: self.clone() })
    }
}

/// Holds the gate until dropped
#[must_use = "the gate is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct SessionGuard {
    gate: SessionGate,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.gate.release();
        log::debug!("Session gate released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let gate = SessionGate::new();
        assert!(gate.try_acquire());
        assert!(gate.is_held());
        assert!(!gate.try_acquire());

        gate.release();
        assert!(!gate.is_held());
        assert!(gate.try_acquire());
    }

    #[test]
    fn guard_releases_on_drop() {
        let gate = SessionGate::new();
        {
            let _guard = gate.acquire_guard().expect("free gate");
            assert!(gate.acquire_guard().is_none());
        }
        assert!(!gate.is_held());
    }

    #[test]
    fn guard_releases_on_panic() {
        let gate = SessionGate::new();
        let cloned = gate.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = cloned.acquire_guard().expect("free gate");
            panic!("scrape blew up");
        });
        assert!(result.is_err());
        assert!(!gate.is_held());
    }
}
