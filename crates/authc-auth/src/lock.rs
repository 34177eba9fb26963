//! Per-identifier failure tracking and account lockout.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;

/// Per-identifier lock state.
#[derive(Debug, Clone, Copy, Default)]
struct LockState {
    failures: u32,
    locked: bool,
}

/// Result of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureOutcome {
    /// The failure count after this attempt.
    pub failures: u32,
    /// Whether this attempt crossed the lock threshold.
    pub just_locked: bool,
}

/// Tracks consecutive failures per identifier and locks accounts that cross
/// the configured threshold.
///
/// The increment-and-check is atomic per identifier: two concurrent attempts
/// against the same identifier cannot both observe a pre-threshold count
/// when their combined failures cross it. There is no cross-identifier lock.
#[derive(Debug)]
pub struct LockTracker {
    states: DashMap<String, LockState>,
    threshold: AtomicU32,
}

impl LockTracker {
    /// Creates a tracker with the given lock threshold.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            states: DashMap::new(),
            threshold: AtomicU32::new(threshold),
        }
    }

    /// The threshold in effect for the next lock check.
    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold.load(Ordering::Relaxed)
    }

    /// Changes the threshold at runtime.
    ///
    /// Takes effect on the next lock check; already-locked accounts stay
    /// locked regardless.
    pub fn set_threshold(&self, threshold: u32) {
        self.threshold.store(threshold, Ordering::Relaxed);
    }

    /// Records a failed attempt for an identifier.
    ///
    /// Returns the new count and whether this call transitioned the account
    /// to locked.
    pub fn record_failure(&self, identifier: &str) -> FailureOutcome {
        let threshold = self.threshold();
        // The entry guard serializes concurrent writers for this identifier.
        let mut state = self.states.entry(identifier.to_string()).or_default();
        state.failures = state.failures.saturating_add(1);

        let just_locked = !state.locked && state.failures >= threshold;
        if just_locked {
            state.locked = true;
            tracing::warn!(identifier, failures = state.failures, "account locked");
        }

        FailureOutcome {
            failures: state.failures,
            just_locked,
        }
    }

    /// Records a successful factor verification, resetting the failure
    /// count.
    ///
    /// Does not clear the locked flag: a truly locked account requires an
    /// explicit [`unlock`](Self::unlock).
    pub fn record_success(&self, identifier: &str) {
        if let Some(mut state) = self.states.get_mut(identifier) {
            state.failures = 0;
        }
    }

    /// Checks whether an identifier is locked.
    #[must_use]
    pub fn is_locked(&self, identifier: &str) -> bool {
        self.states
            .get(identifier)
            .is_some_and(|state| state.locked)
    }

    /// The current failure count for an identifier.
    #[must_use]
    pub fn failure_count(&self, identifier: &str) -> u32 {
        self.states
            .get(identifier)
            .map_or(0, |state| state.failures)
    }

    /// Unconditionally resets the count and clears the locked flag.
    pub fn unlock(&self, identifier: &str) {
        self.states.remove(identifier);
    }
}
