//! Retry configuration for the indexed service.
//!
//! Attempt budgets are injected at construction instead of being
//! hard-coded loop counts, so callers can tune them per deployment.

use std::time::Duration;

/// Bounded retry budget with a fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least one
    /// attempt; zero-attempt budgets make every operation unreachable.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Policy with the given budget and no pause between attempts.
    pub fn attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Sleeps for the configured backoff, if any. Retries are
    /// sequential awaits; only the calling task is suspended.
    pub(crate) async fn pause(&self) {
        if !self.backoff.is_zero() {
            tokio::time::sleep(self.backoff).await;
        }
    }
}

/// Whether index records can change when their data record is updated.
///
/// `KeysOnly` means the index derivation depends only on the immutable
/// key pair, so an eventual update implementation would never need to
/// rewrite index rows. `Derived` means the derivation reads mutable
/// fields and an update must recompute the index record. Update itself
/// is not implemented; the choice is recorded here so callers state it
/// explicitly instead of the service guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexUpdatePolicy {
    KeysOnly,
    Derived,
}

/// Attempt budgets for the indexed service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedConfig {
    /// Budget for the create loop (index write + data write phases).
    pub create: RetryPolicy,
    /// Budget for the delete loop.
    pub delete: RetryPolicy,
    /// Budget for the compensating index delete after a failed create.
    pub compensation: RetryPolicy,
    /// How index records relate to data-record updates.
    pub index_updates: IndexUpdatePolicy,
}

impl Default for IndexedConfig {
    fn default() -> Self {
        Self {
            create: RetryPolicy::attempts(3),
            delete: RetryPolicy::attempts(2),
            compensation: RetryPolicy::attempts(2),
            index_updates: IndexUpdatePolicy::KeysOnly,
        }
    }
}
