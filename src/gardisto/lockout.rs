//! Failed-login lockout guard.
//!
//! One mutex-guarded table shared by all requests; read-modify-write on a
//! single identity is serialized by the lock, so concurrent failures count
//! exactly once each. Records age out after `record_ttl`; expired entries
//! are swept opportunistically whenever a failure is recorded, which bounds
//! table growth without a background task.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

pub const DEFAULT_THRESHOLD: u32 = 5;
const DEFAULT_RECORD_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug)]
struct AttemptRecord {
    failure_count: u32,
    last_failure_at: Instant,
}

/// Per-identity failure counter with a lockout threshold.
///
/// Construct once at process start and inject by reference; swap for a test
/// double through `AppState` if needed.
#[derive(Debug)]
pub struct LoginAttemptGuard {
    threshold: u32,
    record_ttl: Duration,
    records: Mutex<HashMap<String, AttemptRecord>>,
}

impl LoginAttemptGuard {
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            record_ttl: DEFAULT_RECORD_TTL,
            records: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_record_ttl(mut self, record_ttl: Duration) -> Self {
        self.record_ttl = record_ttl;
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, AttemptRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one failed attempt for `identity`, creating the record if
    /// absent, and sweep expired records while the lock is held.
    pub fn record_failure(&self, identity: &str) {
        let mut records = self.lock();
        let ttl = self.record_ttl;
        records.retain(|_, record| record.last_failure_at.elapsed() < ttl);
        let record = records
            .entry(identity.to_string())
            .or_insert(AttemptRecord {
                failure_count: 0,
                last_failure_at: Instant::now(),
            });
        record.failure_count += 1;
        record.last_failure_at = Instant::now();
    }

    /// Reset `identity` after a successful login.
    pub fn record_success(&self, identity: &str) {
        self.lock().remove(identity);
    }

    /// True once `identity` has reached the failure threshold and the
    /// record has not aged out.
    #[must_use]
    pub fn is_locked(&self, identity: &str) -> bool {
        let records = self.lock();
        records.get(identity).is_some_and(|record| {
            record.failure_count >= self.threshold
                && record.last_failure_at.elapsed() < self.record_ttl
        })
    }

    /// Current failure count for `identity` (0 when absent).
    #[must_use]
    pub fn failure_count(&self, identity: &str) -> u32 {
        self.lock()
            .get(identity)
            .map_or(0, |record| record.failure_count)
    }
}
