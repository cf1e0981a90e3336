//! Memo Statistics Module
//!
//! Tracks memoizer performance metrics including hits, misses and evictions.

use serde::Serialize;

// == Memo Stats ==
/// Tracks memoizer performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoStats {
    /// Calls served from a fresh cached entry
    pub hits: u64,
    /// Calls that ran the underlying computation
    pub misses: u64,
    /// Entries dropped to make room at capacity
    pub evictions: u64,
    /// Entries dropped because their lifetime elapsed
    pub expirations: u64,
    /// Current number of cached entries
    pub total_entries: usize,
}

impl MemoStats {
    // == Constructor ==
    /// Creates a new MemoStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Record Expirations ==
    /// Adds `count` expired entries.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Set Total Entries ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
