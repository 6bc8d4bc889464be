//! Cache Statistics Module
//!
//! Tracks expiring cache metrics: hits, misses, expirations and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Expiring cache counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads that returned a live payload
    pub hits: u64,
    /// Reads that found nothing or found an expired payload
    pub misses: u64,
    /// Expired entries dropped on read
    pub expirations: u64,
    /// Entries removed by the recency policy to make room
    pub evictions: u64,
    /// Current number of resident entries, expired ones included
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates zeroed statistics.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recording ==
    /// Counts a read served from the cache.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts a read of an absent key.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// An expired read counts as a miss as well.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }
}
