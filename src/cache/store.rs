//! Memory Cache Module
//!
//! Expiring cache layered over [`RecencyHeap`]. Expiry is checked lazily on
//! read: an expired entry nobody reads keeps its slot until the recency
//! policy evicts it, so a live but rarely read entry can be evicted ahead of
//! an expired one that was touched more recently. Tracking expiry order
//! would need a second heap; it is not done here.

use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, Keys, RecencyHeap};
use crate::config::Config;
use crate::error::{MidwareError, Result};

/// One cache instance behind one exclusive lock, as shared by handlers.
pub type SharedCache = Arc<Mutex<MemoryCache<String, Vec<u8>>>>;

// == Memory Cache ==
/// Bounded recency cache whose entries carry an expiry instant.
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    heap: RecencyHeap<K, CacheEntry<V>>,
    /// TTL applied when `set_data` gets no explicit one
    default_ttl: Duration,
    stats: CacheStats,
}

impl<K, V> MemoryCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// `InvalidConfig` when `capacity` is zero.
    pub fn new(capacity: usize, default_ttl: Duration) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            MidwareError::InvalidConfig("cache capacity must be at least 1".to_string())
        })?;

        Ok(Self {
            heap: RecencyHeap::new(capacity),
            default_ttl,
            stats: CacheStats::new(),
        })
    }

    /// Creates a cache sized and timed by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(config.capacity, config.default_ttl())
    }

    /// Wraps the cache for sharing between handlers.
    pub fn into_shared(self) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(self))
    }

    // == Set Data ==
    /// Stores `payload` until `ttl` from now (the default TTL when `None`).
    ///
    /// Counts as a touch for eviction purposes.
    pub fn set_data(&mut self, key: K, payload: V, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.heap.set(key, CacheEntry::new(payload, ttl));
    }

    // == Get Data ==
    /// Returns the payload if present and not expired.
    ///
    /// A live hit leaves the entry freshly touched. An expired hit removes the
    /// entry and reports a miss.
    pub fn get_data(&mut self, key: &K) -> Option<V> {
        let expired = match self.heap.get(key) {
            Ok(entry) if !entry.is_expired() => {
                let payload = entry.payload.clone();
                self.stats.record_hit();
                return Some(payload);
            }
            Ok(_) => true,
            Err(_) => false,
        };

        if !expired {
            self.stats.record_miss();
            return None;
        }

        match self.heap.delete(key) {
            Ok(entry) => {
                self.stats.record_expiration();
                debug!(
                    key = ?key,
                    expired_for = ?entry.expires_at.elapsed(),
                    "dropped expired entry on read"
                );
            }
            Err(err) => {
                warn!(key = ?key, error = %err, "expired entry vanished before removal");
                self.stats.record_miss();
            }
        }
        None
    }

    // == Contains ==
    /// Membership in the underlying heap; expired entries still count.
    pub fn contains(&self, key: &K) -> bool {
        self.heap.contains(key)
    }

    // == Length ==
    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    // == Capacity ==
    /// Maximum number of entries held before eviction.
    pub fn capacity(&self) -> usize {
        self.heap.capacity()
    }

    // == Default TTL ==
    /// TTL used by `set_data` when none is given.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Keys ==
    /// Keys in eviction order (see [`RecencyHeap::iter`]).
    pub fn keys(&self) -> Keys<K> {
        self.heap.iter()
    }

    // == Stats ==
    /// Counters so far, with evictions and entry count taken from the heap.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.evictions = self.heap.evictions();
        stats.total_entries = self.heap.len();
        stats
    }
}
