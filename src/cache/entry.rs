//! Cache Entry Module
//!
//! Payload paired with the instant it stops being served.

use std::time::{Duration, Instant};

/// Cap applied to TTLs too large for `Instant` arithmetic (about a century).
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// A cached payload with its absolute expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored payload
    pub payload: V,
    /// Last instant at which the payload is still served
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry expiring `ttl` from now.
    pub fn new(payload: V, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + MAX_TTL);
        Self {
            payload,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// The entry is still live at exactly `expires_at`; it expires once the
    /// current instant moves past it.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same check against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value", Duration::from_secs(60));

        assert_eq!(entry.payload, "test_value");
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(1, Duration::from_millis(20));
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(50));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiry_is_ttl_from_creation() {
        let before = Instant::now();
        let entry = CacheEntry::new(1, Duration::from_secs(10));

        assert!(entry.expires_at >= before + Duration::from_secs(10));
        assert!(entry.expires_at <= Instant::now() + Duration::from_secs(10));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new((), Duration::from_secs(5));

        assert!(!entry.is_expired_at(entry.expires_at));
        assert!(entry.is_expired_at(entry.expires_at + Duration::from_nanos(1)));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new((), Duration::MAX);
        assert!(!entry.is_expired());
    }
}
