//! Cache Module
//!
//! Bounded recency heap and the lazily expiring cache built on it.

mod entry;
mod heap;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use heap::{Keys, RecencyHeap};
pub use stats::CacheStats;
pub use store::{MemoryCache, SharedCache};
