//! Recency Heap Module
//!
//! Fixed-capacity associative container that evicts the least recently
//! touched entry. Not thread-safe: wrap it in a single lock for shared use.
//!
//! Entries live in an arena of slots. A hash map resolves keys to slot
//! indices and a min-heap orders `(recency, slot)` pairs. Touching an entry
//! stamps it with a fresh value from the instance's logical clock and pushes
//! a new pair; the previous pair goes stale and is discarded when it reaches
//! the top of the heap. Recency values are never reused, so a stale pair can
//! never match a slot that has since been refilled.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::num::NonZeroUsize;

use tracing::debug;

use crate::error::{MidwareError, Result};

/// Stale pairs tolerated per live entry before the order heap is rebuilt.
const COMPACT_FACTOR: usize = 4;
/// Minimum order heap size before compaction is considered.
const COMPACT_MIN: usize = 64;

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    recency: u64,
}

// == Recency Heap ==
/// Bounded container with least-recently-touched eviction.
#[derive(Debug)]
pub struct RecencyHeap<K, V> {
    /// Entry storage addressed by stable slot indices
    slots: Vec<Option<Slot<K, V>>>,
    /// Vacated slot indices available for reuse
    free: Vec<usize>,
    /// Key to slot lookup
    index: HashMap<K, usize>,
    /// Min-heap of `(recency, slot)`, possibly holding stale pairs
    order: BinaryHeap<Reverse<(u64, usize)>>,
    /// Logical clock; the next recency value to hand out
    clock: u64,
    capacity: NonZeroUsize,
    evictions: u64,
}

impl<K, V> RecencyHeap<K, V>
where
    K: Hash + Eq + Clone + Debug,
{
    // == Constructor ==
    /// Creates an empty heap holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.get()),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity.get()),
            order: BinaryHeap::with_capacity(capacity.get()),
            clock: 0,
            capacity,
            evictions: 0,
        }
    }

    // == Set ==
    /// Inserts or replaces the value for `key` and marks it most recent.
    ///
    /// Inserting a new key into a full heap first evicts the least recently
    /// touched entry. Replacing an existing key never evicts.
    pub fn set(&mut self, key: K, value: V) {
        if let Some(&slot) = self.index.get(&key) {
            let recency = self.tick();
            if let Some(entry) = self.slots[slot].as_mut() {
                entry.value = value;
                entry.recency = recency;
            }
            self.order.push(Reverse((recency, slot)));
            self.compact_if_stale();
            return;
        }

        while self.index.len() >= self.capacity.get() {
            if self.evict_oldest().is_none() {
                break;
            }
        }

        let recency = self.tick();
        let entry = Slot {
            key: key.clone(),
            value,
            recency,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, slot);
        self.order.push(Reverse((recency, slot)));

        assert!(
            self.index.len() <= self.capacity.get(),
            "recency heap holds {} entries, capacity is {}",
            self.index.len(),
            self.capacity
        );
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recent.
    pub fn get(&mut self, key: &K) -> Result<&V> {
        let slot = self.slot_of(key)?;
        let recency = self.tick();
        match self.slots[slot].as_mut() {
            Some(entry) => entry.recency = recency,
            None => return Err(not_found(key)),
        }
        self.order.push(Reverse((recency, slot)));
        self.compact_if_stale();

        self.slots[slot]
            .as_ref()
            .map(|entry| &entry.value)
            .ok_or_else(|| not_found(key))
    }

    // == Delete ==
    /// Removes `key`, returning its value.
    pub fn delete(&mut self, key: &K) -> Result<V> {
        let slot = self.index.remove(key).ok_or_else(|| not_found(key))?;
        let entry = self.slots[slot].take().ok_or_else(|| not_found(key))?;
        self.free.push(slot);
        // The pair left in `order` is stale now that the slot is empty.
        self.compact_if_stale();
        Ok(entry.value)
    }

    // == Contains ==
    /// Membership test without touching the entry.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the heap holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Capacity ==
    /// Maximum number of entries held at once.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    // == Evictions ==
    /// Number of entries removed to make room for new keys.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    // == Iterate ==
    /// Snapshot of the keys, least recently touched first.
    ///
    /// The iterator owns its snapshot: later changes to the heap are not
    /// reflected in it.
    pub fn iter(&self) -> Keys<K> {
        let mut live: Vec<(u64, &K)> = self
            .slots
            .iter()
            .flatten()
            .map(|entry| (entry.recency, &entry.key))
            .collect();
        live.sort_unstable_by_key(|(recency, _)| *recency);

        Keys {
            inner: live
                .into_iter()
                .map(|(_, key)| key.clone())
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently touched entry.
    fn evict_oldest(&mut self) -> Option<(K, V)> {
        while let Some(Reverse((recency, slot))) = self.order.pop() {
            let live = matches!(&self.slots[slot], Some(entry) if entry.recency == recency);
            if !live {
                continue;
            }

            let entry = self.slots[slot].take()?;
            self.index.remove(&entry.key);
            self.free.push(slot);
            self.evictions += 1;
            debug!(key = ?entry.key, recency, "evicted least recent entry");
            return Some((entry.key, entry.value));
        }
        None
    }

    fn slot_of(&self, key: &K) -> Result<usize> {
        self.index.get(key).copied().ok_or_else(|| not_found(key))
    }

    fn tick(&mut self) -> u64 {
        let recency = self.clock;
        self.clock += 1;
        recency
    }

    /// Rebuilds the order heap from live slots once stale pairs dominate it.
    fn compact_if_stale(&mut self) {
        let limit = (self.index.len() * COMPACT_FACTOR).max(COMPACT_MIN);
        if self.order.len() <= limit {
            return;
        }

        let before = self.order.len();
        self.order = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|e| Reverse((e.recency, slot))))
            .collect();
        debug!(before, after = self.order.len(), "compacted recency order");
    }
}

fn not_found<K: Debug>(key: &K) -> MidwareError {
    MidwareError::KeyNotFound(format!("{:?}", key))
}

// == Keys Iterator ==
/// Keys in eviction order, produced by [`RecencyHeap::iter`].
#[derive(Debug)]
pub struct Keys<K> {
    inner: std::vec::IntoIter<K>,
}

impl<K> Iterator for Keys<K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Keys<K> {}
