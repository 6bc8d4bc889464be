//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the heap against a simple ordered-list model.

use proptest::prelude::*;
use std::num::NonZeroUsize;
use std::time::Duration;

use crate::cache::{MemoryCache, RecencyHeap};

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..16
}

#[derive(Debug, Clone)]
enum HeapOp {
    Set { key: u8, value: u32 },
    Get { key: u8 },
    Delete { key: u8 },
}

fn heap_op_strategy() -> impl Strategy<Value = HeapOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| HeapOp::Set { key, value }),
        key_strategy().prop_map(|key| HeapOp::Get { key }),
        key_strategy().prop_map(|key| HeapOp::Delete { key }),
    ]
}

// == Reference Model ==
/// Keys ordered least recent first, with their values.
#[derive(Default)]
struct Model {
    order: Vec<(u8, u32)>,
    capacity: usize,
}

impl Model {
    fn position(&self, key: u8) -> Option<usize> {
        self.order.iter().position(|(k, _)| *k == key)
    }

    fn set(&mut self, key: u8, value: u32) {
        if let Some(pos) = self.position(key) {
            self.order.remove(pos);
        } else if self.order.len() >= self.capacity {
            self.order.remove(0);
        }
        self.order.push((key, value));
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let pos = self.position(key)?;
        let entry = self.order.remove(pos);
        self.order.push(entry);
        Some(entry.1)
    }

    fn delete(&mut self, key: u8) -> Option<u32> {
        let pos = self.position(key)?;
        Some(self.order.remove(pos).1)
    }

    fn keys(&self) -> Vec<u8> {
        self.order.iter().map(|(k, _)| *k).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every operation agrees with the model, and iteration order matches
    // the model's recency order after each step.
    #[test]
    fn prop_heap_matches_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(heap_op_strategy(), 1..300)
    ) {
        let mut heap = RecencyHeap::new(NonZeroUsize::new(capacity).unwrap());
        let mut model = Model { capacity, ..Model::default() };

        for op in ops {
            match op {
                HeapOp::Set { key, value } => {
                    heap.set(key, value);
                    model.set(key, value);
                }
                HeapOp::Get { key } => {
                    let got = heap.get(&key).ok().copied();
                    prop_assert_eq!(got, model.get(key));
                }
                HeapOp::Delete { key } => {
                    prop_assert_eq!(heap.delete(&key).ok(), model.delete(key));
                }
            }

            prop_assert!(heap.len() <= capacity);
            prop_assert_eq!(heap.iter().collect::<Vec<_>>(), model.keys());
        }
    }

    // With no reads in between, the heap keeps exactly the last C distinct keys.
    #[test]
    fn prop_keeps_most_recent_inserts(
        capacity in 1usize..10,
        extra in 1usize..20
    ) {
        let mut heap = RecencyHeap::new(NonZeroUsize::new(capacity).unwrap());
        let total = capacity + extra;
        for key in 0..total {
            heap.set(key, ());
        }

        let expected: Vec<usize> = (total - capacity..total).collect();
        prop_assert_eq!(heap.iter().collect::<Vec<_>>(), expected);
        prop_assert_eq!(heap.evictions(), extra as u64);
    }

    // A read protects a key from the next eviction regardless of how often
    // other keys were touched beforehand.
    #[test]
    fn prop_read_protects_from_next_eviction(
        capacity in 2usize..8,
        protected in 0usize..8,
        noise in prop::collection::vec(0usize..8, 0..50)
    ) {
        let protected = protected % capacity;
        let mut heap = RecencyHeap::new(NonZeroUsize::new(capacity).unwrap());
        for key in 0..capacity {
            heap.set(key, ());
        }
        for key in noise {
            let _ = heap.get(&(key % capacity));
        }

        heap.get(&protected).unwrap();
        heap.set(capacity, ());

        prop_assert!(heap.contains(&protected));
        prop_assert!(heap.contains(&capacity));
        prop_assert_eq!(heap.len(), capacity);
    }

    // Round trip through the expiring cache before expiry.
    #[test]
    fn prop_memory_cache_roundtrip(key in "[a-z/]{1,32}", payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut cache = MemoryCache::new(4, Duration::from_secs(60)).unwrap();
        cache.set_data(key.clone(), payload.clone(), None);
        prop_assert_eq!(cache.get_data(&key), Some(payload));
    }
}
