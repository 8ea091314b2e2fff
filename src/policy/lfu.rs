//! # Least Frequently Used (LFU) Cache
//!
//! Evicts the entry with the fewest recorded accesses. Among entries with the
//! same count, the one touched longest ago goes first.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                             │
//!   │                                                                     │
//!   │   index: FxHashMap<K, SlotId>                                       │
//!   │   ┌──────────┬──────────┐                                           │
//!   │   │   Key    │  SlotId  │                                           │
//!   │   ├──────────┼──────────┤        heap: FrequencyHeap<Entry<K, V>>   │
//!   │   │  "a"     │   id_0   │──┐                                        │
//!   │   │  "b"     │   id_1   │──┼──►   (1, t4)  ← victim                 │
//!   │   │  "c"     │   id_2   │──┘     /        \                         │
//!   │   └──────────┴──────────┘    (3, t6)    (1, t5)                     │
//!   │                                                                     │
//!   │   rank = (frequency, last_touch), smallest rank is evicted          │
//!   └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frequency Accounting
//!
//! | Operation                  | Frequency effect           | Last touch |
//! |----------------------------|----------------------------|------------|
//! | `insert` (new key)         | starts at 1                | refreshed  |
//! | `insert` (existing key)    | +1                         | refreshed  |
//! | `get` hit                  | +1                         | refreshed  |
//! | `peek` / `contains`        | none                       | unchanged  |
//!
//! Nothing else changes a count, so while a key stays cached its frequency
//! equals the number of `get` and `insert` calls that hit it, plus one.
//!
//! `last_touch` comes from a logical clock owned by the heap rather than
//! wall time, so ties on frequency always break by a strict recency order.
//!
//! ## Performance
//!
//! | Operation   | Time      |
//! |-------------|-----------|
//! | `get`       | O(log n)  |
//! | `insert`    | O(log n)  |
//! | `remove`    | O(log n)  |
//! | `peek_lfu`  | O(1)      |
//!
//! A capacity of `0` is unbounded.

use std::fmt;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::{FrequencyHeap, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetrics, CacheMetricsSnapshot, CoreMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// LFU cache over a key index and an indexed [`FrequencyHeap`].
///
/// ```
/// use evictkit::policy::lfu::LfuCache;
/// use evictkit::traits::{CoreCache, LfuCacheTrait};
///
/// let mut cache = LfuCache::new(2);
/// cache.insert("hot", 1);
/// cache.insert("cold", 2);
/// cache.get(&"hot");
/// cache.get(&"hot");
///
/// assert_eq!(cache.frequency(&"hot"), Some(3));
/// cache.insert("new", 3);
/// assert!(!cache.contains(&"cold"));
/// ```
pub struct LfuCache<K, V> {
    index: FxHashMap<K, SlotId>,
    heap: FrequencyHeap<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries; `0` means unbounded.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            heap: FrequencyHeap::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::new(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.capacity == 0
    }

    /// Reads a value without recording an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.heap.get(id).map(|entry| &entry.value)
    }

    /// Iterates entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.heap.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.heap.iter().map(|(_, entry)| &entry.key)
    }

    fn is_full(&self) -> bool {
        self.capacity != 0 && self.index.len() >= self.capacity
    }

    fn unlink_min(&mut self) -> Option<(K, V)> {
        let entry = self.heap.pop_min()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn evict(&mut self) {
        if let Some(id) = self.heap.peek_min_id() {
            let frequency = self.heap.frequency(id).unwrap_or_default();
            if self.unlink_min().is_some() {
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
                tracing::trace!(
                    policy = "lfu",
                    frequency,
                    capacity = self.capacity,
                    len = self.index.len(),
                    "evicted least frequently used entry"
                );
            }
        }
    }

    /// Cross-checks the key index against the frequency heap and confirms the
    /// heap root holds the smallest rank.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.heap.len() {
            return Err(InvariantError::new(format!(
                "lfu index holds {} keys but heap holds {} entries",
                self.index.len(),
                self.heap.len()
            )));
        }
        if self.capacity != 0 && self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "lfu holds {} entries over capacity {}",
                self.index.len(),
                self.capacity
            )));
        }

        for (key, &id) in &self.index {
            let entry = self.heap.get(id).ok_or_else(|| {
                InvariantError::new(format!("index points at freed heap slot {id:?}"))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "heap slot {id:?} holds a different key than its index entry"
                )));
            }
        }

        let rank = |id: SlotId| {
            (
                self.heap.frequency(id).unwrap_or_default(),
                self.heap.last_touch(id).unwrap_or_default(),
            )
        };
        if let Some(min_id) = self.heap.peek_min_id() {
            let min_rank = rank(min_id);
            if let Some((id, _)) = self.heap.iter().find(|(id, _)| rank(*id) < min_rank) {
                return Err(InvariantError::new(format!(
                    "heap root {min_id:?} outranks {id:?}"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    fn debug_validate(&self) {
        debug_assert_eq!(self.index.len(), self.heap.len());
        debug_assert!(self.capacity == 0 || self.index.len() <= self.capacity);
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = self
                .heap
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.heap.touch(id);
            return previous;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.is_full() {
            self.evict();
        }

        let id = self.heap.push(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        self.debug_validate();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.heap.touch(id);
        self.heap.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.heap.clear();
    }
}

impl<K, V> MutableCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        let value = self.heap.remove(id).map(|entry| entry.value);

        #[cfg(feature = "metrics")]
        self.metrics.record_remove();

        self.debug_validate();
        value
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        let popped = self.unlink_min();
        self.debug_validate();
        popped
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        self.heap.peek_min().map(|entry| (&entry.key, &entry.value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.heap.frequency(id)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.capacity)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LFU cache. `get` records an access, so it takes the write lock.
#[cfg(feature = "concurrency")]
#[derive(Clone)]
pub struct ConcurrentLfuCache<K, V> {
    inner: Arc<RwLock<LfuCache<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LfuCache::new(capacity))),
        }
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.write().get(key).cloned()
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.read().peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.read().frequency(key)
    }

    pub fn pop_lfu(&self) -> Option<(K, V)> {
        self.inner.write().pop_lfu()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }
}

#[cfg(all(feature = "concurrency", feature = "metrics"))]
impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> crate::traits::ConcurrentCache for ConcurrentLfuCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLfuCache")
            .field("len", &cache.index.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}
