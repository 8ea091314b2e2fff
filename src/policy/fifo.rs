//! # First In, First Out (FIFO) Cache
//!
//! Evicts the entry that has been resident longest. Reads never change the
//! order; overwriting an existing key keeps its original position.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          FifoCache<K, V>                             │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>                                        │
//!   │   ┌─────────┬────────┐                                               │
//!   │   │  key_a  │ id_0   │──┐                                            │
//!   │   │  key_b  │ id_1   │──┼──┐                                         │
//!   │   │  key_c  │ id_2   │──┼──┼──┐                                      │
//!   │   └─────────┴────────┘  │  │  │                                      │
//!   │                         ▼  ▼  ▼                                      │
//!   │   order: EvictionList<Entry<K, V>>                                   │
//!   │   head ──► [a] ◄──► [b] ◄──► [c] ◄── tail                            │
//!   │          oldest               newest                                 │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method          | Complexity | Description                               |
//! |-----------------|------------|-------------------------------------------|
//! | `insert(k, v)`  | O(1)       | Insert or overwrite; may evict the oldest |
//! | `get(&k)`       | O(1)       | Read without reordering                   |
//! | `peek(&k)`      | O(1)       | Same as `get`, through `&self`            |
//! | `remove(&k)`    | O(1)       | Unlink by slot handle                     |
//! | `pop_oldest()`  | O(1)       | Remove the oldest entry                   |
//! | `age_rank(&k)`  | O(n)       | Position in insertion order               |
//!
//! ## Capacity
//!
//! `FifoCache::new(0)` is unbounded: nothing is ever evicted.
//!
//! ## Thread Safety
//!
//! `FifoCache` is single-threaded. [`ConcurrentFifoCache`] (feature
//! `concurrency`) wraps it in one `parking_lot::RwLock`.

use std::fmt;
use std::hash::Hash;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

#[cfg(feature = "concurrency")]
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::{EvictionList, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::{
    CacheMetrics, CacheMetricsSnapshot, CoreMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{CoreCache, FifoCacheTrait, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// FIFO cache over a key index and an insertion-ordered [`EvictionList`].
///
/// # Example
///
/// ```
/// use evictkit::policy::fifo::FifoCache;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = FifoCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a"); // does not protect "a"
/// cache.insert("c", 3);
///
/// assert!(!cache.contains(&"a"));
/// assert!(cache.contains(&"b"));
/// assert!(cache.contains(&"c"));
/// ```
pub struct FifoCache<K, V> {
    index: FxHashMap<K, SlotId>,
    order: EvictionList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache holding at most `capacity` entries; `0` means unbounded.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: EvictionList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::new(),
        }
    }

    /// Returns `true` if the cache never evicts.
    pub fn is_unbounded(&self) -> bool {
        self.capacity == 0
    }

    /// Reads a value through `&self`. FIFO reads never reorder, so this is
    /// [`get`](CoreCache::get) without the metrics.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.order.get(id).map(|entry| &entry.value)
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter().map(|entry| &entry.key)
    }

    fn is_full(&self) -> bool {
        self.capacity != 0 && self.index.len() >= self.capacity
    }

    fn unlink_oldest(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_front()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn evict(&mut self) {
        if self.unlink_oldest().is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
            tracing::trace!(
                policy = "fifo",
                capacity = self.capacity,
                len = self.index.len(),
                "evicted oldest entry"
            );
        }
    }

    /// Cross-checks the key index against the insertion list.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "fifo index holds {} keys but order list holds {} entries",
                self.index.len(),
                self.order.len()
            )));
        }
        if self.capacity != 0 && self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "fifo holds {} entries over capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for (position, id) in self.order.iter_ids().enumerate() {
            let entry = self.order.get(id).ok_or_else(|| {
                InvariantError::new(format!("order list links a freed slot {id:?}"))
            })?;
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "entry at position {position} is not indexed under its own slot"
                )));
            }
        }
        Ok(())
    }

    #[inline]
    fn debug_validate(&self) {
        debug_assert_eq!(self.index.len(), self.order.len());
        debug_assert!(self.capacity == 0 || self.index.len() <= self.capacity);
    }
}

impl<K, V> CoreCache<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            // Overwrite in place; insertion position is unchanged.
            return self
                .order
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.is_full() {
            self.evict();
        }

        let id = self.order.push_back(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);

        self.debug_validate();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match self.index.get(key) {
            Some(&id) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                self.order.get(id).map(|entry| &entry.value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
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
        self.order.clear();
    }
}

impl<K, V> MutableCache<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        let value = self.order.remove(id).map(|entry| entry.value);

        #[cfg(feature = "metrics")]
        self.metrics.record_remove();

        self.debug_validate();
        value
    }
}

impl<K, V> FifoCacheTrait<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_oldest(&mut self) -> Option<(K, V)> {
        let popped = self.unlink_oldest();
        self.debug_validate();
        popped
    }

    fn peek_oldest(&self) -> Option<(&K, &V)> {
        self.order.front().map(|entry| (&entry.key, &entry.value))
    }

    fn age_rank(&self, key: &K) -> Option<usize> {
        let id = *self.index.get(key)?;
        self.order.iter_ids().position(|candidate| candidate == id)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.capacity)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for FifoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe FIFO cache: one `RwLock` guards the index and the order list
/// together.
///
/// Values are returned by clone; store `Arc<V>` to make that cheap.
///
/// ```
/// use evictkit::policy::fifo::ConcurrentFifoCache;
///
/// let cache = ConcurrentFifoCache::new(2);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.insert(3, "three");
/// assert_eq!(cache.get(&1), None);
/// assert_eq!(cache.get(&3), Some("three"));
/// ```
#[cfg(feature = "concurrency")]
#[derive(Clone)]
pub struct ConcurrentFifoCache<K, V> {
    inner: Arc<RwLock<FifoCache<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentFifoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FifoCache::new(capacity))),
        }
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Write guard: the lookup records hit/miss counters when `metrics` is on.
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

    pub fn pop_oldest(&self) -> Option<(K, V)> {
        self.inner.write().pop_oldest()
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
impl<K, V> ConcurrentFifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> crate::traits::ConcurrentCache for ConcurrentFifoCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentFifoCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentFifoCache")
            .field("len", &cache.index.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}
