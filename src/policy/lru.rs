//! # Least Recently Used (LRU) Cache
//!
//! Evicts the entry whose last access is oldest. Both `get` hits and
//! `insert` (new key or overwrite) count as an access.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                        ConcurrentLruCache<K, V>                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                    Arc<RwLock<LruCache<K, V>>>                     │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                  │                                       │
//!   │                                  ▼                                       │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  index: FxHashMap<K, SlotId>                                       │ │
//!   │   │                                                                    │ │
//!   │   │  order: EvictionList<Entry<K, V>>                                  │ │
//!   │   │    head ──► [C] ◄──► [A] ◄──► [B] ◄── tail                         │ │
//!   │   │            (LRU)                (MRU)                              │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## LRU Operations Flow
//!
//! ```text
//!   get(A) on  head ──► [A] ◄──► [B] ◄──► [C] ◄── tail
//!     1. index lookup: O(1)
//!     2. move_to_back(id_A): O(1)
//!   after      head ──► [B] ◄──► [C] ◄──► [A] ◄── tail
//!
//!   insert(D) when full
//!     1. pop_front() evicts [B]
//!     2. push_back([D])
//!   after      head ──► [C] ◄──► [A] ◄──► [D] ◄── tail
//! ```
//!
//! ## Methods
//!
//! | Method           | Complexity | Description                               |
//! |------------------|------------|-------------------------------------------|
//! | `insert(k, v)`   | O(1)       | Insert or update, moves to MRU            |
//! | `get(&k)`        | O(1)       | Read and move to MRU                      |
//! | `peek(&k)`       | O(1)       | Read without reordering                   |
//! | `remove(&k)`     | O(1)       | Unlink by slot handle                     |
//! | `touch(&k)`      | O(1)       | Move to MRU without reading               |
//! | `pop_lru()`      | O(1)       | Remove least recently used                |
//! | `recency_rank()` | O(n)       | Position in recency order (0 = MRU)       |
//!
//! ## Concurrency Model
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────┐
//!   │                     RwLock                               │
//!   │  get()/touch() take the WRITE lock (they reorder)        │
//!   │  insert()/remove()/pop_lru() take the WRITE lock         │
//!   │  peek()/contains()/len() take the READ lock              │
//!   └──────────────────────────────────────────────────────────┘
//! ```
//!
//! A capacity of `0` is unbounded.

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
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// LRU cache over a key index and an access-ordered [`EvictionList`].
///
/// ```
/// use evictkit::policy::lru::LruCache;
/// use evictkit::traits::CoreCache;
///
/// let mut cache = LruCache::new(2);
/// cache.insert("a", 1);
/// cache.insert("b", 2);
/// cache.get(&"a");
/// cache.insert("c", 3);
///
/// assert!(cache.contains(&"a"));
/// assert!(!cache.contains(&"b"));
/// ```
pub struct LruCache<K, V> {
    index: FxHashMap<K, SlotId>,
    order: EvictionList<Entry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LruCache<K, V>
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

    pub fn is_unbounded(&self) -> bool {
        self.capacity == 0
    }

    /// Reads a value without changing recency.
    ///
    /// ```
    /// use evictkit::policy::lru::LruCache;
    /// use evictkit::traits::CoreCache;
    ///
    /// let mut cache = LruCache::new(2);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    /// assert_eq!(cache.peek(&1), Some(&"first"));
    ///
    /// // 1 is still least recently used
    /// cache.insert(3, "third");
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.order.get(id).map(|entry| &entry.value)
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.order.iter().map(|entry| (&entry.key, &entry.value))
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter().map(|entry| &entry.key)
    }

    fn is_full(&self) -> bool {
        self.capacity != 0 && self.index.len() >= self.capacity
    }

    fn unlink_lru(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_front()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn evict(&mut self) {
        if self.unlink_lru().is_some() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
            tracing::trace!(
                policy = "lru",
                capacity = self.capacity,
                len = self.index.len(),
                "evicted least recently used entry"
            );
        }
    }

    /// Cross-checks the key index against the recency list.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError`] describing the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.index.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "lru index holds {} keys but recency list holds {} entries",
                self.index.len(),
                self.order.len()
            )));
        }
        if self.capacity != 0 && self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "lru holds {} entries over capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for id in self.order.iter_ids() {
            let entry = self.order.get(id).ok_or_else(|| {
                InvariantError::new(format!("recency list links a freed slot {id:?}"))
            })?;
            if self.index.get(&entry.key) != Some(&id) {
                return Err(InvariantError::new(format!(
                    "slot {id:?} is not indexed under its own key"
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

impl<K, V> CoreCache<K, V> for LruCache<K, V>
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
                .order
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.order.move_to_back(id);
            return previous;
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
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.order.move_to_back(id);
        self.order.get(id).map(|entry| &entry.value)
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

impl<K, V> MutableCache<K, V> for LruCache<K, V>
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

impl<K, V> LruCacheTrait<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        let popped = self.unlink_lru();
        self.debug_validate();
        popped
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.front().map(|entry| (&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.order.move_to_back(id),
            None => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let id = *self.index.get(key)?;
        let from_lru = self.order.iter_ids().position(|candidate| candidate == id)?;
        Some(self.order.len() - 1 - from_lru)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.index.len(), self.capacity)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LRU cache: one `RwLock` guards the index and the recency list
/// together, and every reordering read takes the write side.
///
/// ```
/// use evictkit::policy::lru::ConcurrentLruCache;
///
/// let cache = ConcurrentLruCache::new(2);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// assert_eq!(cache.get(&1), Some("one"));
/// cache.insert(3, "three");
/// assert!(!cache.contains(&2));
/// ```
#[cfg(feature = "concurrency")]
#[derive(Clone)]
pub struct ConcurrentLruCache<K, V> {
    inner: Arc<RwLock<LruCache<K, V>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Reads `key` and marks it most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.write().get(key).cloned()
    }

    /// Reads `key` without changing recency; only takes the read lock.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner.read().peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn touch(&self, key: &K) -> bool {
        self.inner.write().touch(key)
    }

    pub fn pop_lru(&self) -> Option<(K, V)> {
        self.inner.write().pop_lru()
    }

    pub fn peek_lru(&self) -> Option<(K, V)> {
        self.inner
            .read()
            .peek_lru()
            .map(|(key, value)| (key.clone(), value.clone()))
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
impl<K, V> ConcurrentLruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> crate::traits::ConcurrentCache for ConcurrentLruCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("ConcurrentLruCache")
            .field("len", &cache.index.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==============================================
    // CORRECTNESS TESTS MODULE
    // ==============================================
    mod correctness {
        use super::*;

        mod basic_behavior {
            use super::*;

            #[test]
            fn test_new_cache_creation() {
                let cache: LruCache<i32, i32> = LruCache::new(10);
                assert_eq!(cache.capacity(), 10);
                assert_eq!(cache.len(), 0);

                let unbounded: LruCache<i32, i32> = LruCache::new(0);
                assert!(unbounded.is_unbounded());
            }

            #[test]
            fn test_insert_duplicate_key() {
                let mut cache = LruCache::new(5);
                assert_eq!(cache.insert(1, 100), None);
                assert_eq!(cache.insert(1, 200), Some(100));
                assert_eq!(cache.len(), 1);
                assert_eq!(cache.get(&1), Some(&200));
            }

            #[test]
            fn test_remove_existing_and_missing() {
                let mut cache = LruCache::new(5);
                cache.insert(1, 100);
                assert_eq!(cache.remove(&2), None);
                assert_eq!(cache.len(), 1);
                assert_eq!(cache.remove(&1), Some(100));
                assert!(!cache.contains(&1));
                assert_eq!(cache.get(&1), None);
                cache.check_invariants().unwrap();
            }

            #[test]
            fn test_extend_inserts_in_order() {
                let mut cache = LruCache::new(2);
                cache.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
                assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
            }
        }

        mod eviction {
            use super::*;

            #[test]
            fn test_get_promotes_entry() {
                let mut cache = LruCache::new(2);
                cache.insert("a", 1);
                cache.insert("b", 2);
                cache.get(&"a");
                cache.insert("c", 3);

                assert!(cache.contains(&"a"));
                assert!(!cache.contains(&"b"));
                assert!(cache.contains(&"c"));
                cache.check_invariants().unwrap();
            }

            #[test]
            fn test_update_promotes_entry() {
                let mut cache = LruCache::new(2);
                cache.insert("a", 1);
                cache.insert("b", 2);
                cache.insert("a", 10);
                cache.insert("c", 3);
                assert_eq!(cache.peek(&"a"), Some(&10));
                assert!(!cache.contains(&"b"));
            }

            #[test]
            fn test_peek_does_not_promote() {
                let mut cache = LruCache::new(2);
                cache.insert(1, ());
                cache.insert(2, ());
                cache.peek(&1);
                cache.insert(3, ());
                assert!(!cache.contains(&1));
            }

            #[test]
            fn test_miss_does_not_change_order() {
                let mut cache = LruCache::new(2);
                cache.insert(1, ());
                cache.insert(2, ());
                assert_eq!(cache.get(&9), None);
                assert_eq!(cache.peek_lru(), Some((&1, &())));
            }

            #[test]
            fn test_capacity_one() {
                let mut cache = LruCache::new(1);
                for i in 0..10 {
                    cache.insert(i, i);
                    assert_eq!(cache.len(), 1);
                    assert_eq!(cache.peek(&i), Some(&i));
                }
            }

            #[test]
            fn test_zero_capacity_never_evicts() {
                let mut cache = LruCache::new(0);
                for i in 0..500 {
                    cache.insert(i, i);
                }
                assert_eq!(cache.len(), 500);
                cache.check_invariants().unwrap();
            }
        }

        mod lru_trait {
            use super::*;

            #[test]
            fn test_touch_and_recency_rank() {
                let mut cache = LruCache::new(3);
                cache.insert('a', 1);
                cache.insert('b', 2);
                cache.insert('c', 3);
                assert_eq!(cache.recency_rank(&'c'), Some(0));
                assert_eq!(cache.recency_rank(&'a'), Some(2));

                assert!(cache.touch(&'a'));
                assert!(!cache.touch(&'z'));
                assert_eq!(cache.recency_rank(&'a'), Some(0));
                assert_eq!(cache.peek_lru(), Some((&'b', &2)));
            }

            #[test]
            fn test_pop_lru_drains_in_recency_order() {
                let mut cache = LruCache::new(3);
                cache.insert(1, "one");
                cache.insert(2, "two");
                cache.insert(3, "three");
                cache.get(&1);

                assert_eq!(cache.pop_lru(), Some((2, "two")));
                assert_eq!(cache.pop_lru(), Some((3, "three")));
                assert_eq!(cache.pop_lru(), Some((1, "one")));
                assert_eq!(cache.pop_lru(), None);
            }

            #[test]
            fn test_remove_batch_default() {
                let mut cache = LruCache::new(4);
                cache.extend([(1, 1), (2, 2), (3, 3)]);
                assert_eq!(cache.remove_batch(&[1, 4, 3]), vec![Some(1), None, Some(3)]);
                assert_eq!(cache.len(), 1);
            }
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn test_metrics_count_hits_and_evictions() {
            let mut cache = LruCache::new(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.get(&1);
            cache.insert(3, 3);
            cache.get(&2);

            let snap = cache.metrics_snapshot();
            assert_eq!(snap.get_hits, 1);
            assert_eq!(snap.get_misses, 1);
            assert_eq!(snap.evicted_entries, 1);
            assert_eq!(snap.cache_len, 2);
            assert_eq!(snap.capacity, 2);
        }
    }

    #[cfg(feature = "concurrency")]
    mod concurrent {
        use super::*;

        #[test]
        fn test_concurrent_wrapper_roundtrip() {
            let cache = ConcurrentLruCache::new(2);
            cache.insert(1, "one".to_string());
            cache.insert(2, "two".to_string());

            assert!(cache.touch(&1));
            assert_eq!(cache.peek_lru(), Some((2, "two".to_string())));
            assert_eq!(cache.pop_lru(), Some((2, "two".to_string())));
            assert_eq!(cache.len(), 1);
            assert_eq!(cache.remove(&1), Some("one".to_string()));
            assert!(cache.is_empty());
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_concurrent_threads_respect_capacity() {
            let cache = ConcurrentLruCache::new(16);
            let handles: Vec<_> = (0..4u64)
                .map(|t| {
                    let cache = cache.clone();
                    std::thread::spawn(move || {
                        for i in 0..500u64 {
                            let key = (t * 1000 + i) % 64;
                            cache.insert(key, i);
                            cache.get(&((key + 1) % 64));
                            if i % 7 == 0 {
                                cache.remove(&key);
                            }
                            assert!(cache.len() <= 16);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            assert!(cache.len() <= 16);
            cache.check_invariants().unwrap();
        }
    }
}
