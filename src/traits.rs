//! # Cache Trait Hierarchy
//!
//! One capability set shared by every eviction policy, plus a small
//! policy-specific extension trait per policy.
//!
//! ## Architecture
//!
//! ```text
//!                     ┌─────────────────────────────────────────┐
//!                     │            CoreCache<K, V>              │
//!                     │                                         │
//!                     │  insert(&mut, K, V) → Option<V>         │
//!                     │  get(&mut, &K) → Option<&V>             │
//!                     │  contains(&, &K) → bool                 │
//!                     │  len(&) → usize                         │
//!                     │  capacity(&) → usize   (0 = unbounded)  │
//!                     │  clear(&mut)                            │
//!                     └──────────────────┬──────────────────────┘
//!                                        │
//!                     ┌──────────────────┴──────────────────────┐
//!                     │           MutableCache<K, V>            │
//!                     │  remove(&K) → Option<V>                 │
//!                     └──────────────────┬──────────────────────┘
//!                                        │
//!          ┌─────────────────────────────┼─────────────────────────────┐
//!          ▼                             ▼                             ▼
//!  ┌──────────────────┐        ┌──────────────────┐        ┌──────────────────┐
//!  │ FifoCacheTrait   │        │ LruCacheTrait    │        │ LfuCacheTrait    │
//!  │  pop_oldest      │        │  pop_lru         │        │  pop_lfu         │
//!  │  peek_oldest     │        │  peek_lru        │        │  peek_lfu        │
//!  │  age_rank        │        │  touch           │        │  frequency       │
//!  │                  │        │  recency_rank    │        │  reset/increment │
//!  └──────────────────┘        └──────────────────┘        └──────────────────┘
//! ```
//!
//! ## Policy Comparison
//!
//! | Policy | Eviction Basis                  | `get` reorders | Remove |
//! |--------|---------------------------------|----------------|--------|
//! | FIFO   | Insertion order                 | No             | Yes    |
//! | LRU    | Last access                     | Yes            | Yes    |
//! | LFU    | Access count, then last access  | Yes            | Yes    |
//!
//! Every policy supports arbitrary removal. The FIFO order list is a linked
//! list addressed by slot handle, so removing from the middle keeps insertion
//! order exact for the survivors.
//!
//! ## Capacity
//!
//! A capacity of `0` means **unbounded** for every policy: inserts never evict.
//!
//! ## Thread Safety
//!
//! The policy cores take `&mut self` and are not synchronized. The
//! `concurrency` feature adds lock-wrapped facades that implement the
//! [`ConcurrentCache`] marker.

/// Core cache operations that all policies support.
///
/// # Example
///
/// ```
/// use evictkit::traits::CoreCache;
/// use evictkit::policy::lru::LruCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key was
    /// resident.
    ///
    /// Inserting a new key into a full cache evicts exactly one entry chosen
    /// by the policy first.
    ///
    /// ```
    /// use evictkit::traits::CoreCache;
    /// use evictkit::policy::fifo::FifoCache;
    ///
    /// let mut cache = FifoCache::new(10);
    /// assert_eq!(cache.insert(1, "first"), None);
    /// assert_eq!(cache.insert(1, "second"), Some("first"));
    /// ```
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up a value. LRU and LFU record the access; FIFO does not.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks residency without recording an access.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries; `0` means unbounded.
    fn capacity(&self) -> usize;

    /// Removes every entry.
    fn clear(&mut self);
}

/// Caches that support removal by key.
///
/// ```
/// use evictkit::traits::{CoreCache, MutableCache};
/// use evictkit::policy::lfu::LfuCache;
///
/// fn invalidate<C: MutableCache<u64, &'static str>>(cache: &mut C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let mut cache = LfuCache::new(8);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// invalidate(&mut cache, &[1, 3]);
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value. Removing an absent key is a no-op.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes each key in turn.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// FIFO-specific operations.
pub trait FifoCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the oldest entry.
    fn pop_oldest(&mut self) -> Option<(K, V)>;

    /// Returns the oldest entry without removing it.
    fn peek_oldest(&self) -> Option<(&K, &V)>;

    /// Position of `key` in insertion order (0 = oldest). O(n).
    fn age_rank(&self, key: &K) -> Option<usize>;
}

/// LRU-specific operations.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without touching it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used; `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Position of `key` in recency order (0 = most recently used). O(n).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// LFU-specific operations.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the entry that would be evicted next.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Returns the entry that would be evicted next.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Current access count of `key`.
    fn frequency(&self, key: &K) -> Option<u64>;
}

/// Marker for caches that are safe to share between threads.
///
/// Implemented by the lock-wrapped facades. Every operation on such a cache
/// runs its full read-modify-write under one instance-wide (or shard-wide)
/// guard.
pub trait ConcurrentCache: Send + Sync {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Unbounded map cache used to exercise default methods.
    struct MapCache(HashMap<i32, String>);

    impl CoreCache<i32, String> for MapCache {
        fn insert(&mut self, key: i32, value: String) -> Option<String> {
            self.0.insert(key, value)
        }

        fn get(&mut self, key: &i32) -> Option<&String> {
            self.0.get(key)
        }

        fn contains(&self, key: &i32) -> bool {
            self.0.contains_key(key)
        }

        fn len(&self) -> usize {
            self.0.len()
        }

        fn capacity(&self) -> usize {
            0
        }

        fn clear(&mut self) {
            self.0.clear();
        }
    }

    impl MutableCache<i32, String> for MapCache {
        fn remove(&mut self, key: &i32) -> Option<String> {
            self.0.remove(key)
        }
    }

    #[test]
    fn is_empty_defaults_to_len() {
        let mut cache = MapCache(HashMap::new());
        assert!(cache.is_empty());
        cache.insert(1, "one".into());
        assert!(!cache.is_empty());
    }

    #[test]
    fn remove_batch_reports_each_key() {
        let mut cache = MapCache(HashMap::new());
        cache.insert(1, "one".into());
        cache.insert(2, "two".into());

        let removed = cache.remove_batch(&[1, 3, 2]);
        assert_eq!(removed, vec![Some("one".into()), None, Some("two".into())]);
        assert!(cache.is_empty());
    }
}
