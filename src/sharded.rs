//! Sharded, thread-safe cache over any policy.
//!
//! Keys are spread across independently locked shards so threads touching
//! different shards never contend.
//!
//! ```text
//!   ShardedCache<K, V>
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │ selector: ShardSelector (seeded FxHash % N)                      │
//!   │                                                                  │
//!   │ shards: Vec<Mutex<Cache<K, V>>>                                  │
//!   │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐            │
//!   │   │ shard 0  │ │ shard 1  │ │ shard 2  │ │ shard 3  │            │
//!   │   │ cap c/N+1│ │ cap c/N  │ │ cap c/N  │ │ cap c/N  │            │
//!   │   └──────────┘ └──────────┘ └──────────┘ └──────────┘            │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Shard capacities sum to the configured total, so `len() <= capacity()`
//! holds globally. Eviction is per shard: the victim is the policy's choice
//! within the shard the new key hashes to, not across the whole cache.

use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::builder::{Cache, CachePolicy};
use crate::ds::ShardSelector;
use crate::error::InvariantError;
use crate::traits::{ConcurrentCache, CoreCache, MutableCache};

/// Thread-safe cache split into `Mutex`-guarded shards.
///
/// # Example
///
/// ```
/// use evictkit::builder::CachePolicy;
/// use evictkit::sharded::ShardedCache;
///
/// let cache = ShardedCache::new(CachePolicy::Lru, 64, 4);
/// cache.insert("user:1", 42);
/// assert_eq!(cache.get(&"user:1"), Some(42));
/// assert_eq!(cache.shard_count(), 4);
/// ```
pub struct ShardedCache<K, V> {
    shards: Vec<Mutex<Cache<K, V>>>,
    selector: ShardSelector,
    policy: CachePolicy,
    capacity: usize,
}

impl<K, V> ShardedCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache of `capacity` entries over `shards` shards.
    ///
    /// A bounded capacity smaller than `shards` reduces the shard count to the
    /// capacity so that no shard ends up with capacity 0 (unbounded).
    pub fn new(policy: CachePolicy, capacity: usize, shards: usize) -> Self {
        Self::with_seed(policy, capacity, shards, 0)
    }

    /// Like [`new`](Self::new), with a seed mixed into shard selection.
    pub fn with_seed(policy: CachePolicy, capacity: usize, shards: usize, seed: u64) -> Self {
        let shards = if capacity == 0 {
            shards.max(1)
        } else {
            shards.clamp(1, capacity)
        };
        let selector = ShardSelector::new(shards, seed);
        let shards = (0..shards)
            .map(|index| Mutex::new(Cache::new(policy, selector.shard_capacity(capacity, index))))
            .collect();
        Self {
            shards,
            selector,
            policy,
            capacity,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Shard index `key` maps to.
    pub fn shard_for_key(&self, key: &K) -> usize {
        self.selector.shard_for_key(key)
    }

    fn shard(&self, key: &K) -> &Mutex<Cache<K, V>> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.shard(&key).lock().insert(key, value)
    }

    /// Reads `key`, recording the access under the shard's policy.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).lock().get(key).cloned()
    }

    /// Reads `key` without recording an access.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.shard(key).lock().peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).lock().contains(key)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.shard(key).lock().remove(key)
    }

    /// Total entries across shards. Each shard is locked in turn, so the sum
    /// is not a single atomic snapshot under concurrent writes.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Configured total capacity; `0` means unbounded.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
    }

    /// Runs each shard's invariant check.
    ///
    /// # Errors
    ///
    /// Returns the first failing shard's error prefixed with its index, or an
    /// error if a shard's capacity no longer matches its share of the total.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        for (index, shard) in self.shards.iter().enumerate() {
            let cache = shard.lock();
            cache
                .check_invariants()
                .map_err(|err| InvariantError::new(format!("shard {index}: {err}")))?;
            let expected = self.selector.shard_capacity(self.capacity, index);
            if cache.capacity() != expected {
                return Err(InvariantError::new(format!(
                    "shard {index} has capacity {} instead of {expected}",
                    cache.capacity()
                )));
            }
        }
        Ok(())
    }

    /// Metrics of every shard merged into one snapshot.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> crate::metrics::CacheMetricsSnapshot {
        let mut total = crate::metrics::CacheMetricsSnapshot::default();
        for shard in &self.shards {
            total.merge(&shard.lock().metrics_snapshot());
        }
        total
    }
}

impl<K, V> ConcurrentCache for ShardedCache<K, V>
where
    K: Send,
    V: Send,
{
}

impl<K, V> fmt::Debug for ShardedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShardedCache")
            .field("policy", &self.policy)
            .field("shards", &self.shards.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
