//! Unified cache builder for all eviction policies.
//!
//! Picks a policy at runtime and hides which core backs the cache.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::{CacheBuilder, CachePolicy};
//! use evictkit::traits::CoreCache;
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some(&"hello".to_string()));
//! ```
//!
//! ## Configuration
//!
//! [`CacheConfig`] carries the same knobs as plain data, for callers that load
//! settings from elsewhere:
//!
//! ```rust
//! use evictkit::builder::{CacheBuilder, CacheConfig, CachePolicy};
//! use evictkit::traits::CoreCache;
//!
//! let config = CacheConfig {
//!     capacity: 64,
//!     policy: CachePolicy::Lfu,
//!     shards: 1,
//! };
//! config.validate().unwrap();
//! let cache = CacheBuilder::from_config(&config).build::<u32, u32>(config.policy);
//! assert_eq!(cache.capacity(), 64);
//! ```

use std::fmt;
use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::fifo::FifoCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
#[cfg(feature = "concurrency")]
use crate::sharded::ShardedCache;
use crate::traits::{CoreCache, MutableCache};

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CachePolicy {
    /// First In, First Out eviction.
    Fifo,
    /// Least Recently Used eviction.
    #[default]
    Lru,
    /// Least Frequently Used eviction, ties broken by last touch.
    Lfu,
}

impl CachePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            CachePolicy::Fifo => "fifo",
            CachePolicy::Lru => "lru",
            CachePolicy::Lfu => "lfu",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Plain-data cache settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum resident entries across all shards; `0` means unbounded.
    pub capacity: usize,
    pub policy: CachePolicy,
    /// Number of independently locked shards. Only used by sharded caches.
    pub shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            policy: CachePolicy::Lru,
            shards: 1,
        }
    }
}

impl CacheConfig {
    /// Rejects configurations that cannot be built.
    ///
    /// # Errors
    ///
    /// - `shards == 0`
    /// - a bounded capacity smaller than the shard count (some shard would be
    ///   left with capacity 0, which means unbounded)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shards == 0 {
            return Err(ConfigError::new("shard count must be greater than zero"));
        }
        if self.capacity != 0 && self.shards > self.capacity {
            return Err(ConfigError::new(format!(
                "{} shards cannot split a capacity of {}",
                self.shards, self.capacity
            )));
        }
        Ok(())
    }
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

enum CacheInner<K, V> {
    Fifo(FifoCache<K, V>),
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Builds an empty cache with the given policy; `0` capacity is unbounded.
    pub fn new(policy: CachePolicy, capacity: usize) -> Self {
        let inner = match policy {
            CachePolicy::Fifo => CacheInner::Fifo(FifoCache::new(capacity)),
            CachePolicy::Lru => CacheInner::Lru(LruCache::new(capacity)),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCache::new(capacity)),
        };
        Self { inner }
    }

    /// Policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Fifo(_) => CachePolicy::Fifo,
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Lfu(_) => CachePolicy::Lfu,
        }
    }

    /// Reads a value without recording an access under any policy.
    pub fn peek(&self, key: &K) -> Option<&V> {
        match &self.inner {
            CacheInner::Fifo(fifo) => fifo.peek(key),
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Lfu(lfu) => lfu.peek(key),
        }
    }

    pub fn check_invariants(&self) -> Result<(), crate::error::InvariantError> {
        match &self.inner {
            CacheInner::Fifo(fifo) => fifo.check_invariants(),
            CacheInner::Lru(lru) => lru.check_invariants(),
            CacheInner::Lfu(lfu) => lfu.check_invariants(),
        }
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> crate::metrics::CacheMetricsSnapshot {
        match &self.inner {
            CacheInner::Fifo(fifo) => fifo.metrics_snapshot(),
            CacheInner::Lru(lru) => lru.metrics_snapshot(),
            CacheInner::Lfu(lfu) => lfu.metrics_snapshot(),
        }
    }
}

impl<K, V> CoreCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            CacheInner::Fifo(fifo) => fifo.insert(key, value),
            CacheInner::Lru(lru) => lru.insert(key, value),
            CacheInner::Lfu(lfu) => lfu.insert(key, value),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match &mut self.inner {
            CacheInner::Fifo(fifo) => fifo.get(key),
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Lfu(lfu) => lfu.get(key),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Fifo(fifo) => fifo.contains(key),
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
        }
    }

    fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Fifo(fifo) => fifo.len(),
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
        }
    }

    fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Fifo(fifo) => fifo.capacity(),
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Lfu(lfu) => lfu.capacity(),
        }
    }

    fn clear(&mut self) {
        match &mut self.inner {
            CacheInner::Fifo(fifo) => fifo.clear(),
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Lfu(lfu) => lfu.clear(),
        }
    }
}

impl<K, V> MutableCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            CacheInner::Fifo(fifo) => fifo.remove(key),
            CacheInner::Lru(lru) => lru.remove(key),
            CacheInner::Lfu(lfu) => lfu.remove(key),
        }
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            CacheInner::Fifo(fifo) => fmt::Debug::fmt(fifo, f),
            CacheInner::Lru(lru) => fmt::Debug::fmt(lru, f),
            CacheInner::Lfu(lfu) => fmt::Debug::fmt(lfu, f),
        }
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    capacity: usize,
    shards: usize,
    seed: u64,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            shards: 1,
            seed: 0,
        }
    }

    /// Builder pre-loaded with `config`'s capacity and shard count.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity).shards(config.shards)
    }

    /// Number of shards used by [`try_build_sharded`](Self::try_build_sharded).
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Seed mixed into shard selection.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build a single-threaded cache with the specified policy.
    ///
    /// ```rust
    /// use evictkit::builder::{CacheBuilder, CachePolicy};
    ///
    /// let fifo = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Fifo);
    /// let lfu = CacheBuilder::new(100).build::<u64, String>(CachePolicy::Lfu);
    /// assert_eq!(fifo.policy(), CachePolicy::Fifo);
    /// assert_eq!(lfu.policy(), CachePolicy::Lfu);
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        tracing::debug!(policy = policy.name(), capacity = self.capacity, "building cache");
        Cache::new(policy, self.capacity)
    }

    /// Build a thread-safe cache split over the configured number of shards.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when [`CacheConfig::validate`] would reject the
    /// same settings.
    #[cfg(feature = "concurrency")]
    pub fn try_build_sharded<K, V>(
        self,
        policy: CachePolicy,
    ) -> Result<ShardedCache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
    {
        let config = CacheConfig {
            capacity: self.capacity,
            policy,
            shards: self.shards,
        };
        config.validate()?;
        tracing::debug!(
            policy = policy.name(),
            capacity = self.capacity,
            shards = self.shards,
            "building sharded cache"
        );
        Ok(ShardedCache::with_seed(policy, self.capacity, self.shards, self.seed))
    }
}
