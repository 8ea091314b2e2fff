//! Key-to-shard mapping and capacity splitting for sharded caches.
//!
//! ```text
//!   key ──► FxHasher(seed, key) ──► hash % shards ──► shard index
//!
//!   total capacity 10 over 4 shards:
//!   ┌─────────┬─────────┬─────────┬─────────┐
//!   │ Shard 0 │ Shard 1 │ Shard 2 │ Shard 3 │
//!   │ cap 3   │ cap 3   │ cap 2   │ cap 2   │   sum = 10
//!   └─────────┴─────────┴─────────┴─────────┘
//! ```
//!
//! Because shard capacities always sum to the total, every shard enforcing its
//! own bound is enough to keep the whole cache within the total.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Deterministic shard selector using a seeded hash.
///
/// # Example
///
/// ```
/// use evictkit::ds::ShardSelector;
///
/// let selector = ShardSelector::new(8, 42);
/// let shard = selector.shard_for_key(&"user:123");
/// assert!(shard < 8);
/// assert_eq!(selector.shard_for_key(&"user:123"), shard);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector over `shards` shards. Zero is clamped to one.
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps `key` to a shard index in `[0, shards)`.
    pub fn shard_for_key<K: Hash + ?Sized>(&self, key: &K) -> usize {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards
    }

    /// Capacity assigned to shard `index` when `total` is split across all
    /// shards. The first `total % shards` shards take one extra slot.
    ///
    /// A `total` of zero (unbounded) stays zero for every shard.
    ///
    /// ```
    /// use evictkit::ds::ShardSelector;
    ///
    /// let selector = ShardSelector::new(4, 0);
    /// let caps: Vec<_> = (0..4).map(|i| selector.shard_capacity(10, i)).collect();
    /// assert_eq!(caps, vec![3, 3, 2, 2]);
    /// ```
    pub fn shard_capacity(&self, total: usize, index: usize) -> usize {
        let base = total / self.shards;
        let extra = total % self.shards;
        if index < extra { base + 1 } else { base }
    }
}

impl Default for ShardSelector {
    /// Single shard, seed 0.
    fn default() -> Self {
        Self::new(1, 0)
    }
}
