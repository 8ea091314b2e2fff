//! evictkit: bounded in-memory key-value caches with FIFO, LRU and LFU eviction.
//!
//! Every policy pairs a hash index (`FxHashMap<K, SlotId>`) with an ordering
//! structure living in a slot arena, so lookups, updates and evictions never
//! search:
//!
//! | Policy | Cache                         | Ordering structure      | Victim                      |
//! |--------|-------------------------------|-------------------------|-----------------------------|
//! | FIFO   | [`policy::fifo::FifoCache`]   | [`ds::EvictionList`]    | oldest insertion            |
//! | LRU    | [`policy::lru::LruCache`]     | [`ds::EvictionList`]    | oldest access               |
//! | LFU    | [`policy::lfu::LfuCache`]     | [`ds::FrequencyHeap`]   | fewest accesses, then oldest|
//!
//! A capacity of `0` means unbounded for every policy.
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let mut cache = LruCache::new(2);
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! cache.get(&"a");
//! cache.insert("c", 3);
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! ```
//!
//! ## Features
//!
//! - `concurrency` (default): `RwLock`-wrapped `Concurrent*Cache` facades and
//!   the [`sharded::ShardedCache`], built on `parking_lot`.
//! - `metrics`: per-cache operation counters and snapshots.
//!
//! Evictions are reported as `tracing` events at `TRACE` level; the library
//! never installs a subscriber.

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod policy;
pub mod prelude;
#[cfg(feature = "concurrency")]
pub mod sharded;
pub mod traits;

pub use builder::{Cache, CacheBuilder, CacheConfig, CachePolicy};
pub use error::{ConfigError, InvariantError};
