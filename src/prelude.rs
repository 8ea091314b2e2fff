pub use crate::builder::{Cache, CacheBuilder, CacheConfig, CachePolicy};
pub use crate::ds::{EvictionList, FrequencyHeap, ShardSelector, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{CacheMetricsSnapshot, MetricsSnapshotProvider};
pub use crate::policy::fifo::FifoCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
#[cfg(feature = "concurrency")]
pub use crate::policy::{
    fifo::ConcurrentFifoCache, lfu::ConcurrentLfuCache, lru::ConcurrentLruCache,
};
#[cfg(feature = "concurrency")]
pub use crate::sharded::ShardedCache;
pub use crate::traits::{
    ConcurrentCache, CoreCache, FifoCacheTrait, LfuCacheTrait, LruCacheTrait, MutableCache,
};
