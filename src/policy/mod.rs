//! Eviction policy implementations.
//!
//! | Module   | Cache                                   | Ordering structure |
//! |----------|-----------------------------------------|--------------------|
//! | [`fifo`] | [`FifoCache`](fifo::FifoCache)          | `EvictionList`     |
//! | [`lru`]  | [`LruCache`](lru::LruCache)             | `EvictionList`     |
//! | [`lfu`]  | [`LfuCache`](lfu::LfuCache)             | `FrequencyHeap`    |

pub mod fifo;
pub mod lfu;
pub mod lru;
