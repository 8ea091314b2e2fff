pub mod eviction_list;
pub mod frequency_heap;
pub mod shard;
pub mod slot_arena;

pub use eviction_list::EvictionList;
pub use frequency_heap::FrequencyHeap;
pub use shard::ShardSelector;
pub use slot_arena::{SlotArena, SlotId};
