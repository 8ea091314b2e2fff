//! Indexed min-heap ordered by access frequency, then by last touch.
//!
//! `FrequencyHeap` is the eviction structure behind [`LfuCache`]. Values live
//! in a [`SlotArena`]; the heap itself is a `Vec` of small rank records
//! `(frequency, last_touch, SlotId)`. Every arena node remembers its current
//! position in that `Vec`, so a touched entry can be re-heapified in place
//! without searching.
//!
//! ## Architecture
//!
//! ```text
//!   heap: Vec<Rank>                      arena: SlotArena<Node<T>>
//!   ┌─────┬─────────────────────────┐    ┌────────┬──────────────────┐
//!   │ pos │ (freq, touch, id)       │    │ SlotId │ { value, pos }   │
//!   ├─────┼─────────────────────────┤    ├────────┼──────────────────┤
//!   │  0  │ (1, 4, id_2)   ← min    │───►│ id_2   │ { C, pos: 0 }    │
//!   │  1  │ (3, 6, id_0)            │───►│ id_0   │ { A, pos: 1 }    │
//!   │  2  │ (1, 5, id_1)            │───►│ id_1   │ { B, pos: 2 }    │
//!   └─────┴─────────────────────────┘    └────────┴──────────────────┘
//!
//!   Every swap during sift-up / sift-down rewrites `pos` on both nodes.
//! ```
//!
//! ## Ordering
//!
//! Ranks compare by `frequency` ascending, then `last_touch` ascending. The
//! heap owns a logical clock that advances on every push and touch, so two
//! entries never share a `last_touch` and ties are resolved strictly by
//! recency rather than by heap layout.
//!
//! ## Operations
//!
//! | Operation        | Description                               | Complexity |
//! |------------------|-------------------------------------------|------------|
//! | `push`           | Insert with frequency 1                   | O(log n)   |
//! | `touch`          | frequency += 1, refresh last touch        | O(log n)   |
//! | `pop_min`        | Remove lowest (frequency, last_touch)     | O(log n)   |
//! | `remove`         | Remove arbitrary node by `SlotId`         | O(log n)   |
//! | `peek_min`       | Inspect the next victim                   | O(1)       |
//!
//! [`LfuCache`]: crate::policy::lfu::LfuCache

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rank {
    frequency: u64,
    last_touch: u64,
    id: SlotId,
}

impl Rank {
    #[inline]
    fn precedes(&self, other: &Rank) -> bool {
        (self.frequency, self.last_touch) < (other.frequency, other.last_touch)
    }
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    pos: usize,
}

/// Array-backed min-heap keyed on `(frequency, last_touch)` with stable handles.
#[derive(Debug)]
pub struct FrequencyHeap<T> {
    arena: SlotArena<Node<T>>,
    heap: Vec<Rank>,
    clock: u64,
}

impl<T> FrequencyHeap<T> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            heap: Vec::new(),
            clock: 0,
        }
    }

    /// Creates an empty heap with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            clock: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.arena.get_mut(id).map(|node| &mut node.value)
    }

    /// Current frequency of `id`.
    pub fn frequency(&self, id: SlotId) -> Option<u64> {
        let pos = self.arena.get(id)?.pos;
        self.heap.get(pos).map(|rank| rank.frequency)
    }

    /// Logical time of the last push or touch of `id`.
    pub fn last_touch(&self, id: SlotId) -> Option<u64> {
        let pos = self.arena.get(id)?.pos;
        self.heap.get(pos).map(|rank| rank.last_touch)
    }

    /// Inserts `value` with frequency 1 and returns its handle.
    pub fn push(&mut self, value: T) -> SlotId {
        let pos = self.heap.len();
        let id = self.arena.insert(Node { value, pos });
        let last_touch = self.tick();
        self.heap.push(Rank {
            frequency: 1,
            last_touch,
            id,
        });
        self.sift_up(pos);
        id
    }

    /// Records one access to `id` and returns its new frequency.
    pub fn touch(&mut self, id: SlotId) -> Option<u64> {
        let pos = self.arena.get(id)?.pos;
        let last_touch = self.tick();
        let rank = self.heap.get_mut(pos)?;
        rank.frequency = rank.frequency.saturating_add(1);
        rank.last_touch = last_touch;
        let frequency = rank.frequency;
        // Rank only grows, so the node can only move toward the leaves.
        self.sift_down(pos);
        Some(frequency)
    }

    /// Handle of the next victim.
    pub fn peek_min_id(&self) -> Option<SlotId> {
        self.heap.first().map(|rank| rank.id)
    }

    /// Value of the next victim.
    pub fn peek_min(&self) -> Option<&T> {
        self.peek_min_id().and_then(|id| self.get(id))
    }

    /// Removes and returns the entry with the lowest `(frequency, last_touch)`.
    pub fn pop_min(&mut self) -> Option<T> {
        let id = self.peek_min_id()?;
        self.remove(id)
    }

    /// Removes `id` from anywhere in the heap.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let pos = self.arena.get(id)?.pos;
        let last = self.heap.len() - 1;
        if pos != last {
            self.swap(pos, last);
        }
        self.heap.pop();
        if pos < self.heap.len() {
            self.fix(pos);
        }
        self.arena.remove(id).map(|node| node.value)
    }

    /// Iterates `(SlotId, &T)` pairs in arena order (not heap order).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.arena.iter().map(|(id, node)| (id, &node.value))
    }

    /// Drops every entry. The logical clock keeps running.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.heap.clear();
    }

    #[inline]
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        let (id_a, id_b) = (self.heap[a].id, self.heap[b].id);
        if let Some(node) = self.arena.get_mut(id_a) {
            node.pos = a;
        }
        if let Some(node) = self.arena.get_mut(id_b) {
            node.pos = b;
        }
    }

    fn fix(&mut self, pos: usize) {
        if pos > 0 && self.heap[pos].precedes(&self.heap[(pos - 1) / 2]) {
            self.sift_up(pos);
        } else {
            self.sift_down(pos);
        }
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.heap[pos].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.heap[right].precedes(&self.heap[left]) {
                right
            } else {
                left
            };
            if !self.heap[child].precedes(&self.heap[pos]) {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
    }

    /// Panics if a node's stored position disagrees with the heap, or if the
    /// heap property is broken anywhere.
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.arena.len(), self.heap.len());
        for (pos, rank) in self.heap.iter().enumerate() {
            let node = self.arena.get(rank.id).expect("heap rank without node");
            assert_eq!(node.pos, pos, "stale position for {:?}", rank.id);
            if pos > 0 {
                let parent = &self.heap[(pos - 1) / 2];
                assert!(
                    !rank.precedes(parent),
                    "heap order broken at position {pos}"
                );
            }
            assert!(rank.last_touch <= self.clock);
        }
    }
}

impl<T> Default for FrequencyHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(heap: &mut FrequencyHeap<T>) -> Vec<T> {
        std::iter::from_fn(|| heap.pop_min()).collect()
    }

    #[test]
    fn equal_frequency_pops_oldest_first() {
        let mut heap = FrequencyHeap::new();
        heap.push("a");
        heap.push("b");
        heap.push("c");
        heap.debug_validate_invariants();
        assert_eq!(drain(&mut heap), vec!["a", "b", "c"]);
    }

    #[test]
    fn touched_entries_outlive_cold_ones() {
        let mut heap = FrequencyHeap::new();
        let a = heap.push("a");
        let b = heap.push("b");
        heap.push("c");

        assert_eq!(heap.touch(a), Some(2));
        assert_eq!(heap.touch(a), Some(3));
        assert_eq!(heap.touch(b), Some(2));
        heap.debug_validate_invariants();

        assert_eq!(heap.peek_min(), Some(&"c"));
        assert_eq!(drain(&mut heap), vec!["c", "b", "a"]);
    }

    #[test]
    fn touch_refreshes_tie_break() {
        let mut heap = FrequencyHeap::new();
        let a = heap.push("a");
        let b = heap.push("b");
        heap.touch(a);
        heap.touch(b);
        // both at frequency 2; a was touched first
        assert_eq!(heap.frequency(a), heap.frequency(b));
        assert!(heap.last_touch(a) < heap.last_touch(b));
        assert_eq!(heap.pop_min(), Some("a"));
    }

    #[test]
    fn remove_from_middle_keeps_positions_in_sync() {
        let mut heap = FrequencyHeap::new();
        let ids: Vec<_> = (0..16).map(|i| heap.push(i)).collect();
        for (n, id) in ids.iter().enumerate() {
            for _ in 0..(n % 5) {
                heap.touch(*id);
            }
        }
        heap.debug_validate_invariants();

        assert_eq!(heap.remove(ids[7]), Some(7));
        assert_eq!(heap.remove(ids[0]), Some(0));
        assert_eq!(heap.remove(ids[7]), None);
        heap.debug_validate_invariants();
        assert_eq!(heap.len(), 14);

        let mut last = (0, 0);
        while let Some(id) = heap.peek_min_id() {
            let rank = (
                heap.frequency(id).unwrap_or_default(),
                heap.last_touch(id).unwrap_or_default(),
            );
            assert!(rank >= last);
            last = rank;
            heap.pop_min();
            heap.debug_validate_invariants();
        }
    }

    #[test]
    fn frequency_only_grows_until_removal() {
        let mut heap = FrequencyHeap::new();
        let a = heap.push("a");
        let b = heap.push("b");
        let mut last = 1;
        for round in 0..20 {
            let now = heap.touch(a).unwrap_or_default();
            assert!(now > last);
            last = now;
            if round % 4 == 0 {
                heap.touch(b);
            }
            // sift-down from other touches never rewrites a's count
            assert_eq!(heap.frequency(a), Some(last));
        }
        assert_eq!(heap.peek_min(), Some(&"b"));

        heap.remove(a);
        let a = heap.push("a");
        assert_eq!(heap.frequency(a), Some(1));
        heap.debug_validate_invariants();
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut heap: FrequencyHeap<u8> = FrequencyHeap::with_capacity(2);
        let id = heap.push(1);
        heap.remove(id);
        assert_eq!(heap.touch(id), None);
        assert_eq!(heap.frequency(id), None);
        assert_eq!(heap.remove(id), None);
        assert_eq!(heap.pop_min(), None);
        assert!(heap.is_empty());
    }

    #[test]
    fn clear_keeps_clock_monotonic() {
        let mut heap = FrequencyHeap::new();
        let a = heap.push('a');
        let before = heap.last_touch(a);
        heap.clear();
        assert!(heap.is_empty());
        let b = heap.push('b');
        assert!(heap.last_touch(b) > before);
        if let Some(v) = heap.get_mut(b) {
            *v = 'B';
        }
        assert_eq!(heap.get(b), Some(&'B'));
        assert_eq!(heap.iter().count(), 1);
    }
}
