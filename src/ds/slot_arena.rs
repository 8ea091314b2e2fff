//! Slot arena with stable handles.
//!
//! Values sit in a flat `Vec` of slots. A slot is either occupied or vacant;
//! vacant slots form a singly linked free chain threaded through the slots
//! themselves, so freeing and reusing a slot allocates nothing. The most
//! recently freed slot is reused first.
//!
//! ```text
//!   slots:     [ Occupied(A) | Vacant(→3) | Occupied(C) | Vacant(end) ]
//!   free_head: 1
//!
//!   insert(E) → SlotId(1), free_head becomes 3
//! ```
//!
//! Ordering structures link their nodes through [`SlotId`]s instead of
//! pointers, and the caches' key index maps keys to `SlotId`s.
//!
//! ## Performance
//! - `insert` / `remove` / `get`: O(1)
//! - `iter`: O(slots), vacant slots are skipped

/// Stable handle to a value stored in a [`SlotArena`].
///
/// A `SlotId` stays valid until its value is removed. After removal the index
/// may be reused for a different value, so owners must drop handles they no
/// longer track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) usize);

#[derive(Debug)]
enum Slot<T> {
    Occupied(T),
    Vacant { next_free: Option<usize> },
}

impl<T> Slot<T> {
    fn value(&self) -> Option<&T> {
        match self {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }
}

/// Vector-backed arena; freed slots are chained and reused before the
/// vector grows.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    live: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            live: 0,
        }
    }

    /// Stores `value` and returns its handle.
    pub fn insert(&mut self, value: T) -> SlotId {
        self.live += 1;
        let Some(index) = self.free_head else {
            self.slots.push(Slot::Occupied(value));
            return SlotId(self.slots.len() - 1);
        };
        let vacated = std::mem::replace(&mut self.slots[index], Slot::Occupied(value));
        if let Slot::Vacant { next_free } = vacated {
            self.free_head = next_free;
        }
        SlotId(index)
    }

    /// Takes the value out of `id` and links the slot onto the free chain.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.0)?;
        if slot.value().is_none() {
            return None;
        }
        let next_free = self.free_head;
        match std::mem::replace(slot, Slot::Vacant { next_free }) {
            Slot::Occupied(value) => {
                self.free_head = Some(id.0);
                self.live -= 1;
                Some(value)
            },
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Slot::value)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Slot::value_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drops every value; handles issued before the call are all invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }

    /// Occupied `(SlotId, &T)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.value().map(|value| (SlotId(index), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
