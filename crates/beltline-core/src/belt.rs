//! The conveyor belt: a fixed-capacity ring buffer of item slots.
//!
//! Logical slot 0 is the exit end (oldest), slot `len - 1` the entry end
//! (newest). [`Belt::shift`] overwrites the head slot with the incoming item
//! and advances the head, so eviction is explicit and the length never
//! changes. No runtime reallocation.

use crate::item::Item;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Belt {
    slots: Vec<Item>,
    /// Physical index of logical slot 0.
    head: usize,
}

impl Belt {
    /// Create an all-empty belt.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero. The engine validates the length first.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "Belt length must be > 0");
        Self {
            slots: vec![Item::Empty; len],
            head: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn physical(&self, index: usize) -> usize {
        (self.head + index) % self.slots.len()
    }

    /// Item at logical position `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Item> {
        if index >= self.slots.len() {
            return None;
        }
        Some(self.slots[self.physical(index)])
    }

    /// Replace the item at logical position `index`. Returns the previous
    /// item, or `None` if out of range.
    pub fn set(&mut self, index: usize, item: Item) -> Option<Item> {
        if index >= self.slots.len() {
            return None;
        }
        let p = self.physical(index);
        Some(std::mem::replace(&mut self.slots[p], item))
    }

    /// Evict the exit slot, move every item one position toward the exit and
    /// place `incoming` at the entry end. Returns the evicted item.
    pub fn shift(&mut self, incoming: Item) -> Item {
        let evicted = std::mem::replace(&mut self.slots[self.head], incoming);
        self.head = (self.head + 1) % self.slots.len();
        evicted
    }

    /// The newest item (entry end).
    pub fn newest(&self) -> Item {
        self.slots[self.physical(self.slots.len() - 1)]
    }

    /// Iterate items from exit end to entry end.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Item> + '_ {
        (0..self.slots.len()).map(move |i| self.slots[self.physical(i)])
    }

    pub fn to_vec(&self) -> Vec<Item> {
        self.iter().collect()
    }

    /// Overwrite every slot in logical order. `items` must match the length;
    /// returns false (and leaves the belt untouched) otherwise.
    pub fn fill_from(&mut self, items: &[Item]) -> bool {
        if items.len() != self.slots.len() {
            return false;
        }
        self.slots.copy_from_slice(items);
        self.head = 0;
        true
    }
}
