//! Growable slot array with tombstoned, reusable slots.
//!
//! Slot index `i` corresponds to bit `i` of every link mask pointing into the table, so a
//! slot keeps its index for its whole lifetime. Removing a value leaves a tombstone
//! (`None`) rather than shifting later slots; the lowest tombstone is handed out again by
//! the next insert.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Option<T>>", into = "Vec<Option<T>>")]
#[serde(bound(serialize = "T: Serialize + Clone", deserialize = "T: Deserialize<'de>"))]
pub struct SlotTable<T> {
    slots: Vec<Option<T>>,
    /// Tombstoned indices, lowest first.
    free: BTreeSet<usize>,
}

impl<T> SlotTable<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: BTreeSet::new(),
        }
    }

    /// Number of slots including tombstones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the live value at `index`, `None` for tombstones or out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Stores `value` in the lowest tombstone, or appends a new slot, returning its index.
    pub fn insert(&mut self, value: T) -> usize {
        match self.free.pop_first() {
            Some(index) => {
                self.slots[index] = Some(value);
                index
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        }
    }

    /// Index the next `insert` would use.
    pub fn next_index(&self) -> usize {
        self.free.first().copied().unwrap_or(self.slots.len())
    }

    /// Tombstones the slot at `index`, returning the value it held.
    pub fn tombstone(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.free.insert(index);
        Some(value)
    }

    /// Iterates live slots as `(index, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }
}

impl<T: PartialEq> SlotTable<T> {
    /// Index of the live slot holding `value`.
    pub fn position(&self, value: &T) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref() == Some(value))
    }
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<Option<T>>> for SlotTable<T> {
    fn from(slots: Vec<Option<T>>) -> Self {
        let free = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| index)
            .collect();
        Self { slots, free }
    }
}

impl<T> From<SlotTable<T>> for Vec<Option<T>> {
    fn from(table: SlotTable<T>) -> Self {
        table.slots
    }
}
