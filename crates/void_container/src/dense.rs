//! Dense slot storage
//!
//! Occupied slots always form the prefix `[0, len)`. Removing a stack shifts
//! every later stack down by one, so indices are not stable across removals.

use crate::error::{ContainerError, Result};
use crate::storable::Storable;
use crate::storage::{accumulate, merge_into, open_slots, Storage};
use crate::DEFAULT_MAX_COUNT;
use log::{debug, trace};

/// Compacting, vector-backed slot storage
#[derive(Debug, Clone)]
pub struct DenseStorage<S> {
    /// Occupied slots, in index order
    slots: Vec<S>,
    /// Maximum number of slots
    max_count: usize,
}

impl<S> DenseStorage<S> {
    /// Create an empty storage with the given capacity
    pub fn new(max_count: usize) -> Self {
        Self {
            slots: Vec::with_capacity(max_count),
            max_count,
        }
    }

    /// Occupied slots as a slice
    pub fn as_slice(&self) -> &[S] {
        &self.slots
    }
}

impl<S> Default for DenseStorage<S> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COUNT)
    }
}

impl<S: Storable> Storage<S> for DenseStorage<S> {
    fn max_count(&self) -> usize {
        self.max_count
    }

    fn set_max_count(&mut self, max_count: usize) -> Result<()> {
        if max_count == 0 {
            return Err(ContainerError::InvalidCapacity(max_count));
        }
        if max_count < self.slots.len() {
            debug!(
                "Refusing to shrink dense storage to {} with {} slots in use",
                max_count,
                self.slots.len()
            );
            return Err(ContainerError::CapacityBelowOccupancy {
                requested: max_count,
                occupied: self.slots.len(),
            });
        }

        self.max_count = max_count;
        Ok(())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn probe(&self, index: usize) -> Option<&S> {
        self.slots.get(index)
    }

    fn take_at(&mut self, index: usize) -> Option<S> {
        if index < self.slots.len() {
            Some(self.slots.remove(index))
        } else {
            None
        }
    }

    fn swap(&mut self, index_a: usize, index_b: usize) {
        let len = self.slots.len();

        match (index_a < len, index_b < len) {
            (true, true) => self.slots.swap(index_a, index_b),
            (true, false) | (false, true) => {
                // Moving into the empty region means moving to the end of
                // the prefix.
                let stack = self.slots.remove(index_a.min(index_b));
                self.slots.push(stack);
            }
            (false, false) => {}
        }
    }

    fn add_and_return_remainder(&mut self, mut stack: S) -> Option<S> {
        if stack.stack_count() == 0 {
            trace!("Ignoring empty stack of {}", stack.name());
            return None;
        }

        merge_into(self.slots.iter_mut(), &mut stack);
        if stack.stack_count() == 0 {
            return None;
        }

        let free = self.free_slots();
        let slots = &mut self.slots;
        open_slots(stack, 0..free, |_, opened| slots.push(opened))
    }

    fn add_at_position(&mut self, mut stack: S, index: usize) -> Option<S> {
        if stack.stack_count() == 0 {
            return None;
        }
        if self.slots.len() >= self.max_count {
            debug!("Dense storage full, cannot place {} at {}", stack.name(), index);
            return Some(stack);
        }

        let overflow = stack.stack_count().saturating_sub(stack.stack_max());
        let leftover = (overflow > 0).then(|| stack.split(overflow));

        if index < self.slots.len() {
            self.slots.insert(index, stack);
        } else {
            self.slots.push(stack);
        }
        leftover
    }

    fn get_specific(&mut self, probe: &S, quantity: u32) -> Option<S> {
        if quantity == 0 || self.get_quantity(probe) < quantity {
            return None;
        }

        let mut remaining = quantity;
        let mut output = None;
        let mut index = 0;

        while remaining > 0 && index < self.slots.len() {
            if !self.slots[index].is_same_as(probe) {
                index += 1;
                continue;
            }

            let count = self.slots[index].stack_count();
            if count > remaining {
                let piece = self.slots[index].split(remaining);
                accumulate(&mut output, piece);
                remaining = 0;
            } else {
                // The next slot slides into `index`.
                let piece = self.slots.remove(index);
                trace!("Evicted empty stack at {}", index);
                accumulate(&mut output, piece);
                remaining -= count;
            }
        }

        output
    }

    fn has_available_space_for(&self, stack: &S) -> bool {
        let needed = u64::from(stack.stack_count());
        let merges = stack.stack_max() > 1;
        let mut space = 0u64;

        if needed == 0 {
            return true;
        }

        for position in 0..self.max_count {
            match self.slots.get(position) {
                Some(slot) => {
                    if merges && slot.is_same_as(stack) {
                        space += u64::from(slot.free_space());
                    }
                }
                None => space += u64::from(stack.stack_max()),
            }

            if space >= needed {
                return true;
            }
        }

        false
    }

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn slots(&self) -> Box<dyn Iterator<Item = (usize, &S)> + '_> {
        Box::new(self.slots.iter().enumerate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storable::ItemStack;

    fn gold(quantity: u32) -> ItemStack {
        ItemStack::new("gold", quantity).with_max_stack(100)
    }

    fn ids(storage: &DenseStorage<ItemStack>) -> Vec<&str> {
        storage.as_slice().iter().map(|s| s.item_id.as_str()).collect()
    }

    #[test]
    fn test_storage_creation() {
        let storage: DenseStorage<ItemStack> = DenseStorage::new(10);

        assert_eq!(storage.max_count(), 10);
        assert_eq!(storage.len(), 0);
        assert!(storage.is_empty());
        assert_eq!(DenseStorage::<ItemStack>::default().max_count(), 32);
    }

    #[test]
    fn test_stacking() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(5);

        assert!(storage.add_and_return_remainder(gold(50)).is_none());
        assert!(storage.add_and_return_remainder(gold(30)).is_none());

        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get_quantity(&gold(0)), 80);
    }

    #[test]
    fn test_overflow() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(2);
        storage.add_and_return_remainder(gold(90));

        let leftover = storage.add_and_return_remainder(gold(150)).unwrap();

        // 10 tops up slot 0, 100 opens slot 1, 40 has nowhere to go
        assert_eq!(leftover.quantity, 40);
        assert_eq!(storage.get_quantity(&gold(0)), 200);
        assert!(storage.slots().all(|(_, s)| s.quantity == 100));
    }

    #[test]
    fn test_take_at_compacts() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(5);
        for id in ["a", "b", "c"] {
            storage.add_and_return_remainder(ItemStack::single(id));
        }

        let taken = storage.take_at(0).unwrap();

        assert_eq!(taken.item_id, "a");
        assert_eq!(ids(&storage), ["b", "c"]);
        assert!(storage.take_at(2).is_none());
    }

    #[test]
    fn test_swap_with_empty_moves_to_end() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(5);
        for id in ["a", "b", "c"] {
            storage.add_and_return_remainder(ItemStack::single(id));
        }

        storage.swap(4, 0);

        assert_eq!(ids(&storage), ["b", "c", "a"]);
    }

    #[test]
    fn test_add_at_position_inserts_and_appends() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(5);
        storage.add_and_return_remainder(ItemStack::single("a"));
        storage.add_and_return_remainder(ItemStack::single("b"));

        assert!(storage.add_at_position(ItemStack::single("x"), 1).is_none());
        assert!(storage.add_at_position(ItemStack::single("y"), 4).is_none());

        assert_eq!(ids(&storage), ["a", "x", "b", "y"]);
    }

    #[test]
    fn test_add_at_position_caps_stack() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(5);

        let leftover = storage.add_at_position(gold(130), 0).unwrap();

        assert_eq!(leftover.quantity, 30);
        assert_eq!(storage.probe(0).unwrap().quantity, 100);
    }

    #[test]
    fn test_get_specific_evicts_drained_stacks() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(5);
        storage.add_and_return_remainder(ItemStack::single("sword"));
        storage.add_and_return_remainder(gold(100));
        storage.add_and_return_remainder(gold(20));

        let pulled = storage.get_specific(&gold(0), 110).unwrap();

        assert_eq!(pulled.quantity, 110);
        assert_eq!(ids(&storage), ["sword", "gold"]);
        assert_eq!(storage.probe(1).unwrap().quantity, 10);
    }

    #[test]
    fn test_shrink_rejected_below_occupancy() {
        let mut storage: DenseStorage<ItemStack> = DenseStorage::new(4);
        for id in ["a", "b", "c"] {
            storage.add_and_return_remainder(ItemStack::single(id));
        }

        assert!(matches!(
            storage.set_max_count(2),
            Err(ContainerError::CapacityBelowOccupancy { requested: 2, occupied: 3 })
        ));
        assert!(matches!(
            storage.set_max_count(0),
            Err(ContainerError::InvalidCapacity(0))
        ));
        assert!(storage.set_max_count(3).is_ok());
        assert_eq!(storage.max_count(), 3);
    }
}
