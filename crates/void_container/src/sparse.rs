//! Sparse slot storage
//!
//! Each occupied slot is an explicit `index -> stack` entry. Empty slots
//! have no entry, removals never move other stacks, and every index stays
//! below `max_count`.

use crate::error::{ContainerError, Result};
use crate::storable::Storable;
use crate::storage::{accumulate, merge_into, open_slots, Storage};
use crate::DEFAULT_MAX_COUNT;
use log::{debug, trace};
use std::collections::BTreeMap;

/// Index-keyed slot storage with stable indices
#[derive(Debug, Clone)]
pub struct SparseStorage<S> {
    /// Occupied slots keyed by index
    slots: BTreeMap<usize, S>,
    /// Maximum number of slots
    max_count: usize,
}

impl<S> SparseStorage<S> {
    /// Create an empty storage with the given capacity
    pub fn new(max_count: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            max_count,
        }
    }

    /// Check if a slot is occupied
    pub fn is_occupied(&self, index: usize) -> bool {
        self.slots.contains_key(&index)
    }

    /// One past the highest occupied index
    fn span(&self) -> usize {
        self.slots.keys().next_back().map_or(0, |index| index + 1)
    }

    /// Indices below `max_count` with no stack, lowest first
    fn free_indices(&self) -> Vec<usize> {
        (0..self.max_count)
            .filter(|index| !self.slots.contains_key(index))
            .collect()
    }

    fn relocate(&mut self, stack: S, from: usize, to: usize) {
        if to < self.max_count {
            self.slots.insert(to, stack);
        } else {
            self.slots.insert(from, stack);
        }
    }
}

impl<S> Default for SparseStorage<S> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COUNT)
    }
}

impl<S: Storable> Storage<S> for SparseStorage<S> {
    fn max_count(&self) -> usize {
        self.max_count
    }

    fn set_max_count(&mut self, max_count: usize) -> Result<()> {
        if max_count == 0 {
            return Err(ContainerError::InvalidCapacity(max_count));
        }

        let span = self.span();
        if max_count < span {
            debug!(
                "Refusing to shrink sparse storage to {} with slot {} in use",
                max_count,
                span - 1
            );
            return Err(ContainerError::CapacityBelowOccupancy {
                requested: max_count,
                occupied: span,
            });
        }

        self.max_count = max_count;
        Ok(())
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn probe(&self, index: usize) -> Option<&S> {
        self.slots.get(&index)
    }

    fn take_at(&mut self, index: usize) -> Option<S> {
        self.slots.remove(&index)
    }

    fn swap(&mut self, index_a: usize, index_b: usize) {
        if index_a == index_b {
            return;
        }

        let first = self.slots.remove(&index_a);
        let second = self.slots.remove(&index_b);

        match (first, second) {
            (Some(first), Some(second)) => {
                self.slots.insert(index_a, second);
                self.slots.insert(index_b, first);
            }
            (Some(stack), None) => self.relocate(stack, index_a, index_b),
            (None, Some(stack)) => self.relocate(stack, index_b, index_a),
            (None, None) => {}
        }
    }

    fn add_and_return_remainder(&mut self, mut stack: S) -> Option<S> {
        if stack.stack_count() == 0 {
            trace!("Ignoring empty stack of {}", stack.name());
            return None;
        }

        merge_into(self.slots.values_mut(), &mut stack);
        if stack.stack_count() == 0 {
            return None;
        }

        let free = self.free_indices();
        let slots = &mut self.slots;
        open_slots(stack, free, |index, opened| {
            slots.insert(index, opened);
        })
    }

    /// Place `stack` at `index`, shifting the run of occupants that starts
    /// there up by one slot into the first gap after it.
    ///
    /// The stack is handed back unchanged if `index >= max_count`, if the
    /// storage is full, or if the run reaches `max_count` so that its last
    /// occupant would have to move out of range. The last case applies even
    /// when free slots remain below `index`. At most `stack_max` is placed;
    /// any excess is returned as leftover.
    fn add_at_position(&mut self, mut stack: S, index: usize) -> Option<S> {
        if stack.stack_count() == 0 {
            return None;
        }
        if self.slots.len() >= self.max_count || index >= self.max_count {
            debug!("Cannot place {} at {}", stack.name(), index);
            return Some(stack);
        }

        // Occupants from `index` up to the first gap each move up one slot.
        let mut end = index;
        while self.slots.contains_key(&end) {
            end += 1;
        }
        if end >= self.max_count {
            debug!(
                "Cannot place {} at {}: slots {}..{} cannot shift up",
                stack.name(),
                index,
                index,
                end
            );
            return Some(stack);
        }

        for position in (index..end).rev() {
            if let Some(displaced) = self.slots.remove(&position) {
                self.slots.insert(position + 1, displaced);
            }
        }
        if end > index {
            trace!("Displaced slots {}..{} up by one", index, end);
        }

        let overflow = stack.stack_count().saturating_sub(stack.stack_max());
        let leftover = (overflow > 0).then(|| stack.split(overflow));

        self.slots.insert(index, stack);
        leftover
    }

    fn get_specific(&mut self, probe: &S, quantity: u32) -> Option<S> {
        if quantity == 0 || self.get_quantity(probe) < quantity {
            return None;
        }

        let matching: Vec<usize> = self
            .slots
            .iter()
            .filter(|(_, stack)| stack.is_same_as(probe))
            .map(|(index, _)| *index)
            .collect();

        let mut remaining = quantity;
        let mut output = None;

        for index in matching {
            if remaining == 0 {
                break;
            }
            let Some(slot) = self.slots.get_mut(&index) else {
                continue;
            };

            let count = slot.stack_count();
            if count > remaining {
                accumulate(&mut output, slot.split(remaining));
                remaining = 0;
            } else if let Some(piece) = self.slots.remove(&index) {
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
            match self.slots.get(&position) {
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
        Box::new(self.slots.iter().map(|(index, stack)| (*index, stack)))
    }
}
