//! Slot storage contract shared by every backing representation

use crate::error::Result;
use crate::storable::Storable;
use log::{debug, trace};

/// Bounded slot storage for stacks of `S`.
///
/// Every operation reports what it could not do through its return value:
/// deposits hand back the unplaced remainder and lookups return `None`.
/// Indices outside the addressable range behave like empty slots.
pub trait Storage<S: Storable> {
    /// Maximum number of occupied slots
    fn max_count(&self) -> usize;

    /// Change the capacity.
    ///
    /// Fails without changing anything if occupied slots would fall outside
    /// the new bound.
    fn set_max_count(&mut self, max_count: usize) -> Result<()>;

    /// Number of occupied slots
    fn len(&self) -> usize;

    /// Borrow the stack at `index` without removing it
    fn probe(&self, index: usize) -> Option<&S>;

    /// Remove and return the whole stack at `index`
    fn take_at(&mut self, index: usize) -> Option<S>;

    /// Exchange two slots, or relocate when only one of them is occupied
    fn swap(&mut self, index_a: usize, index_b: usize);

    /// Merge `stack` into compatible stacks, then open new slots for the
    /// rest. Returns whatever did not fit.
    fn add_and_return_remainder(&mut self, stack: S) -> Option<S>;

    /// Place `stack` at a requested index
    fn add_at_position(&mut self, stack: S, index: usize) -> Option<S>;

    /// Extract exactly `quantity` units of the probe's type, drawing from as
    /// many stacks as needed. Nothing is removed unless the whole quantity
    /// is available.
    fn get_specific(&mut self, probe: &S, quantity: u32) -> Option<S>;

    /// Would `stack` fit completely, merges included?
    fn has_available_space_for(&self, stack: &S) -> bool;

    /// Drop every stored stack
    fn clear(&mut self);

    /// Occupied slots in scan order
    fn slots(&self) -> Box<dyn Iterator<Item = (usize, &S)> + '_>;

    /// Check if no slot is occupied
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots still free for new stacks
    fn free_slots(&self) -> usize {
        self.max_count().saturating_sub(self.len())
    }

    /// Deposit `stack` only if all of it fits; otherwise hand it back
    /// untouched.
    fn add_all_or_fail(&mut self, stack: S) -> Option<S> {
        if self.has_available_space_for(&stack) {
            return self.add_and_return_remainder(stack);
        }

        debug!(
            "Rejected {} x{}: not enough space",
            stack.name(),
            stack.stack_count()
        );
        Some(stack)
    }

    /// Extract a single unit of the probe's type
    fn take_one(&mut self, probe: &S) -> Option<S> {
        self.get_specific(probe, 1)
    }

    /// Total quantity of the probe's type across all slots, saturating at
    /// `u32::MAX`
    fn get_quantity(&self, probe: &S) -> u32 {
        let total: u64 = self
            .slots()
            .filter(|(_, stack)| stack.is_same_as(probe))
            .map(|(_, stack)| u64::from(stack.stack_count()))
            .sum();
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}

/// Pour `stack` into compatible, non-full stacks in iteration order.
///
/// Items with a `stack_max` of 1 never merge.
pub(crate) fn merge_into<'a, S, I>(slots: I, stack: &mut S)
where
    S: Storable + 'a,
    I: IntoIterator<Item = &'a mut S>,
{
    if stack.stack_max() <= 1 {
        return;
    }

    for slot in slots {
        if stack.stack_count() == 0 {
            break;
        }
        if !slot.is_same_as(stack) || slot.is_full() {
            continue;
        }

        let moved = slot.free_space().min(stack.stack_count());
        slot.set_stack_count(slot.stack_count() + moved);
        stack.set_stack_count(stack.stack_count() - moved);
        trace!("Merged {} x{} into existing stack", stack.name(), moved);
    }
}

/// Open one new slot per target until `stack` is placed, never putting more
/// than `stack_max` into a single slot. Returns the part that found no slot.
pub(crate) fn open_slots<S, T, I, F>(mut stack: S, targets: I, mut place: F) -> Option<S>
where
    S: Storable,
    I: IntoIterator<Item = T>,
    F: FnMut(T, S),
{
    for target in targets {
        if stack.stack_count() <= stack.stack_max() {
            place(target, stack);
            return None;
        }

        let chunk = stack.split(stack.stack_max());
        trace!("Split {} x{} into a new slot", chunk.name(), chunk.stack_count());
        place(target, chunk);
    }

    debug!(
        "No free slot for {} x{}",
        stack.name(),
        stack.stack_count()
    );
    Some(stack)
}

/// Accumulate an extracted piece into the output stack
pub(crate) fn accumulate<S: Storable>(output: &mut Option<S>, piece: S) {
    match output {
        Some(acc) => acc.set_stack_count(acc.stack_count() + piece.stack_count()),
        None => *output = Some(piece),
    }
}
