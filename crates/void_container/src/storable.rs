//! Stackable items and the contract a container relies on

use serde::{Deserialize, Serialize};

/// Anything a container can hold in a slot.
///
/// A container only ever looks at the identity predicate and the two
/// counters. Two stacks that report `is_same_as` must also report the same
/// `stack_max`, and the predicate must be symmetric, otherwise merging
/// gives different answers depending on argument order.
pub trait Storable: Clone {
    /// Display name (presentation only)
    fn name(&self) -> &str;

    /// Largest quantity a single slot may hold (at least 1)
    fn stack_max(&self) -> u32;

    /// Current quantity
    fn stack_count(&self) -> u32;

    /// Overwrite the current quantity
    fn set_stack_count(&mut self, count: u32);

    /// Type identity: can `other` merge into this stack?
    fn is_same_as(&self, other: &Self) -> bool;

    /// Check if this stack holds as much as one slot allows
    fn is_full(&self) -> bool {
        self.stack_count() >= self.stack_max()
    }

    /// Quantity this stack can still absorb
    fn free_space(&self) -> u32 {
        self.stack_max().saturating_sub(self.stack_count())
    }

    /// Split `amount` off this stack into a new stack of the same type.
    ///
    /// `amount` is clamped to the current count.
    fn split(&mut self, amount: u32) -> Self {
        let amount = amount.min(self.stack_count());
        let mut taken = self.clone();
        taken.set_stack_count(amount);
        self.set_stack_count(self.stack_count() - amount);
        taken
    }
}

/// A plain stack of items identified by a string id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item ID, the identity used for merging
    pub item_id: String,
    /// Display name
    pub name: String,
    /// Maximum stack size (1 = not stackable)
    pub max_stack: u32,
    /// Quantity
    pub quantity: u32,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        let item_id = item_id.into();
        Self {
            name: item_id.clone(),
            item_id,
            max_stack: 1,
            quantity,
        }
    }

    /// Create a single item
    pub fn single(item_id: impl Into<String>) -> Self {
        Self::new(item_id, 1)
    }

    /// Set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set max stack size
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.max_stack = max.max(1);
        self
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    /// Check if this stack is empty
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::single("unknown")
    }
}

impl Storable for ItemStack {
    fn name(&self) -> &str {
        &self.name
    }

    fn stack_max(&self) -> u32 {
        self.max_stack
    }

    fn stack_count(&self) -> u32 {
        self.quantity
    }

    fn set_stack_count(&mut self, count: u32) {
        self.quantity = count;
    }

    fn is_same_as(&self, other: &Self) -> bool {
        self.item_id == other.item_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_stack() {
        let stack = ItemStack::new("gold_coin", 50)
            .with_name("Gold Coin")
            .with_max_stack(99);

        assert_eq!(stack.stack_count(), 50);
        assert_eq!(stack.stack_max(), 99);
        assert_eq!(stack.name(), "Gold Coin");
        assert_eq!(stack.free_space(), 49);
        assert!(stack.is_stackable());
        assert!(!stack.is_full());
    }

    #[test]
    fn test_max_stack_clamped() {
        let stack = ItemStack::single("sword").with_max_stack(0);

        assert_eq!(stack.stack_max(), 1);
        assert!(stack.is_full());
        assert!(!stack.is_stackable());
    }

    #[test]
    fn test_identity_ignores_quantity_and_name() {
        let a = ItemStack::new("arrows", 10).with_name("Arrows");
        let b = ItemStack::new("arrows", 3).with_name("Sharp Arrows");
        let c = ItemStack::new("bolts", 10);

        assert!(a.is_same_as(&b));
        assert!(b.is_same_as(&a));
        assert!(!a.is_same_as(&c));
    }

    #[test]
    fn test_stack_split() {
        let mut stack = ItemStack::new("arrows", 50).with_max_stack(99);

        let split = stack.split(20);
        assert_eq!(stack.quantity, 30);
        assert_eq!(split.quantity, 20);
        assert_eq!(split.max_stack, 99);
        assert!(split.is_same_as(&stack));
    }

    #[test]
    fn test_split_clamps_to_count() {
        let mut stack = ItemStack::new("arrows", 5);

        let split = stack.split(8);
        assert_eq!(split.quantity, 5);
        assert!(stack.is_empty());
    }
}
