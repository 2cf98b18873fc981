//! Void Container - Slotted Item Storage
//!
//! This crate provides fixed-capacity containers for stackable items.
//!
//! # Features
//!
//! - Item contract ([`Storable`]) with a ready-made [`ItemStack`]
//! - Merging into existing stacks up to each item's max stack size
//! - Exact-quantity extraction across several stacks
//! - All-or-nothing deposits backed by a side-effect free space check
//! - Two interchangeable backends behind one [`Storage`] trait:
//!   [`DenseStorage`] (compacting) and [`SparseStorage`] (stable indices)
//! - Configurable [`Container`] facade
//!
//! # Example
//!
//! ```
//! use void_container::prelude::*;
//!
//! let mut container: Container<ItemStack> = Container::sparse(20).unwrap();
//!
//! let arrows = ItemStack::new("arrow", 30).with_max_stack(50);
//! assert!(container.add_and_return_remainder(arrows.clone()).is_none());
//! assert!(container.add_and_return_remainder(arrows.clone()).is_none());
//!
//! assert_eq!(container.len(), 2);
//! assert_eq!(container.get_quantity(&arrows), 60);
//!
//! let pulled = container.get_specific(&arrows, 55).unwrap();
//! assert_eq!(pulled.quantity, 55);
//! assert_eq!(container.get_quantity(&arrows), 5);
//! ```

pub mod container;
pub mod dense;
pub mod error;
pub mod sparse;
pub mod storable;
pub mod storage;

/// Capacity used when none is configured
pub const DEFAULT_MAX_COUNT: usize = 32;

pub mod prelude {
    pub use crate::container::{Container, ContainerConfig, StorageKind};
    pub use crate::dense::DenseStorage;
    pub use crate::error::ContainerError;
    pub use crate::sparse::SparseStorage;
    pub use crate::storable::{ItemStack, Storable};
    pub use crate::storage::Storage;
}

pub use prelude::*;
