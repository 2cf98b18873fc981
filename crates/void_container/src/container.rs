//! Container facade
//!
//! A [`Container`] owns one storage backend picked by [`ContainerConfig`] and
//! forwards every call to it.

use crate::dense::DenseStorage;
use crate::error::{ContainerError, Result};
use crate::sparse::SparseStorage;
use crate::storable::Storable;
use crate::storage::Storage;
use crate::DEFAULT_MAX_COUNT;
use serde::{Deserialize, Serialize};

/// Backing representation for a container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    /// Compacting vector, indices shift on removal
    Dense,
    /// Index-keyed map, indices are stable
    #[default]
    Sparse,
}

/// Container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Number of slots
    pub max_count: usize,
    /// Backing representation
    pub kind: StorageKind,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            kind: StorageKind::default(),
        }
    }
}

impl ContainerConfig {
    /// Create a configuration
    pub fn new(max_count: usize, kind: StorageKind) -> Self {
        Self { max_count, kind }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ContainerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration can build a container
    pub fn validate(&self) -> Result<()> {
        if self.max_count == 0 {
            return Err(ContainerError::InvalidCapacity(self.max_count));
        }
        Ok(())
    }
}

/// Slotted item container over a configurable storage backend
pub struct Container<S: Storable> {
    kind: StorageKind,
    storage: Box<dyn Storage<S>>,
}

impl<S: Storable + 'static> Container<S> {
    /// Build a container from a configuration
    pub fn new(config: &ContainerConfig) -> Result<Self> {
        config.validate()?;

        let storage: Box<dyn Storage<S>> = match config.kind {
            StorageKind::Dense => Box::new(DenseStorage::new(config.max_count)),
            StorageKind::Sparse => Box::new(SparseStorage::new(config.max_count)),
        };
        log::debug!(
            "Created {:?} container with {} slots",
            config.kind,
            config.max_count
        );

        Ok(Self {
            kind: config.kind,
            storage,
        })
    }

    /// Dense container with the given capacity
    pub fn dense(max_count: usize) -> Result<Self> {
        Self::new(&ContainerConfig::new(max_count, StorageKind::Dense))
    }

    /// Sparse container with the given capacity
    pub fn sparse(max_count: usize) -> Result<Self> {
        Self::new(&ContainerConfig::new(max_count, StorageKind::Sparse))
    }
}

impl<S: Storable> Container<S> {
    /// Backing representation in use
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    /// Current configuration
    pub fn config(&self) -> ContainerConfig {
        ContainerConfig::new(self.storage.max_count(), self.kind)
    }

    /// Direct access to the backend
    pub fn storage(&self) -> &dyn Storage<S> {
        self.storage.as_ref()
    }
}

impl<S: Storable> Storage<S> for Container<S> {
    fn max_count(&self) -> usize {
        self.storage.max_count()
    }

    fn set_max_count(&mut self, max_count: usize) -> Result<()> {
        self.storage.set_max_count(max_count)
    }

    fn len(&self) -> usize {
        self.storage.len()
    }

    fn probe(&self, index: usize) -> Option<&S> {
        self.storage.probe(index)
    }

    fn take_at(&mut self, index: usize) -> Option<S> {
        self.storage.take_at(index)
    }

    fn swap(&mut self, index_a: usize, index_b: usize) {
        self.storage.swap(index_a, index_b)
    }

    fn add_and_return_remainder(&mut self, stack: S) -> Option<S> {
        self.storage.add_and_return_remainder(stack)
    }

    fn add_all_or_fail(&mut self, stack: S) -> Option<S> {
        self.storage.add_all_or_fail(stack)
    }

    fn add_at_position(&mut self, stack: S, index: usize) -> Option<S> {
        self.storage.add_at_position(stack, index)
    }

    fn get_specific(&mut self, probe: &S, quantity: u32) -> Option<S> {
        self.storage.get_specific(probe, quantity)
    }

    fn get_quantity(&self, probe: &S) -> u32 {
        self.storage.get_quantity(probe)
    }

    fn has_available_space_for(&self, stack: &S) -> bool {
        self.storage.has_available_space_for(stack)
    }

    fn clear(&mut self) {
        self.storage.clear()
    }

    fn slots(&self) -> Box<dyn Iterator<Item = (usize, &S)> + '_> {
        self.storage.slots()
    }
}

impl<S: Storable + 'static> Default for Container<S> {
    fn default() -> Self {
        Self {
            kind: StorageKind::Sparse,
            storage: Box::new(SparseStorage::new(DEFAULT_MAX_COUNT)),
        }
    }
}

impl<S: Storable> std::fmt::Debug for Container<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("kind", &self.kind)
            .field("max_count", &self.storage.max_count())
            .field("len", &self.storage.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storable::ItemStack;

    #[test]
    fn test_config_defaults() {
        let config = ContainerConfig::default();

        assert_eq!(config.max_count, 32);
        assert_eq!(config.kind, StorageKind::Sparse);
    }

    #[test]
    fn test_config_from_json() {
        let config = ContainerConfig::from_json(r#"{ "max_count": 12, "kind": "dense" }"#).unwrap();
        assert_eq!(config, ContainerConfig::new(12, StorageKind::Dense));

        let partial = ContainerConfig::from_json(r#"{ "kind": "dense" }"#).unwrap();
        assert_eq!(partial.max_count, 32);
    }

    #[test]
    fn test_config_rejects_bad_input() {
        assert!(matches!(
            ContainerConfig::from_json(r#"{ "max_count": 0 }"#),
            Err(ContainerError::InvalidCapacity(0))
        ));
        assert!(matches!(
            ContainerConfig::from_json(r#"{ "kind": "ring" }"#),
            Err(ContainerError::Config(_))
        ));
        assert!(Container::<ItemStack>::dense(0).is_err());
    }

    #[test]
    fn test_container_delegates() {
        let mut container: Container<ItemStack> = Container::dense(3).unwrap();
        assert_eq!(container.kind(), StorageKind::Dense);

        let coins = ItemStack::new("coin", 4).with_max_stack(10);
        assert!(container.add_and_return_remainder(coins.clone()).is_none());
        assert!(container.add_all_or_fail(coins.clone()).is_none());

        assert_eq!(container.len(), 1);
        assert_eq!(container.get_quantity(&coins), 8);
        assert_eq!(container.take_one(&coins).unwrap().quantity, 1);
        assert_eq!(container.storage().get_quantity(&coins), 7);
    }

    #[test]
    fn test_container_capacity_change() {
        let mut container: Container<ItemStack> = Container::default();
        container.add_at_position(ItemStack::single("key"), 20);

        assert!(container.set_max_count(10).is_err());
        assert!(container.set_max_count(64).is_ok());
        assert_eq!(container.config(), ContainerConfig::new(64, StorageKind::Sparse));
    }
}
