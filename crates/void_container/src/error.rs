//! Error types for container configuration

use thiserror::Error;

/// Container errors
///
/// Slot operations never fail with an error. A deposit that does not fit is
/// handed back as a leftover and a missing stack is reported as `None`. These
/// errors only cover building a container and changing its capacity.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Capacity must be at least one slot
    #[error("Invalid container capacity: {0}")]
    InvalidCapacity(usize),

    /// Shrinking would strand occupied slots
    #[error("Cannot shrink capacity to {requested}: {occupied} slots are in use")]
    CapacityBelowOccupancy { requested: usize, occupied: usize },

    /// Configuration could not be parsed
    #[error("Invalid container configuration: {0}")]
    Config(String),
}

/// Result type for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;
