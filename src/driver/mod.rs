pub mod config;
pub mod file;
pub mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::types::identifiers::ContextId;

pub use config::{DriverConfig, MissingRemovePolicy};
pub use file::{ContextMarker, FileDriver};
pub use memory::MemoryDriver;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Context is already present in storage: {0}")]
    AlreadyPresent(ContextId),
    #[error("Context is not present in storage: {0}")]
    NotFound(ContextId),
    #[error("Marker at {path} belongs to {found}, expected {expected}")]
    MarkerMismatch {
        path: PathBuf,
        expected: ContextId,
        found: ContextId,
    },
}

/// Persistence backend for context existence.
///
/// The lifecycle core only ever asks these three questions. What a driver
/// stores, and where, is its own business. Implementations should make
/// `create` atomic: two racing creators must not both succeed.
pub trait StorageDriver: Send + Sync {
    fn exists(&self, id: &ContextId) -> Result<bool, DriverError>;

    fn create(&self, id: &ContextId) -> Result<(), DriverError>;

    /// Behaviour for an identifier that was never created is part of each
    /// driver's contract; see [`MissingRemovePolicy`].
    fn remove(&self, id: &ContextId) -> Result<(), DriverError>;
}
