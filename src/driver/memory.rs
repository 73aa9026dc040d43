use std::collections::BTreeSet;

use parking_lot::RwLock;

use crate::driver::config::{DriverConfig, MissingRemovePolicy};
use crate::driver::{DriverError, StorageDriver};
use crate::types::identifiers::ContextId;

/// Process-local driver. Contexts live as long as the driver does.
#[derive(Debug, Default)]
pub struct MemoryDriver {
    config: DriverConfig,
    present: RwLock<BTreeSet<ContextId>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::with_config(DriverConfig::v0())
    }

    pub fn with_config(config: DriverConfig) -> Self {
        Self {
            config,
            present: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Sorted snapshot of every present identifier.
    pub fn identifiers(&self) -> Vec<ContextId> {
        self.present.read().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.present.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.present.read().is_empty()
    }
}

impl StorageDriver for MemoryDriver {
    fn exists(&self, id: &ContextId) -> Result<bool, DriverError> {
        Ok(self.present.read().contains(id))
    }

    fn create(&self, id: &ContextId) -> Result<(), DriverError> {
        // Check and insert under one write guard so racing creators can't both win.
        if !self.present.write().insert(id.clone()) {
            return Err(DriverError::AlreadyPresent(id.clone()));
        }
        Ok(())
    }

    fn remove(&self, id: &ContextId) -> Result<(), DriverError> {
        let removed = self.present.write().remove(id);
        match (removed, self.config.on_missing_remove) {
            (false, MissingRemovePolicy::Error) => Err(DriverError::NotFound(id.clone())),
            _ => Ok(()),
        }
    }
}
