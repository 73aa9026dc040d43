use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::driver::{DriverError, StorageDriver};
use crate::engine::context::Context;
use crate::types::errors::ContextError;
use crate::types::identifiers::ContextId;

/// Lifecycle operations over a single storage driver.
///
/// Holds nothing but a shared driver handle, so clones are cheap and any
/// number of engines may sit on the same driver.
#[derive(Clone)]
pub struct ContextEngine {
    driver: Arc<dyn StorageDriver>,
}

impl ContextEngine {
    pub fn new(driver: Arc<dyn StorageDriver>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Arc<dyn StorageDriver> {
        &self.driver
    }

    pub fn exists(&self, id: &ContextId) -> Result<bool, ContextError> {
        Ok(self.driver.exists(id)?)
    }

    /// Create a context that must not exist yet.
    ///
    /// Fails with [`ContextError::AlreadyExists`] when the driver already
    /// reports the identifier. Use [`ContextEngine::context`] for
    /// get-or-create.
    pub fn begin(&self, id: impl Into<ContextId>) -> Result<Context, ContextError> {
        let id = id.into();
        if self.driver.exists(&id)? {
            debug!(context = %id, "begin rejected, context already exists");
            return Err(ContextError::AlreadyExists(id));
        }

        self.driver.create(&id)?;
        info!(context = %id, "context begun");

        Ok(Context::new(id, self.clone()))
    }

    /// Get-or-create. Only fails if the driver does.
    ///
    /// Losing a create race to another caller counts as a fetch.
    pub fn context(&self, id: impl Into<ContextId>) -> Result<Context, ContextError> {
        let id = id.into();
        if !self.driver.exists(&id)? {
            match self.begin(id.clone()) {
                Err(ContextError::AlreadyExists(_))
                | Err(ContextError::Driver(DriverError::AlreadyPresent(_))) => {
                    debug!(context = %id, "lost create race, fetching existing context");
                }
                begun => return begun,
            }
        }

        debug!(context = %id, "context fetched");
        Ok(Context::new(id, self.clone()))
    }

    /// No existence check here: a missing identifier is handled by the driver.
    pub fn end(&self, id: &ContextId) -> Result<(), ContextError> {
        self.driver.remove(id)?;
        info!(context = %id, "context ended");
        Ok(())
    }

    pub(crate) fn shares_driver_with(&self, other: &ContextEngine) -> bool {
        // Compare data pointers only; vtable pointers for one type can differ across codegen units.
        std::ptr::eq(
            Arc::as_ptr(&self.driver) as *const (),
            Arc::as_ptr(&other.driver) as *const (),
        )
    }
}

impl fmt::Debug for ContextEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextEngine")
            .field("driver", &Arc::as_ptr(&self.driver))
            .finish()
    }
}
