use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::binding::resolver::IdentifierResolver;
use crate::driver::StorageDriver;
use crate::engine::{Context, ContextEngine};
use crate::types::errors::ContextError;
use crate::types::identifiers::ContextId;

/// A resolver and the driver its contexts live in. Immutable once built.
#[derive(Clone)]
pub struct Binding {
    resolver: Arc<dyn IdentifierResolver>,
    driver: Arc<dyn StorageDriver>,
}

impl Binding {
    pub fn new(resolver: Arc<dyn IdentifierResolver>, driver: Arc<dyn StorageDriver>) -> Self {
        Self { resolver, driver }
    }

    pub fn resolver(&self) -> &Arc<dyn IdentifierResolver> {
        &self.resolver
    }

    pub fn driver(&self) -> &Arc<dyn StorageDriver> {
        &self.driver
    }

    pub fn engine(&self) -> ContextEngine {
        ContextEngine::new(Arc::clone(&self.driver))
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("resolver", &Arc::as_ptr(&self.resolver))
            .field("driver", &Arc::as_ptr(&self.driver))
            .finish()
    }
}

/// Named bindings, shared by every caller that holds the registry.
///
/// Build one at startup and pass it around by reference or `Arc`. Lookups
/// copy the binding out of the lock, so no lock is held while a resolver or
/// driver runs.
#[derive(Default)]
pub struct BindingRegistry {
    bindings: RwLock<HashMap<String, Binding>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any earlier binding under the same name.
    pub fn register(
        &self,
        name: impl Into<String>,
        resolver: Arc<dyn IdentifierResolver>,
        driver: Arc<dyn StorageDriver>,
    ) {
        let name = name.into();
        let replaced = self
            .bindings
            .write()
            .insert(name.clone(), Binding::new(resolver, driver))
            .is_some();

        if replaced {
            info!(binding = %name, "context binding replaced");
        } else {
            debug!(binding = %name, "context binding registered");
        }
    }

    pub fn binding_exists(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name)
    }

    pub fn binding(&self, name: &str) -> Result<Binding, ContextError> {
        self.bindings
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ContextError::BindingNotFound(name.to_string()))
    }

    pub fn resolve_identifier(&self, name: &str, object: &dyn Any) -> Result<ContextId, ContextError> {
        let binding = self.binding(name)?;
        Ok(binding.resolver.resolve(object)?)
    }

    pub fn driver_for(&self, name: &str) -> Result<Arc<dyn StorageDriver>, ContextError> {
        Ok(Arc::clone(self.binding(name)?.driver()))
    }

    /// An engine over the named binding's driver.
    pub fn engine_for(&self, name: &str) -> Result<ContextEngine, ContextError> {
        Ok(self.binding(name)?.engine())
    }

    /// Whether the context `object` resolves to is present in the binding's driver.
    pub fn context_exists(&self, name: &str, object: &dyn Any) -> Result<bool, ContextError> {
        let binding = self.binding(name)?;
        let id = binding.resolver.resolve(object)?;
        Ok(binding.driver.exists(&id)?)
    }

    /// Resolve `object` through the named binding and strictly begin it.
    ///
    /// Fails with [`ContextError::AlreadyExists`] on a second call for the
    /// same object.
    pub fn begin_from_binding(&self, name: &str, object: &dyn Any) -> Result<Context, ContextError> {
        let binding = self.binding(name)?;
        let id = binding.resolver.resolve(object)?;
        binding.engine().begin(id)
    }

    /// Rehydrate a handle for a context assumed to exist already.
    ///
    /// Neither checks nor creates anything in the driver.
    pub fn bound_context(&self, name: &str, object: &dyn Any) -> Result<Context, ContextError> {
        let binding = self.binding(name)?;
        let id = binding.resolver.resolve(object)?;
        Ok(Context::new(id, binding.engine()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("names", &self.names())
            .finish()
    }
}
