use crate::engine::engine::ContextEngine;
use crate::types::errors::ContextError;
use crate::types::identifiers::ContextId;

/// A handle to one context: its identifier plus the engine that manages it.
///
/// Equal when the identifiers match and both engines share a driver instance.
#[derive(Debug, Clone)]
pub struct Context {
    id: ContextId,
    engine: ContextEngine,
}

impl Context {
    pub(crate) fn new(id: ContextId, engine: ContextEngine) -> Self {
        Self { id, engine }
    }

    pub fn identifier(&self) -> &ContextId {
        &self.id
    }

    pub fn engine(&self) -> &ContextEngine {
        &self.engine
    }

    pub fn end(&self) -> Result<(), ContextError> {
        self.engine.end(&self.id)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.engine.shares_driver_with(&other.engine)
    }
}

impl Eq for Context {}
