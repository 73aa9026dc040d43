use thiserror::Error;

use crate::driver::DriverError;
use crate::types::identifiers::ContextId;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Context already exists: {0}")]
    AlreadyExists(ContextId),

    #[error("No context binding registered under name: {0}")]
    BindingNotFound(String),

    /// Storage failures pass through untouched.
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Resolver expected an object of type {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("Object has no field named {0}")]
    MissingField(String),

    #[error("Field {0} cannot be used as an identifier")]
    UnsupportedValue(String),
}
