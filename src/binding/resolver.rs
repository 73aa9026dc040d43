use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::types::errors::ResolveError;
use crate::types::identifiers::ContextId;

/// Derives a context identifier from an arbitrary object.
pub trait IdentifierResolver: Send + Sync {
    fn resolve(&self, object: &dyn Any) -> Result<ContextId, ResolveError>;
}

/// Resolver backed by a closure over a concrete object type.
///
/// Objects of any other type are rejected with [`ResolveError::TypeMismatch`].
pub struct FnResolver<T, F> {
    f: F,
    _object: PhantomData<fn(&T)>,
}

impl<T, F> FnResolver<T, F>
where
    T: Any,
    F: Fn(&T) -> String + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _object: PhantomData,
        }
    }
}

impl<T, F> IdentifierResolver for FnResolver<T, F>
where
    T: Any,
    F: Fn(&T) -> String + Send + Sync,
{
    fn resolve(&self, object: &dyn Any) -> Result<ContextId, ResolveError> {
        let object = object
            .downcast_ref::<T>()
            .ok_or(ResolveError::TypeMismatch {
                expected: type_name::<T>(),
            })?;
        Ok(ContextId::new((self.f)(object)))
    }
}

impl<T, F> fmt::Debug for FnResolver<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnResolver")
            .field("object", &type_name::<T>())
            .finish()
    }
}

/// Resolves `serde_json::Value` objects to `prefix + object[field]`.
///
/// Strings are used verbatim; numbers and booleans by their JSON rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFieldResolver {
    prefix: String,
    field: String,
}

impl JsonFieldResolver {
    pub fn new(prefix: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            field: field.into(),
        }
    }
}

impl IdentifierResolver for JsonFieldResolver {
    fn resolve(&self, object: &dyn Any) -> Result<ContextId, ResolveError> {
        let object = object
            .downcast_ref::<Value>()
            .ok_or(ResolveError::TypeMismatch {
                expected: type_name::<Value>(),
            })?;

        let key = match object.get(self.field.as_str()) {
            None | Some(Value::Null) => return Err(ResolveError::MissingField(self.field.clone())),
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(_) => return Err(ResolveError::UnsupportedValue(self.field.clone())),
        };

        Ok(ContextId::new(format!("{}{}", self.prefix, key)))
    }
}
