//! Lifecycle registry for named, driver-backed contexts.
//!
//! `context-lifecycle` opens, looks up and closes contexts identified by a
//! string key. A [`ContextEngine`] wraps a pluggable [`StorageDriver`] and
//! guarantees a context is created at most once; a [`BindingRegistry`] maps
//! context names to a resolver and driver so contexts can be derived from
//! arbitrary objects; [`PendingRemovals`] tracks contexts scheduled for
//! deferred removal.
//!
//! Only existence and identity are managed. What a context holds is up to
//! the caller.

pub mod binding;
pub mod driver;
pub mod engine;
pub mod types;

pub use binding::{Binding, BindingRegistry, FnResolver, IdentifierResolver, JsonFieldResolver};
pub use driver::{DriverConfig, DriverError, FileDriver, MemoryDriver, MissingRemovePolicy, StorageDriver};
pub use engine::{Context, ContextEngine, PendingRemovals};
pub use types::{ContextError, ContextId, ResolveError};
