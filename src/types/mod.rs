pub mod errors;
pub mod identifiers;

pub use errors::{ContextError, ResolveError};
pub use identifiers::ContextId;
