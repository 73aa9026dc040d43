pub mod registry;
pub mod resolver;

pub use registry::{Binding, BindingRegistry};
pub use resolver::{FnResolver, IdentifierResolver, JsonFieldResolver};
