pub mod context;
pub mod engine;
pub mod removal;

pub use context::Context;
pub use engine::ContextEngine;
pub use removal::PendingRemovals;
