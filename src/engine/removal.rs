use std::collections::HashSet;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::engine::context::Context;
use crate::types::errors::ContextError;
use crate::types::identifiers::ContextId;

/// Identifiers whose removal was requested but not yet carried out.
///
/// Keyed by identifier alone. Two bindings that resolve to the same
/// identifier share one entry.
#[derive(Debug, Default)]
pub struct PendingRemovals {
    pending: Mutex<HashSet<ContextId>>,
}

impl PendingRemovals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_for_removal(&self, context: &Context) {
        let fresh = self.pending.lock().insert(context.identifier().clone());
        if fresh {
            debug!(context = %context.identifier(), "context marked for removal");
        }
    }

    pub fn is_pending_removal(&self, context: &Context) -> bool {
        self.pending.lock().contains(context.identifier())
    }

    /// End the context, then forget its pending entry.
    ///
    /// If the driver refuses the removal the entry is left in place, so the
    /// caller can retry later.
    pub fn remove_context(&self, context: &Context) -> Result<(), ContextError> {
        context.end()?;

        let was_pending = self.pending.lock().remove(context.identifier());
        info!(context = %context.identifier(), was_pending, "context removed");
        Ok(())
    }

    /// Sorted snapshot of pending identifiers.
    pub fn pending(&self) -> Vec<ContextId> {
        let mut ids: Vec<ContextId> = self.pending.lock().iter().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}
