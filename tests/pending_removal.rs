use std::sync::Arc;

use context_lifecycle::binding::{BindingRegistry, FnResolver};
use context_lifecycle::driver::{DriverConfig, DriverError, MemoryDriver};
use context_lifecycle::engine::{ContextEngine, PendingRemovals};
use context_lifecycle::types::{ContextError, ContextId};

#[test]
fn invariant_mark_then_remove_clears_entry_and_context() {
    let engine = ContextEngine::new(Arc::new(MemoryDriver::new()));
    let pending = PendingRemovals::new();
    let ctx = engine.begin("doc:1").unwrap();

    assert!(!pending.is_pending_removal(&ctx));

    pending.mark_for_removal(&ctx);
    assert!(pending.is_pending_removal(&ctx));

    pending.remove_context(&ctx).unwrap();
    assert!(!pending.is_pending_removal(&ctx));
    assert!(!engine.exists(ctx.identifier()).unwrap());
    assert!(pending.is_empty());
}

#[test]
fn invariant_marking_is_idempotent() {
    let engine = ContextEngine::new(Arc::new(MemoryDriver::new()));
    let pending = PendingRemovals::new();
    let ctx = engine.begin("doc:2").unwrap();

    pending.mark_for_removal(&ctx);
    pending.mark_for_removal(&ctx);
    pending.mark_for_removal(&ctx);
    assert_eq!(pending.len(), 1);

    // One removal clears it regardless of how often it was marked
    pending.remove_context(&ctx).unwrap();
    assert!(!pending.is_pending_removal(&ctx));
}

#[test]
fn removal_only_clears_its_own_entry() {
    let engine = ContextEngine::new(Arc::new(MemoryDriver::new()));
    let pending = PendingRemovals::new();
    let a = engine.begin("doc:a").unwrap();
    let b = engine.begin("doc:b").unwrap();
    let c = engine.begin("doc:c").unwrap();

    pending.mark_for_removal(&c);
    pending.mark_for_removal(&a);
    pending.mark_for_removal(&b);

    pending.remove_context(&b).unwrap();

    assert_eq!(
        pending.pending(),
        vec![ContextId::new("doc:a"), ContextId::new("doc:c")]
    );
    assert!(engine.exists(a.identifier()).unwrap());
    assert!(!engine.exists(b.identifier()).unwrap());
}

#[test]
fn remove_context_without_mark_still_ends_context() {
    let engine = ContextEngine::new(Arc::new(MemoryDriver::new()));
    let pending = PendingRemovals::new();
    let ctx = engine.begin("doc:3").unwrap();

    pending.remove_context(&ctx).unwrap();

    assert!(!engine.exists(ctx.identifier()).unwrap());
    assert!(pending.is_empty());
}

#[test]
fn failed_removal_keeps_entry_pending() {
    let engine = ContextEngine::new(Arc::new(MemoryDriver::with_config(DriverConfig::strict())));
    let pending = PendingRemovals::new();
    let ctx = engine.begin("doc:4").unwrap();
    ctx.end().unwrap();

    pending.mark_for_removal(&ctx);
    let err = pending.remove_context(&ctx).unwrap_err();

    assert!(matches!(err, ContextError::Driver(DriverError::NotFound(_))));
    assert!(pending.is_pending_removal(&ctx));
}

#[test]
fn pending_entries_collide_across_bindings() {
    struct Account {
        id: u32,
    }

    let registry = BindingRegistry::new();
    let pending = PendingRemovals::new();
    let shared_rule = |a: &Account| format!("acct:{}", a.id);
    registry.register(
        "billing",
        Arc::new(FnResolver::<Account, _>::new(shared_rule)),
        Arc::new(MemoryDriver::new()),
    );
    registry.register(
        "audit",
        Arc::new(FnResolver::<Account, _>::new(shared_rule)),
        Arc::new(MemoryDriver::new()),
    );

    let account = Account { id: 5 };
    let billing = registry.begin_from_binding("billing", &account).unwrap();
    let audit = registry.begin_from_binding("audit", &account).unwrap();
    assert_ne!(billing, audit);

    pending.mark_for_removal(&billing);

    // Keyed by identifier only, so the audit context reads as pending too
    assert!(pending.is_pending_removal(&audit));

    pending.remove_context(&audit).unwrap();
    assert!(!pending.is_pending_removal(&billing));
    assert!(billing.engine().exists(billing.identifier()).unwrap());
}
