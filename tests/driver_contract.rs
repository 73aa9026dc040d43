use std::sync::Arc;

use context_lifecycle::driver::{
    DriverConfig, DriverError, FileDriver, MemoryDriver, MissingRemovePolicy, StorageDriver,
};
use context_lifecycle::engine::ContextEngine;
use context_lifecycle::types::{ContextError, ContextId};
use tempfile::tempdir;

fn assert_missing_end_ignored(driver: Arc<dyn StorageDriver>) {
    let engine = ContextEngine::new(driver);
    let id = ContextId::new("never-created");

    engine.end(&id).expect("ignore policy must treat a missing end as a no-op");
    assert!(!engine.exists(&id).unwrap());
}

fn assert_missing_end_rejected(driver: Arc<dyn StorageDriver>) {
    let engine = ContextEngine::new(driver);
    let id = ContextId::new("never-created");

    match engine.end(&id) {
        Err(ContextError::Driver(DriverError::NotFound(missing))) => assert_eq!(missing, id),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn memory_driver_end_on_missing_is_noop_by_default() {
    assert_missing_end_ignored(Arc::new(MemoryDriver::new()));
}

#[test]
fn memory_driver_end_on_missing_errors_when_strict() {
    assert_missing_end_rejected(Arc::new(MemoryDriver::with_config(DriverConfig::strict())));
}

#[test]
fn file_driver_end_on_missing_is_noop_by_default() {
    let dir = tempdir().unwrap();
    let driver = FileDriver::open(dir.path().join("contexts"), DriverConfig::v0()).unwrap();
    assert_missing_end_ignored(Arc::new(driver));
}

#[test]
fn file_driver_end_on_missing_errors_when_strict() {
    let dir = tempdir().unwrap();
    let driver = FileDriver::open(dir.path().join("contexts"), DriverConfig::strict()).unwrap();
    assert_missing_end_rejected(Arc::new(driver));
}

#[test]
fn default_config_ignores_missing_removal() {
    let config = DriverConfig::default();
    assert_eq!(config, DriverConfig::v0());
    assert_eq!(config.on_missing_remove, MissingRemovePolicy::Ignore);
}

#[test]
fn config_policy_defaults_when_omitted() {
    let config: DriverConfig = serde_json::from_str(r#"{ "version": "1" }"#).unwrap();
    assert_eq!(config.on_missing_remove, MissingRemovePolicy::Ignore);

    let strict: DriverConfig =
        serde_json::from_str(r#"{ "version": "1", "on_missing_remove": "error" }"#).unwrap();
    assert_eq!(strict, DriverConfig::strict());
}

#[test]
fn memory_driver_create_is_exclusive() {
    let driver = MemoryDriver::new();
    let id = ContextId::new("once");

    driver.create(&id).unwrap();
    assert!(matches!(driver.create(&id), Err(DriverError::AlreadyPresent(_))));
    assert_eq!(driver.len(), 1);
}

#[test]
fn racing_begins_create_exactly_once() {
    let driver = Arc::new(MemoryDriver::new());
    let engine = ContextEngine::new(driver.clone());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || engine.begin("contended").is_ok())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();

    assert_eq!(winners, 1);
    assert_eq!(driver.len(), 1);
}
