//! Tests for the Topograph tracing setup.

use std::sync::Mutex;

use topograph_core::tracing::init_tracing;

/// Serializes tests that touch `TOPOGRAPH_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_per_subsystem_filter_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("TOPOGRAPH_LOG", "topograph_analysis=debug,topograph_core=warn");
    init_tracing();
    std::env::remove_var("TOPOGRAPH_LOG");
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("TOPOGRAPH_LOG", "==not a filter==");
    init_tracing();
    std::env::remove_var("TOPOGRAPH_LOG");
    tracing::info!("still logging after fallback");
}
