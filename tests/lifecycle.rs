#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the logger lifecycle: registration, use before
//! registration, and drain on shutdown.

mod common;

use std::panic::catch_unwind;
use std::sync::Arc;

use activelog::{LogError, LogMessage, Logger, RegistryError, log};
use activelog::{initialize_logging, is_logging_initialized, shutdown_logging};
use common::{LoggerContext, entries, lock_registry, read};

// ---------------------------------------------------------------------------
// Registration guard
// ---------------------------------------------------------------------------

#[test]
fn second_registration_is_rejected() {
    let ctx = LoggerContext::new("guard");
    let other = Arc::new(Logger::new("other", ctx.dir()).unwrap());
    assert_eq!(
        initialize_logging(other),
        Err(RegistryError::AlreadyInitialized)
    );
    log!(INFO, "still routed to the first logger");
    assert!(ctx.contents().contains("still routed to the first logger"));
}

#[test]
fn shutdown_hands_back_the_registered_logger() {
    let _lock = lock_registry();
    let dir = tempfile::tempdir().unwrap();
    let logger = Arc::new(Logger::new("handback", dir.path()).unwrap());
    initialize_logging(Arc::clone(&logger)).unwrap();
    let back = shutdown_logging().unwrap();
    assert!(Arc::ptr_eq(&logger, &back));
    assert!(!is_logging_initialized());
    assert_eq!(
        shutdown_logging().map(|_| ()),
        Err(RegistryError::NotInitialized)
    );
}

// ---------------------------------------------------------------------------
// Use without a registered logger
// ---------------------------------------------------------------------------

#[test]
fn uninitialized_use_fails_every_time() {
    let _lock = lock_registry();
    for attempt in 0..3 {
        let mut record = LogMessage::new("app/main.rs", 7, "app::main", activelog::Level::INFO);
        record.append(format!("attempt {attempt}"));
        let expected = format!("INFO [main.rs L: 7]\t\"attempt {attempt}\"");
        let err = record.finish().unwrap_err();
        assert!(
            matches!(&err, LogError::Uninitialized { entry } if *entry == expected),
            "unexpected error: {err}"
        );
    }
}

#[test]
fn uninitialized_macro_use_panics_with_log_error() {
    let _lock = lock_registry();
    for _ in 0..2 {
        let payload = catch_unwind(|| log!(WARNING, "nobody listening")).unwrap_err();
        let err = payload.downcast::<LogError>().unwrap();
        assert!(err.to_string().starts_with("Logger not initialized"));
        assert!(err.to_string().contains("nobody listening"));
    }
}

#[test]
fn logging_after_shutdown_fails() {
    let ctx = LoggerContext::new("after");
    log!(INFO, "before shutdown");
    let text = ctx.finish();
    assert!(text.contains("before shutdown"));

    let _lock = lock_registry();
    let err = LogMessage::new("x.rs", 1, "f", activelog::Level::DEBUG)
        .finish()
        .unwrap_err();
    assert!(matches!(err, LogError::Uninitialized { .. }));
}

// ---------------------------------------------------------------------------
// Drain on shutdown
// ---------------------------------------------------------------------------

#[test]
fn shutdown_drains_every_queued_record() {
    let ctx = LoggerContext::new("drain");
    for i in 0..2000 {
        log!(INFO, "record {i}");
    }
    let text = ctx.finish();

    let records: Vec<&str> = entries(&text)
        .into_iter()
        .filter(|e| e.contains("\"record "))
        .collect();
    assert_eq!(records.len(), 2000);
    assert!(records.last().unwrap().ends_with("\"record 1999\""));
    let last = text.rfind("\"record 1999\"").unwrap();
    let trailer = text.rfind("activelog file shutdown at:").unwrap();
    assert!(last < trailer);
}

#[test]
fn reregistration_writes_to_the_new_logger() {
    let first = LoggerContext::new("first");
    log!(INFO, "to first");
    let first_path = first.log_path().to_path_buf();
    drop(first.finish());

    let second = LoggerContext::new("second");
    log!(INFO, "to second");
    assert!(second.contents().contains("to second"));
    assert!(!read(&first_path).contains("to second"));
}
