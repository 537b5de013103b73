//! Process-wide registration of the active [`Logger`].
//!
//! Exactly one logger can be registered at a time. Call sites reach it
//! through [`current`]; the embedding application owns it before
//! [`initialize_logging`] and gets it back from [`shutdown_logging`].
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::logger::Logger;
use crate::error::RegistryError;

/// The registered logger. The mutex serializes init and shutdown against
/// each other and against lookups from logging call sites.
static LOGGER: Mutex<Option<Arc<Logger>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Arc<Logger>>> {
    LOGGER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register `logger` as the destination for every logging call.
///
/// # Errors
///
/// Returns [`RegistryError::AlreadyInitialized`] if a logger is already
/// registered; `logger` is dropped in that case, so keep a clone if you need it.
pub fn initialize_logging(logger: Arc<Logger>) -> Result<(), RegistryError> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(RegistryError::AlreadyInitialized);
    }
    tracing::debug!("logging initialized: {}", logger.log_file_path().display());
    *slot = Some(logger);
    Ok(())
}

/// Unregister the current logger and hand it back to the caller.
///
/// Logging calls made after this returns fail until a new logger is
/// registered. The caller decides when to drop the logger (which drains it).
///
/// # Errors
///
/// Returns [`RegistryError::NotInitialized`] if nothing is registered.
pub fn shutdown_logging() -> Result<Arc<Logger>, RegistryError> {
    let logger = slot().take().ok_or(RegistryError::NotInitialized)?;
    tracing::debug!("logging shut down: {}", logger.log_file_path().display());
    Ok(logger)
}

/// Whether a logger is currently registered.
#[must_use]
pub fn is_logging_initialized() -> bool {
    slot().is_some()
}

/// The registered logger, if any.
#[must_use]
pub fn current() -> Option<Arc<Logger>> {
    slot().clone()
}

/// Serializes tests that register loggers in the shared slot.
#[cfg(test)]
pub(crate) static TEST_REGISTRY_MUTEX: Mutex<()> = Mutex::new(());

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn lock() -> MutexGuard<'static, ()> {
        TEST_REGISTRY_MUTEX
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn new_logger(tmp: &tempfile::TempDir) -> Arc<Logger> {
        Arc::new(Logger::new("registry", tmp.path()).expect("logger"))
    }

    #[test]
    fn initialize_then_shutdown_round_trips() {
        let _lock = lock();
        let tmp = tempfile::tempdir().unwrap();
        let logger = new_logger(&tmp);
        initialize_logging(Arc::clone(&logger)).unwrap();
        assert!(is_logging_initialized());
        assert!(Arc::ptr_eq(&current().unwrap(), &logger));
        let back = shutdown_logging().unwrap();
        assert!(Arc::ptr_eq(&back, &logger));
        assert!(!is_logging_initialized());
        assert!(current().is_none());
    }

    #[test]
    fn double_initialize_is_rejected() {
        let _lock = lock();
        let tmp = tempfile::tempdir().unwrap();
        let first = new_logger(&tmp);
        initialize_logging(Arc::clone(&first)).unwrap();
        let second = new_logger(&tmp);
        assert_eq!(
            initialize_logging(second),
            Err(RegistryError::AlreadyInitialized)
        );
        // The first registration is untouched.
        assert!(Arc::ptr_eq(&shutdown_logging().unwrap(), &first));
    }

    #[test]
    fn shutdown_without_initialize_is_rejected() {
        let _lock = lock();
        assert_eq!(
            shutdown_logging().map(|_| ()),
            Err(RegistryError::NotInitialized)
        );
    }

    #[test]
    fn reinitialize_after_shutdown_is_allowed() {
        let _lock = lock();
        let tmp = tempfile::tempdir().unwrap();
        initialize_logging(new_logger(&tmp)).unwrap();
        drop(shutdown_logging().unwrap());
        initialize_logging(new_logger(&tmp)).unwrap();
        drop(shutdown_logging().unwrap());
    }

    #[test]
    fn concurrent_initialize_admits_exactly_one() {
        let _lock = lock();
        let tmp = tempfile::tempdir().unwrap();
        let loggers: Vec<_> = (0..8).map(|_| new_logger(&tmp)).collect();
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = loggers
                .iter()
                .map(|l| {
                    let l = Arc::clone(l);
                    s.spawn(move || initialize_logging(l))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        drop(shutdown_logging().unwrap());
    }
}
