// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed logger context so each integration
// test can register a logger in the process-wide registry without repeating
// setup, and without racing the other tests of the same binary.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use activelog::logging::capture_fatal_for_testing;
use activelog::{Logger, initialize_logging, shutdown_logging};

/// Serializes tests that touch the process-wide registry.
static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

/// Take the registry lock without registering anything.
pub fn lock_registry() -> MutexGuard<'static, ()> {
    REGISTRY_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An isolated logger backed by a [`tempfile::TempDir`] and registered for
/// the lifetime of the context.
///
/// Fatal events are captured rather than aborting. Dropping the context
/// unregisters and drains the logger, then releases the registry lock.
pub struct LoggerContext {
    logger: Option<Arc<Logger>>,
    path: PathBuf,
    dir: tempfile::TempDir,
    _lock: MutexGuard<'static, ()>,
}

impl LoggerContext {
    /// Register a new logger writing to a fresh temporary directory.
    pub fn new(prefix: &str) -> Self {
        let lock = lock_registry();
        capture_fatal_for_testing();
        let dir = tempfile::tempdir().expect("create temp dir");
        let logger = Arc::new(Logger::new(prefix, dir.path()).expect("create logger"));
        let path = logger.log_file_path().to_path_buf();
        initialize_logging(Arc::clone(&logger)).expect("register logger");
        Self {
            logger: Some(logger),
            path,
            dir,
            _lock: lock,
        }
    }

    /// The registered logger.
    pub fn logger(&self) -> &Logger {
        self.logger.as_deref().expect("logger still registered")
    }

    /// Directory the log file lives in.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the log file.
    pub fn log_path(&self) -> &Path {
        &self.path
    }

    /// Flush the writer and read the whole log file.
    pub fn contents(&self) -> String {
        assert!(self.logger().flush().wait(), "log writer stopped");
        read(&self.path)
    }

    /// Unregister and drain the logger, returning the final file contents.
    pub fn finish(mut self) -> String {
        let registered = shutdown_logging().expect("logger registered");
        drop(registered);
        drop(self.logger.take());
        read(&self.path)
    }
}

impl Drop for LoggerContext {
    fn drop(&mut self) {
        if self.logger.is_some() {
            let _ = shutdown_logging();
        }
    }
}

/// Read a log file.
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read log file")
}

/// The entry part of every timestamped line (text after the first tab),
/// skipping the banner.
pub fn entries(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
        .filter_map(|l| l.split_once('\t').map(|(_, entry)| entry))
        .collect()
}
