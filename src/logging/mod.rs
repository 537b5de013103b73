//! The logging engine: record builder, registry, fatal escalation and the
//! active file writer behind them.

pub mod fatal;
mod level;
mod logger;
mod macros;
mod message;
pub mod printf;
pub mod registry;
mod sink;
mod subscriber;
mod utils;

pub use fatal::{
    AbortOnFatal, CaptureFatal, FatalHandler, capture_fatal_for_testing, install_fatal_handler,
    install_signal_handler,
};
pub use level::{FatalMessage, FatalReason, Level, SIGABRT, SIGINT};
pub use logger::{Logger, Receipt};
pub use message::{LogMessage, RecordKind};
pub use printf::FmtArg;
pub use registry::{initialize_logging, is_logging_initialized, shutdown_logging};
pub use subscriber::init_subscriber;

/// A logger registered for the duration of a test, with fatal events
/// captured instead of aborting.
///
/// Holds [`registry::TEST_REGISTRY_MUTEX`] so registry tests run one at a
/// time; unregisters and drains the logger on drop.
#[cfg(test)]
pub(crate) struct RegisteredLogger {
    logger: std::sync::Arc<Logger>,
    _tmp: tempfile::TempDir,
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl RegisteredLogger {
    /// Flush the writer and read the log file.
    #[allow(clippy::expect_used)]
    pub(crate) fn contents(&self) -> String {
        assert!(self.logger.flush().wait(), "log writer stopped");
        std::fs::read_to_string(self.logger.log_file_path()).expect("read log file")
    }
}

#[cfg(test)]
impl Drop for RegisteredLogger {
    fn drop(&mut self) {
        let _ = shutdown_logging();
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn registered_logger() -> RegisteredLogger {
    let lock = registry::TEST_REGISTRY_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    capture_fatal_for_testing();
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let logger = std::sync::Arc::new(Logger::new("test", tmp.path()).expect("create logger"));
    initialize_logging(std::sync::Arc::clone(&logger)).expect("register logger");
    RegisteredLogger {
        logger,
        _tmp: tmp,
        _lock: lock,
    }
}
