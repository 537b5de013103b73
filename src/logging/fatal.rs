//! Fatal escalation: what happens once a record turns out to be fatal.
//!
//! A completed fatal record becomes a [`FatalMessage`] and is handed to the
//! process-wide [`FatalHandler`]. The production handler makes the message
//! durable and then aborts; the test handler makes it durable and returns a
//! recoverable [`LogError::Fatal`] instead.
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

use super::level::{FatalMessage, FatalReason, SIGINT};
use super::logger::Logger;
use super::registry;
use crate::error::LogError;

/// Receives every fatal event raised while a logger is registered.
pub trait FatalHandler: Send + Sync + Debug {
    /// Handle one fatal event.
    ///
    /// Implementations that return must have made `message` durable in
    /// `logger` first.
    ///
    /// # Errors
    ///
    /// Returns the error the triggering call site should observe.
    fn handle(&self, logger: &Logger, message: FatalMessage) -> Result<(), LogError>;
}

/// Production handler: write the message, wait for the writer to confirm,
/// then abort the process. Never returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnFatal;

impl FatalHandler for AbortOnFatal {
    fn handle(&self, logger: &Logger, message: FatalMessage) -> Result<(), LogError> {
        if !logger.fatal(message).wait() {
            tracing::error!("log writer stopped before the fatal message was confirmed");
        }
        std::process::abort()
    }
}

/// Test handler: write the message, wait until it is on disk, and return
/// [`LogError::Fatal`] carrying the exact formatted line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureFatal;

impl FatalHandler for CaptureFatal {
    fn handle(&self, logger: &Logger, message: FatalMessage) -> Result<(), LogError> {
        logger.save(message.message.clone());
        if !logger.flush().wait() {
            tracing::warn!("log writer stopped before the fatal message was flushed");
        }
        Err(LogError::Fatal {
            message: message.message,
        })
    }
}

/// `None` selects [`AbortOnFatal`].
static HANDLER: RwLock<Option<Arc<dyn FatalHandler>>> = RwLock::new(None);

/// Replace the process-wide fatal handler.
///
/// This is the one place the fatal policy can be changed. It is meant to be
/// called once at startup, before any logger is registered; a handler
/// installed later applies to every fatal event raised after the call,
/// including those from other threads. Installing [`AbortOnFatal`] restores
/// the default.
pub fn install_fatal_handler(handler: Arc<dyn FatalHandler>) {
    *HANDLER.write().unwrap_or_else(PoisonError::into_inner) = Some(handler);
}

/// Make fatal events recoverable: they are still written to the log, then
/// reported as [`LogError::Fatal`] instead of aborting.
pub fn capture_fatal_for_testing() {
    install_fatal_handler(Arc::new(CaptureFatal));
}

fn handler() -> Arc<dyn FatalHandler> {
    let installed = HANDLER.read().unwrap_or_else(PoisonError::into_inner).clone();
    match installed {
        Some(handler) => handler,
        None => Arc::new(AbortOnFatal),
    }
}

/// Route a fatal event through the installed handler.
pub(crate) fn dispatch(logger: &Logger, message: FatalMessage) -> Result<(), LogError> {
    handler().handle(logger, message)
}

/// Turn SIGINT and SIGTERM into fatal events on the registered logger.
///
/// The event goes through the same handler as `log!(FATAL)`. If no logger is
/// registered when the signal arrives, the process aborts after reporting it
/// on the console.
///
/// # Errors
///
/// Returns an error if a signal handler is already installed.
pub fn install_signal_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        if let Err(e) = raise_signal_fatal() {
            tracing::error!("{e}");
        }
    })
}

fn raise_signal_fatal() -> Result<(), LogError> {
    let message = FatalMessage::new(
        format!("\n[  *******\tEXIT trigger caused by OS signal: SIGINT({SIGINT}) or SIGTERM\n\t"),
        FatalReason::OsSignal,
        SIGINT,
    );
    tracing::error!("{}\t*******  ]", message.message);
    let Some(logger) = registry::current() else {
        tracing::error!("no logger registered to record the termination signal");
        std::process::abort()
    };
    dispatch(&logger, message)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::level::SIGABRT;
    use crate::logging::registry::TEST_REGISTRY_MUTEX;
    use std::fs;

    #[test]
    fn capture_handler_writes_and_returns_message() {
        let tmp = tempfile::tempdir().unwrap();
        let logger = Logger::new("fatal", tmp.path()).unwrap();
        let msg = FatalMessage::new("FATAL [f.rs at: g L: 2]", FatalReason::ExplicitFatal, SIGABRT);
        let err = CaptureFatal.handle(&logger, msg).unwrap_err();
        assert!(matches!(&err, LogError::Fatal { message } if message == "FATAL [f.rs at: g L: 2]"));
        // Durable before the error is returned.
        let text = fs::read_to_string(logger.log_file_path()).unwrap();
        assert!(text.contains("FATAL [f.rs at: g L: 2]"));
    }

    #[test]
    fn installed_handler_is_used_by_dispatch() {
        #[derive(Debug)]
        struct Reject;
        impl FatalHandler for Reject {
            fn handle(&self, _: &Logger, message: FatalMessage) -> Result<(), LogError> {
                Err(LogError::Fatal {
                    message: format!("rejected: {}", message.message),
                })
            }
        }

        let _lock = TEST_REGISTRY_MUTEX
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let tmp = tempfile::tempdir().unwrap();
        let logger = Logger::new("fatal", tmp.path()).unwrap();
        install_fatal_handler(Arc::new(Reject));
        let err = dispatch(
            &logger,
            FatalMessage::new("x", FatalReason::ContractViolation, SIGABRT),
        )
        .unwrap_err();
        capture_fatal_for_testing();
        assert_eq!(err.to_string(), "rejected: x");
    }

    #[test]
    fn signal_fatal_goes_through_handler() {
        let _lock = TEST_REGISTRY_MUTEX
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        capture_fatal_for_testing();
        let tmp = tempfile::tempdir().unwrap();
        registry::initialize_logging(Arc::new(Logger::new("signal", tmp.path()).unwrap())).unwrap();
        let err = raise_signal_fatal().unwrap_err();
        let logger = registry::shutdown_logging().unwrap();
        assert!(err.to_string().contains("EXIT trigger caused by OS signal"));
        let text = fs::read_to_string(logger.log_file_path()).unwrap();
        assert!(text.contains("SIGINT(2)"));
    }
}
