//! Severity levels and fatal-event metadata.
use std::fmt;

/// Signal number reported for fatal events that did not come from the OS.
pub const SIGABRT: i32 = 6;

/// Signal number reported for fatal events raised by an interrupt.
pub const SIGINT: i32 = 2;

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Diagnostic detail.
    Debug,
    /// Normal progress.
    Info,
    /// Something unexpected that the program can survive.
    Warning,
    /// A broken invariant; completing the record terminates the process.
    Fatal,
}

// Call-site spellings used by the logging macros: `log!(INFO, ...)`.
impl Level {
    /// Alias of [`Level::Debug`].
    pub const DEBUG: Self = Self::Debug;
    /// Alias of [`Level::Info`].
    pub const INFO: Self = Self::Info;
    /// Alias of [`Level::Warning`].
    pub const WARNING: Self = Self::Warning;
    /// Alias of [`Level::Fatal`].
    pub const FATAL: Self = Self::Fatal;
}

impl Level {
    /// Upper-case name written into each log line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fatal event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalReason {
    /// `log!(FATAL, ...)`.
    ExplicitFatal,
    /// A `check!` condition evaluated to false.
    ContractViolation,
    /// The process received a termination signal.
    OsSignal,
}

/// A fatal event on its way to the fatal handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatalMessage {
    /// The fully formatted fatal line.
    pub message: String,
    /// What triggered the event.
    pub reason: FatalReason,
    /// Signal number; [`SIGABRT`] unless `reason` is [`FatalReason::OsSignal`].
    pub signal_id: i32,
}

impl FatalMessage {
    /// Create a fatal event.
    #[must_use]
    pub fn new(message: impl Into<String>, reason: FatalReason, signal_id: i32) -> Self {
        Self {
            message: message.into(),
            reason,
            signal_id,
        }
    }
}
