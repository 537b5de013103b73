//! The per-call-site record builder.
//!
//! A [`LogMessage`] is created by the logging macros, collects text, and is
//! completed exactly once: explicitly with [`LogMessage::finish`] or
//! implicitly when it is dropped at the end of the logging statement.
use std::fmt::{self, Write as _};

use super::fatal;
use super::level::{FatalMessage, FatalReason, Level, SIGABRT};
use super::printf::{FmtArg, bounded, sprintf};
use super::registry;
use super::utils::split_file_name;
use crate::error::LogError;

/// What kind of record a [`LogMessage`] builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// An ordinary `DEBUG`, `INFO` or `WARNING` record.
    Leveled(Level),
    /// `log!(FATAL, ...)`.
    ExplicitFatal,
    /// A failed `check!`; carries the source text of the condition.
    ContractViolation {
        /// The condition as written at the call site.
        expression: String,
    },
}

impl RecordKind {
    /// Severity written into the line.
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::Leveled(level) => *level,
            Self::ExplicitFatal | Self::ContractViolation { .. } => Level::Fatal,
        }
    }

    const fn fatal_reason(&self) -> Option<FatalReason> {
        match self {
            Self::Leveled(Level::Fatal) | Self::ExplicitFatal => Some(FatalReason::ExplicitFatal),
            Self::Leveled(_) => None,
            Self::ContractViolation { .. } => Some(FatalReason::ContractViolation),
        }
    }
}

/// One log record under construction.
///
/// Text accumulates through [`append`](Self::append),
/// [`append_args`](Self::append_args), [`message_save`](Self::message_save)
/// or [`std::fmt::Write`]. Completion formats the line and hands it to the
/// registered [`Logger`](super::Logger); fatal records go to the fatal
/// handler instead.
///
/// If the record is dropped without [`finish`](Self::finish), it completes
/// itself and raises any error as a panic whose payload is the [`LogError`].
#[derive(Debug)]
pub struct LogMessage {
    file: &'static str,
    line: u32,
    function: &'static str,
    kind: RecordKind,
    stream: String,
    finished: bool,
}

impl LogMessage {
    /// Start a record at `level`. [`Level::Fatal`] starts an explicit fatal
    /// record.
    #[must_use]
    pub fn new(file: &'static str, line: u32, function: &'static str, level: Level) -> Self {
        let kind = if level == Level::Fatal {
            RecordKind::ExplicitFatal
        } else {
            RecordKind::Leveled(level)
        };
        Self::with_kind(file, line, function, kind)
    }

    /// Start a contract-violation record for the failed `expression`.
    #[must_use]
    pub fn contract(
        file: &'static str,
        line: u32,
        function: &'static str,
        expression: impl Into<String>,
    ) -> Self {
        let kind = RecordKind::ContractViolation {
            expression: expression.into(),
        };
        Self::with_kind(file, line, function, kind)
    }

    const fn with_kind(
        file: &'static str,
        line: u32,
        function: &'static str,
        kind: RecordKind,
    ) -> Self {
        Self {
            file,
            line,
            function,
            kind,
            stream: String::new(),
            finished: false,
        }
    }

    /// The kind of record being built.
    #[must_use]
    pub const fn kind(&self) -> &RecordKind {
        &self.kind
    }

    /// Text accumulated so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.stream
    }

    /// Append anything printable.
    pub fn append(&mut self, value: impl fmt::Display) -> &mut Self {
        let _ = write!(self.stream, "{value}");
        self
    }

    /// Append pre-formatted arguments, bounded to
    /// [`MAX_MESSAGE_SIZE`](super::printf::MAX_MESSAGE_SIZE) characters.
    pub fn append_args(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        self.stream.push_str(&bounded(&fmt::format(args)));
        self
    }

    /// Append a printf-style message.
    ///
    /// A format that cannot be expanded with `args` appends an error
    /// notification quoting the raw format; an expansion longer than
    /// [`MAX_MESSAGE_SIZE`](super::printf::MAX_MESSAGE_SIZE) is cut and marked.
    pub fn message_save(&mut self, format: &str, args: &[FmtArg]) -> &mut Self {
        match sprintf(format, args) {
            Ok(text) => self.stream.push_str(&bounded(&text)),
            Err(e) => {
                tracing::debug!("printf-style message rejected: {e}");
                let _ = writeln!(
                    self.stream,
                    "\n\tERROR LOG MSG NOTIFICATION: Failure to parse successfully the message\"{format}\""
                );
            }
        }
        self
    }

    /// The line this record produces on completion.
    #[must_use]
    pub fn entry(&self) -> String {
        let mut out = String::new();
        match &self.kind {
            RecordKind::Leveled(_) => {}
            RecordKind::ExplicitFatal => {
                out.push_str("\n[  *******\tEXIT trigger caused by LOG(FATAL): \n\t");
            }
            RecordKind::ContractViolation { expression } => {
                let _ = write!(
                    out,
                    "\n[  *******\tEXIT trigger caused by broken Contract: CHECK({expression})\n\t"
                );
            }
        }
        let level = self.kind.level();
        let _ = write!(out, "{level} [{}", split_file_name(self.file));
        if level == Level::Fatal {
            let _ = write!(out, " at: {}", self.function);
        }
        let _ = write!(out, " L: {}]\t", self.line);
        if !self.stream.is_empty() {
            let _ = write!(out, "\"{}\"", self.stream);
        }
        out
    }

    /// Complete the record.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::Uninitialized`] if no logger is registered, or the
    /// fatal handler's error for a fatal record (the production handler does
    /// not return).
    pub fn finish(mut self) -> Result<(), LogError> {
        self.complete()
    }

    // The panic payload raised on drop is not printable by the default hook,
    // so the entry also goes straight to the console.
    #[allow(clippy::print_stderr)]
    fn complete(&mut self) -> Result<(), LogError> {
        self.finished = true;
        let entry = self.entry();
        let Some(logger) = registry::current() else {
            tracing::error!(
                "Did you forget to call initialize_logging(Arc<Logger>) in your main?\n{entry}"
            );
            eprintln!(
                "activelog: Did you forget to call initialize_logging(Arc<Logger>) in your main?\n{entry}"
            );
            return Err(LogError::Uninitialized { entry });
        };
        match self.kind.fatal_reason() {
            None => {
                logger.save(entry);
                Ok(())
            }
            Some(reason) => {
                tracing::error!("{entry}\t*******  ]");
                fatal::dispatch(&logger, FatalMessage::new(entry, reason, SIGABRT))
            }
        }
    }
}

impl fmt::Write for LogMessage {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.stream.push_str(s);
        Ok(())
    }
}

impl Drop for LogMessage {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(e) = self.complete() {
            if std::thread::panicking() {
                tracing::error!("log record failed during unwind: {e}");
            } else {
                std::panic::panic_any(e);
            }
        }
    }
}
