//! Error types for the logging engine.
//!
//! Internal modules return typed errors built with [`thiserror`]; the binary
//! converts them to [`anyhow::Error`] at the command boundary via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! LogError       (completing a record)
//! ├── Uninitialized : a record completed with no logger registered
//! └── Fatal         : a fatal record captured by the test handler
//! ConfigError    (bad prefix, unopenable log file, bad config file)
//! RegistryError  (double init, shutdown with nothing registered)
//! PrintfError    (runtime format failures, annotated into the record)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error raised when a log record is completed.
#[derive(Error, Debug)]
pub enum LogError {
    /// A record was completed while no logger was registered.
    #[error("Logger not initialized with initialize_logging() for msg:\n{entry}")]
    Uninitialized {
        /// The fully formatted line that could not be delivered.
        entry: String,
    },

    /// A fatal record was captured instead of terminating the process.
    #[error("{message}")]
    Fatal {
        /// The formatted fatal line, exactly as written to the log.
        message: String,
    },
}

/// Errors that arise while validating configuration or opening the log file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file name prefix is empty.
    #[error("Empty filename prefix is not allowed")]
    EmptyPrefix,

    /// The file name prefix contains a character that is not allowed.
    #[error("Illegal character [{character}] in logname prefix: [{prefix}]")]
    IllegalCharacter {
        /// The offending character.
        character: char,
        /// The prefix as given.
        prefix: String,
    },

    /// The log file could not be created.
    #[error("Could not open log file [{}]: {source}", .path.display())]
    Open {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The background writer thread could not be started.
    #[error("Could not start log writer thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// A configuration file could not be read.
    #[error("IO error reading config file {}: {source}", .path.display())]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`LogConfig`](crate::config::LogConfig).
    #[error("Invalid config file {}: {message}", .path.display())]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}

/// Errors raised by the process-wide logger registry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// `initialize_logging` was called while a logger was already registered.
    #[error("Logging is already initialized; call shutdown_logging() first")]
    AlreadyInitialized,

    /// `shutdown_logging` was called with no logger registered.
    #[error("Logging is not initialized; nothing to shut down")]
    NotInitialized,
}

/// Errors reported by the printf-style formatter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrintfError {
    /// The format string ends in the middle of a conversion specification.
    #[error("incomplete conversion specification at byte {0}")]
    Incomplete(usize),

    /// The conversion character is not supported.
    #[error("unsupported conversion '%{0}'")]
    UnknownConversion(char),

    /// More conversions than arguments.
    #[error("missing argument for conversion {0}")]
    MissingArgument(usize),

    /// A width or precision exceeds the message size bound.
    #[error("field width or precision at byte {0} exceeds the message size bound")]
    FieldTooWide(usize),

    /// The argument type does not fit the conversion.
    #[error("argument {index} does not match conversion '%{conversion}'")]
    Mismatch {
        /// Zero-based argument position.
        index: usize,
        /// The conversion character.
        conversion: char,
    },
}
