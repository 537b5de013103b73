//! Asynchronous, process-wide logging with an active-object file writer.
//!
//! Call sites on any thread build records with the logging macros; a single
//! background worker owns the log file and writes every record in the order
//! it was submitted. Fatal records and failed contract checks are written
//! and confirmed on disk before the process terminates.
//!
//! The public API is organised into three layers:
//!
//! - **[`queue`]** and **[`active`]**: the blocking task queue and the
//!   worker thread that drains it
//! - **[`logging`]**: the [`Logger`] facade, the registry, the record builder
//!   and fatal escalation
//! - **[`config`]**, **[`cli`]** and **[`demo`]**: startup configuration and
//!   the commands of the `activelog` binary
//!
//! ```no_run
//! use std::sync::Arc;
//! use activelog::{Logger, initialize_logging, log, shutdown_logging};
//!
//! # fn main() -> anyhow::Result<()> {
//! let logger = Arc::new(Logger::new("server", "/var/log")?);
//! initialize_logging(logger)?;
//! log!(INFO, "listening on port {}", 8080);
//! drop(shutdown_logging()?);
//! # Ok(())
//! # }
//! ```
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod active;
pub mod cli;
pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod queue;

pub use error::{ConfigError, LogError, PrintfError, RegistryError};
pub use logging::{
    FmtArg, Level, LogMessage, Logger, initialize_logging, is_logging_initialized,
    shutdown_logging,
};
