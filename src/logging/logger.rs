//! The logger facade: an active worker that owns the log file.
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use super::level::FatalMessage;
use super::sink::LogFile;
use crate::active::Active;
use crate::config::{LogConfig, validate_prefix};
use crate::error::ConfigError;

/// Completion notice for a task posted to the logger's worker.
///
/// Returned by [`Logger::flush`] and [`Logger::fatal`].
#[derive(Debug)]
#[must_use = "a receipt does nothing unless waited on"]
pub struct Receipt(mpsc::Receiver<()>);

impl Receipt {
    /// Block until the task has run.
    ///
    /// Returns `false` if the worker went away before running it.
    pub fn wait(self) -> bool {
        self.0.recv().is_ok()
    }
}

/// Asynchronous file logger.
///
/// Every call posts a task to a dedicated worker thread which is the only
/// owner of the [`LogFile`]; callers never wait for disk I/O. Tasks run in
/// the global order their posts completed, across all producer threads.
///
/// Dropping the logger drains every task posted before the drop, then writes
/// the shutdown trailer and reports the log location.
#[derive(Debug)]
pub struct Logger {
    worker: Option<Active<LogFile>>,
    log_file: PathBuf,
}

impl Logger {
    /// Create the log file in `directory` and start the writer thread.
    ///
    /// The banner is on disk before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if `prefix` is invalid, the file cannot be created,
    /// or the thread cannot be spawned.
    pub fn new(prefix: &str, directory: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let prefix = validate_prefix(prefix)?;
        let sink = LogFile::create(directory.as_ref(), &prefix)?;
        let log_file = sink.path().to_path_buf();
        let worker = Active::create("activelog-writer", sink).map_err(ConfigError::Spawn)?;
        tracing::debug!("logging to {}", log_file.display());
        Ok(Self {
            worker: Some(worker),
            log_file,
        })
    }

    /// Create a logger from a [`LogConfig`].
    ///
    /// # Errors
    ///
    /// See [`Logger::new`].
    pub fn from_config(config: &LogConfig) -> Result<Self, ConfigError> {
        Self::new(&config.prefix, &config.directory)
    }

    /// Create a logger, or report the problem and abort the process.
    ///
    /// For startup code with nowhere to send a configuration error: no
    /// logger is registered yet, so the only channel left is stderr.
    #[must_use]
    #[allow(clippy::print_stderr)]
    pub fn new_or_abort(prefix: &str, directory: impl AsRef<Path>) -> Self {
        match Self::new(prefix, directory) {
            Ok(logger) => logger,
            Err(e) => {
                tracing::error!("activelog: forced abort: {e}");
                eprintln!("activelog: forced abort: {e}");
                std::process::abort()
            }
        }
    }

    /// Path of the log file.
    #[must_use]
    pub fn log_file_path(&self) -> &Path {
        &self.log_file
    }

    /// Queue `entry` to be written with a write-time timestamp.
    ///
    /// Returns as soon as the task is queued.
    pub fn save(&self, entry: impl Into<String>) {
        let entry = entry.into();
        self.post(move |sink| sink.write_entry(&entry));
    }

    /// Queue the fatal write: message, confirmation line, close, report.
    ///
    /// The returned [`Receipt`] resolves once the file has been closed.
    pub fn fatal(&self, message: FatalMessage) -> Receipt {
        let (tx, rx) = mpsc::channel();
        self.post(move |sink| {
            sink.write_fatal(&message);
            tracing::error!("activelog exiting successfully after receiving fatal event");
            tracing::error!("Log file at: [{}]", sink.path().display());
            let _ = tx.send(());
        });
        Receipt(rx)
    }

    /// Queue a barrier; its [`Receipt`] resolves once every earlier task has
    /// been written.
    pub fn flush(&self) -> Receipt {
        let (tx, rx) = mpsc::channel();
        self.post(move |_| {
            let _ = tx.send(());
        });
        Receipt(rx)
    }

    /// Number of tasks waiting for the writer (advisory).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.worker.as_ref().map_or(0, Active::pending)
    }

    pub(crate) fn post(&self, job: impl FnOnce(&mut LogFile) + Send + 'static) {
        if let Some(worker) = &self.worker {
            worker.send(job);
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Some(mut sink) = self.worker.take().and_then(Active::shutdown) {
            sink.write_trailer();
            sink.close();
        }
        tracing::info!("Exiting, log location: {}", self.log_file.display());
    }
}
