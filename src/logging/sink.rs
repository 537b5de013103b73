//! The log file itself: banner, timestamped lines, fatal trailer.
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write as _};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::level::FatalMessage;
use super::utils::{format_ctime, format_line_time, log_file_name};
use crate::error::ConfigError;

/// Line written after a fatal message once it has reached the file.
pub(crate) const FATAL_FLUSHED_TEXT: &str = "Log flushed successfully to disk: exiting";

/// Append-only writer for one log file.
///
/// Owned by the logger's worker thread; producers never see it. Every
/// record is flushed as soon as it is written. After [`close`](Self::close)
/// further writes are silently dropped.
#[derive(Debug)]
pub struct LogFile {
    out: Option<BufWriter<File>>,
    path: PathBuf,
    start: Instant,
}

impl LogFile {
    /// Create (truncating) the log file for `prefix` in `directory` and write
    /// the banner.
    ///
    /// `prefix` must already be validated.
    pub(crate) fn create(directory: &Path, prefix: &str) -> Result<Self, ConfigError> {
        Self::open_at(log_file_name(directory, prefix))
    }

    /// Create (truncating) the log file at `path` and write the banner.
    fn open_at(path: PathBuf) -> Result<Self, ConfigError> {
        let open_error = |source| ConfigError::Open {
            path: path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(open_error)?;
        let mut sink = Self {
            out: Some(BufWriter::new(file)),
            path: path.clone(),
            start: Instant::now(),
        };
        let version =
            option_env!("ACTIVELOG_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let banner = format!(
            "\t\tactivelog {version} created log file at: {}\
             \t\tLOG format: [YYYY/MM/DD hh:mm:ss.uuu* LEVEL FILE:LINE] message\n\n",
            format_ctime(),
        );
        sink.write_raw(&banner).map_err(open_error)?;
        Ok(sink)
    }

    /// Path of the file on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    const fn is_open(&self) -> bool {
        self.out.is_some()
    }

    /// Append one timestamped record.
    ///
    /// The timestamp is taken here, on the writing thread, not when the
    /// record was produced.
    pub fn write_entry(&mut self, entry: &str) {
        let line = format!("\n{}\t{entry}", format_line_time(self.start.elapsed()));
        if let Err(e) = self.write_raw(&line) {
            tracing::error!("failed to write to {}: {e}", self.path.display());
        }
    }

    /// Write a fatal message and its confirmation, then close the file.
    pub fn write_fatal(&mut self, message: &FatalMessage) {
        self.write_entry(&message.message);
        self.write_entry(FATAL_FLUSHED_TEXT);
        self.close();
    }

    /// Write the clean-shutdown trailer.
    pub fn write_trailer(&mut self) {
        let trailer = format!("\n\t\tactivelog file shutdown at: {}", format_ctime());
        if let Err(e) = self.write_raw(&trailer) {
            tracing::error!("failed to write trailer to {}: {e}", self.path.display());
        }
    }

    /// Flush and close the file.
    pub fn close(&mut self) {
        if let Some(mut out) = self.out.take()
            && let Err(e) = out.flush()
        {
            tracing::error!("failed to flush {}: {e}", self.path.display());
        }
    }

    fn write_raw(&mut self, text: &str) -> io::Result<()> {
        let Some(out) = self.out.as_mut() else {
            return Ok(());
        };
        out.write_all(text.as_bytes())?;
        out.flush()
    }
}
