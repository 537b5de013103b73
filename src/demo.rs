//! The `demo` subcommand: register a logger, write from many producers,
//! shut down cleanly.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::DemoOpts;
use crate::config::LogConfig;
use crate::logging::{Logger, initialize_logging, shutdown_logging};

/// Run the demo and return the path of the log file it wrote.
///
/// # Errors
///
/// Returns an error if the log file cannot be created, the registry is
/// already in use, or the producer pool cannot be started.
pub fn run(config: &LogConfig, opts: &DemoOpts) -> Result<PathBuf> {
    use rayon::prelude::*;

    let logger = Logger::from_config(config).with_context(|| {
        format!(
            "creating log file with prefix '{}' in {}",
            config.prefix,
            config.directory.display()
        )
    })?;
    let path = logger.log_file_path().to_path_buf();
    initialize_logging(Arc::new(logger))?;

    crate::logf!(INFO, "Hi log %d", 123);
    crate::log!(INFO).append("Test streaming INFO");
    crate::log!(DEBUG).append("one and two: ").append(1).append(" and ").append(2);
    crate::log!(DEBUG, "float 2.14: {}", 1000.0 / 2.14_f32);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads)
        .thread_name(|i| format!("producer-{i}"))
        .build()
        .context("starting producer pool")?;
    pool.install(|| {
        (0..opts.threads).into_par_iter().for_each(|producer| {
            for line in 0..opts.lines {
                crate::log!(INFO, "producer {producer} line {line}");
            }
        });
    });
    crate::log!(INFO, "{} producers finished", opts.threads);

    let logger = shutdown_logging()?;
    tracing::debug!("draining {} queued records", logger.pending());
    drop(logger);
    Ok(path)
}
