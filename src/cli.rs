//! Command-line interface of the `activelog` binary.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::LogConfig;
use crate::error::ConfigError;

/// Top-level CLI entry point for the activelog tool.
#[derive(Parser, Debug)]
#[command(
    name = "activelog",
    about = "Asynchronous file logger with an active-object writer",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log file placement.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// TOML file with `prefix` and `directory` keys
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file name prefix (overrides the config file)
    #[arg(short, long, global = true)]
    pub prefix: Option<String>,

    /// Directory the log file is created in (overrides the config file)
    #[arg(short = 'd', long = "dir", global = true)]
    pub directory: Option<PathBuf>,
}

impl GlobalOpts {
    /// Resolve the effective configuration: file first, then flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub fn resolve(&self) -> Result<LogConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => LogConfig::load(path)?,
            None => LogConfig::default(),
        };
        if let Some(prefix) = &self.prefix {
            config.prefix.clone_from(prefix);
        }
        if let Some(directory) = &self.directory {
            config.directory.clone_from(directory);
        }
        Ok(config)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a burst of records from concurrent producers
    Demo(DemoOpts),
    /// Print version information
    Version,
}

/// Options for the `demo` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DemoOpts {
    /// Number of producer threads
    #[arg(short, long, default_value_t = 4)]
    pub threads: usize,

    /// Records written by each producer
    #[arg(short, long, default_value_t = 1000)]
    pub lines: usize,
}
