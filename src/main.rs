//! `activelog` command-line entry point.
use anyhow::{Context as _, Result};
use clap::Parser;

use activelog::cli::{self, Command};
use activelog::logging::{init_subscriber, install_signal_handler};

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    init_subscriber(args.verbose);

    match args.command {
        Command::Demo(opts) => {
            let config = args.global.resolve()?;
            install_signal_handler().context("installing signal handler")?;
            let path = activelog::demo::run(&config, &opts)?;
            tracing::debug!("demo finished: {}", path.display());
            Ok(())
        }
        Command::Version => {
            let version = option_env!("ACTIVELOG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("activelog {version}");
            Ok(())
        }
    }
}
