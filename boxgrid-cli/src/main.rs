//! `BoxGrid` CLI - Command-line interface for the `BoxGrid` layout editor
//!
//! Provides commands for showing the container tree, adding, removing,
//! renaming and recoloring containers, resizing and moving them by whole
//! cells, managing item lists, and committing or reverting staged changes.

mod cli;
mod commands;
mod error;
mod util;

use boxgrid_core::{TracingConfig, TracingLevel, init_tracing};
use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let level = if cli.quiet {
        TracingLevel::Error
    } else {
        TracingLevel::from_verbosity(cli.verbose)
    };
    if let Err(e) = init_tracing(&TracingConfig::new().with_level(level)) {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.command, cli.quiet);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
