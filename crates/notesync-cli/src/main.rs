//! notesync CLI
//!
//! Audits a research workspace and syncs its record store with the
//! markdown notes people actually edit.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let layout = context::resolve_layout(&cli.root, &cli.paths)?;
    match &cli.command {
        Commands::Audit { strict } => commands::run_audit(&layout, *strict),
        Commands::Refs { strict } => commands::run_refs(&layout, *strict),
        Commands::Paper { direction } => commands::run_paper(&layout, direction),
        Commands::Task {
            direction,
            task_dirs,
        } => commands::run_task(&layout, direction, task_dirs),
    }
}

/// Log to stderr. `RUST_LOG` sets the filter; `--verbose` forces debug.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .init();
    tracing::debug!("Verbose mode enabled");
}
