//! docsync CLI
//!
//! Publishes a local documentation tree to a wiki page hierarchy.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use commands::PublishArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to set up logging: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Using configuration {}", cli.config.display());

    match cli.command {
        Commands::Publish {
            source,
            dry_run,
            user,
            password,
            json,
        } => commands::run_publish(
            &cli.config,
            &PublishArgs {
                source,
                dry_run,
                user,
                password,
                json,
            },
        ),
        Commands::Render { source } => commands::run_render(&cli.config, source.as_deref()),
    }
}
