//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use docsync_core::config::CONFIG_FILE;

/// docsync - Publish a documentation tree to a wiki page hierarchy
#[derive(Parser, Debug)]
#[command(name = "docsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Publish the documentation tree
    ///
    /// Renders every page first; nothing is sent if any page fails to render.
    ///
    /// Examples:
    ///   docsync publish                  # Use docsync.toml in the current directory
    ///   docsync publish --dry-run        # Show the plan without changing anything
    ///   docsync -c site.toml publish -s docs/
    Publish {
        /// Documentation source directory (overrides the config)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Compute and print the plan without applying it
        #[arg(long)]
        dry_run: bool,

        /// User name for the remote store (overrides the config)
        #[arg(long, env = "DOCSYNC_USER")]
        user: Option<String>,

        /// Password or API token (overrides the config)
        #[arg(long, env = "DOCSYNC_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the documentation tree without contacting the remote store
    Render {
        /// Documentation source directory (overrides the config)
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
}
