//! Command implementations for docsync-cli

pub mod publish;
pub mod render;

pub use publish::{PublishArgs, run_publish};
pub use render::run_render;

use std::path::{Path, PathBuf};

use tracing::debug;

use docsync_core::PublishConfig;
use docsync_tree::{LocalNode, load_tree};

use crate::error::{CliError, Result};

/// Configuration and local tree shared by every command
pub struct Session {
    pub config: PublishConfig,
    pub source: PathBuf,
    pub tree: LocalNode,
}

impl Session {
    /// Load the configuration at `config_path` and the tree it points to.
    ///
    /// A `source` given on the command line wins over the configured one.
    pub fn open(config_path: &Path, source: Option<&Path>) -> Result<Self> {
        let config = PublishConfig::load(config_path)?;
        let config_dir = match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let source = match source {
            Some(source) => source.to_path_buf(),
            None => config.source_dir(&config_dir),
        };
        debug!("Loading documentation from {}", source.display());
        let tree = load_tree(&source)?;
        if tree.as_directory().is_some_and(|dir| dir.content_count() == 0) {
            return Err(CliError::user(format!(
                "No markdown files found in {}",
                source.display()
            )));
        }

        Ok(Self {
            config,
            source,
            tree,
        })
    }
}
