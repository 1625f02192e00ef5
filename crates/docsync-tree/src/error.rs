//! Error types for docsync-tree

use std::path::PathBuf;

/// Result type for docsync-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading the local tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Documentation source not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Documentation source is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
