//! Error types for docsync-render

use std::path::PathBuf;

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while rendering one content node
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source could not be read (missing, unreadable, or not UTF-8)
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source is structurally broken
    #[error("{path}:{line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A local image reference does not resolve to a file
    #[error("{path}: image not found: {target}")]
    MissingImage { path: PathBuf, target: String },
}
