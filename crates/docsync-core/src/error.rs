//! Error types for docsync-core
//!
//! Remote failures always reach the core through
//! [`translate`](crate::remote::translate), which sorts them into the
//! client/server/unclassified variants below.

use std::path::PathBuf;

/// Boxed transport-level cause
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for docsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in docsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 4xx response: bad request shape, permissions, version conflict
    #[error("{message}")]
    Client {
        message: String,
        url: String,
        status: u16,
        #[source]
        source: Option<BoxError>,
    },

    /// 5xx response
    #[error("{message}")]
    Server {
        message: String,
        url: String,
        status: u16,
        #[source]
        source: Option<BoxError>,
    },

    /// Any other transport fault, including requests that got no response
    #[error("{message}")]
    Unclassified {
        message: String,
        url: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Local content failed to render
    #[error("Failed to render {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: docsync_render::Error,
    },

    /// Attachment bytes could not be loaded at upload time
    #[error("Failed to read attachment {filename}: {source}")]
    Attachment {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parsed but is unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Local tree error from docsync-tree
    #[error(transparent)]
    Tree(#[from] docsync_tree::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    /// HTTP status of a remote failure, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Client { status, .. } | Error::Server { status, .. } => Some(*status),
            Error::Unclassified { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether this error came from the remote store.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Client { .. } | Error::Server { .. } | Error::Unclassified { .. }
        )
    }
}
