//! Error types for docsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from docsync-core
    #[error(transparent)]
    Core(#[from] docsync_core::Error),

    /// Error from docsync-client
    #[error(transparent)]
    Client(#[from] docsync_client::Error),

    /// Error from docsync-tree
    #[error(transparent)]
    Tree(#[from] docsync_tree::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
