//! Error types for docsync-client

/// Result type for client construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up the HTTP client
///
/// Failures of individual remote calls are reported as
/// [`docsync_core::Error`] values instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configured base URL cannot be used
    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
