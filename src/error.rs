//! Error types for a3s-bootstrap

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while installing or launching a managed tool
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Non-success HTTP response from the release endpoint or download URL
    #[error("Request to {url} returned {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// HTTP transport failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Release metadata fetch exceeded its deadline
    #[error("Release metadata fetch timed out after {0:?}")]
    FetchTimeout(Duration),

    /// Operation aborted through the shared cancellation token
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Subprocess could not be started
    #[error("Failed to spawn '{command}': {reason}")]
    Spawn { command: String, reason: String },
}

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;
