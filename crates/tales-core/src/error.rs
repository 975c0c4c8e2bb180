//! Error types for tales-core

use thiserror::Error;

/// Result type alias using tales-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tales-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Note store rejected the request
    #[error("Note store error: {0}")]
    Api(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Realtime channel error
    #[error("Realtime error: {0}")]
    Realtime(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
