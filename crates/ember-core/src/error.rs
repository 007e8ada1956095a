//! Error types for ember-core

use thiserror::Error;

/// Result type alias using ember-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ember-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local database error
    #[error("Local database error: {0}")]
    Database(#[from] libsql::Error),

    /// Network transport error (unreachable host, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Token rejected or missing
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Remote store rejected the request for a non-auth reason
    #[error("Remote API error: {0}")]
    Api(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entry not found
    #[error("Entry not found: {0}")]
    NotFound(String),
}
