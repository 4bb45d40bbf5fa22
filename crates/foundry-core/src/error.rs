//! Error types for the Foundry service.

use thiserror::Error;

/// Result type alias using Foundry's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Foundry operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item not found
    #[error("Item not found: {0}")]
    ItemNotFound(uuid::Uuid),

    /// Request payload failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Matching service call failed
    #[error("Matching error: {0}")]
    Matching(String),

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notification(String),

    /// Image storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
