//! Error types for the sync engine

use thiserror::Error;

/// Result type alias for the sync engine
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for the sync engine
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Non-success status on a single call or on the outer batch call
    #[error("Remote API error ({status}): {message}")]
    Api {
        /// HTTP status code of the outer response
        status: u16,
        /// Response body, kept verbatim for transient-error classification
        message: String,
    },

    /// Parsing errors (multipart framing, resource paths, feed files)
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid request errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
