//! Error types for trackd
//!
//! Defines the crate-wide error enum covering configuration, I/O, and
//! serialization failures. Uses thiserror for ergonomic error handling.
//!
//! Validation failures on the issue API are NOT represented here — those are
//! expected outcomes with their own payload contract and live in
//! [`crate::store::StoreError`].

use thiserror::Error;

/// Result type alias for trackd operations
pub type Result<T> = std::result::Result<T, TrackdError>;

/// Crate-wide error type for trackd operations
#[derive(Error, Debug)]
pub enum TrackdError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
