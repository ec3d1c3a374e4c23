//! Error types for ssao-rs.

use thiserror::Error;

/// The main error type for ssao-rs configuration and data operations.
#[derive(Error, Debug)]
pub enum SsaoError {
    /// A configuration value is out of range.
    #[error("invalid SSAO config: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for ssao-rs operations.
pub type Result<T> = std::result::Result<T, SsaoError>;
