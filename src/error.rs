//! Error types for HAL normalization
//!
//! The normalization pipeline itself is total: malformed input is
//! classified as "not a resource" and passed through rather than
//! rejected. Errors only arise around it, when loading or serializing
//! documents and when validating CLI options.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Failed to read document from {path}: {reason}")]
    ReadError { path: String, reason: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
