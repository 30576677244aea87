//! Error types for tubecap.
//!
//! This module defines a unified error enum covering configuration,
//! I/O, transcript source, metadata source and serialization failures.

use thiserror::Error;

/// Unified error type for tubecap.
///
/// All fallible functions return `Result<T, AppError>`.
/// "No usable captions" is not an error; loaders return an empty result.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors, raised before any network access
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transcript source errors (network, unexpected page layout, caption download)
    #[error("Transcript source error: {0}")]
    Source(String),

    /// Video metadata source errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
