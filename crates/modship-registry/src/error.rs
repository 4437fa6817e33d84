//! Registry error types

use thiserror::Error;

/// Registration errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// One or both credential keys are absent
    #[error("Credentials missing: {0}")]
    MissingCredentials(String),

    /// The endpoint answered with a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The request did not complete in time
    #[error("Registration timed out after {0} seconds")]
    Timeout(u64),

    /// Client configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
