//! Backend client error types

use thiserror::Error;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Backend client errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// No backend base URL configured
    #[error("Backend API URL is not configured")]
    NotConfigured,

    /// Network request failed
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Backend body was not the expected JSON
    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}
