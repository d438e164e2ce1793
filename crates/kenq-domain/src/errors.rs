//! Domain errors for the KenQ portal

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid workflow transition: {event} is not accepted in state {state}")]
    InvalidTransition { state: String, event: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown industry category: {0}")]
    UnknownIndustry(String),

    #[error("Unknown researcher level: {0}")]
    UnknownResearcherLevel(String),

    #[error("University catalog error: {0}")]
    Catalog(String),
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
