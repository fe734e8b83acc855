//! Domain error model.

use thiserror::Error;

/// Result type used across the client core.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (malformed input, static
/// configuration mistakes). Transport concerns belong to the client crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. an unknown role name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A static table or schema is inconsistent. Programmer error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No authenticated session is available.
    #[error("unauthenticated")]
    Unauthenticated,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
