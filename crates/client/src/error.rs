use thiserror::Error;

use lms_core::DomainError;
use lms_forms::{ConfigurationError, SubmitError, ValidationFailure};

use crate::session_store::SessionStoreError;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Shown inline next to the fields; never notified.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("a submission is already in progress")]
    Busy,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("session storage failed: {0}")]
    Store(#[from] SessionStoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl From<SubmitError<TransportError>> for ClientError {
    fn from(value: SubmitError<TransportError>) -> Self {
        match value {
            SubmitError::Busy => ClientError::Busy,
            SubmitError::Invalid(failure) => ClientError::Validation(failure),
            SubmitError::Transport(e) => ClientError::Transport(e),
        }
    }
}
