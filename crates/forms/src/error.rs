//! Form errors.
//!
//! Field-level validation problems are data (`ValidationFailure`), never
//! panics. Schema mistakes are `ConfigurationError`s raised while building.

use std::collections::BTreeMap;

use thiserror::Error;

use lms_core::DomainError;

use crate::field::FieldKind;

/// A schema that cannot be built, or a field name that does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("field '{referenced_by}' references unknown field '{field}'")]
    UnknownField { field: String, referenced_by: String },

    #[error("no field named '{0}'")]
    NoSuchField(String),

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("fields '{first}' and '{second}' both write payload key '{key}'")]
    DuplicateOutputKey {
        key: String,
        first: String,
        second: String,
    },

    #[error("select field '{0}' declares no options")]
    MissingOptions(String),

    #[error("auxiliary field '{field}' is invalid: {reason}")]
    InvalidAuxiliary { field: String, reason: String },

    #[error("field key was issued by a different schema")]
    ForeignKey,

    #[error("field '{field}' is not a {expected} field")]
    KindMismatch { field: String, expected: FieldKind },
}

impl From<ConfigurationError> for DomainError {
    fn from(value: ConfigurationError) -> Self {
        DomainError::configuration(value.to_string())
    }
}

/// Submission blocked by field errors. Keys are field names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationFailure {
    pub errors: BTreeMap<String, String>,
}

/// Why a submission could not start.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    #[error("a submission is already in flight")]
    Busy,

    #[error(transparent)]
    Invalid(#[from] ValidationFailure),
}

/// Outcome of a failed `submit_with`.
#[derive(Debug, Error)]
pub enum SubmitError<E> {
    #[error("a submission is already in flight")]
    Busy,

    #[error(transparent)]
    Invalid(ValidationFailure),

    #[error("submission failed: {0}")]
    Transport(E),
}

impl<E> From<SubmitBlocked> for SubmitError<E> {
    fn from(value: SubmitBlocked) -> Self {
        match value {
            SubmitBlocked::Busy => SubmitError::Busy,
            SubmitBlocked::Invalid(failure) => SubmitError::Invalid(failure),
        }
    }
}
