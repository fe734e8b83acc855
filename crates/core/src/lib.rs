//! `lms-core`: shared building blocks for the LMS admin client.
//!
//! Pure data only: the error model and identifiers used by every other crate.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
