//! `lms-forms`: declarative form schemas and the form state model.
//!
//! A [`FormSchema`] is built once per screen and checked for consistency up
//! front. A [`FormModel`] owns the values, errors and per-field state of one
//! screen instance and turns them into a [`NormalizedPayload`] on submit.

pub mod condition;
pub mod error;
pub mod field;
pub mod file;
pub mod model;
pub mod payload;
pub mod schema;
pub mod validator;
pub mod value;

pub use condition::Condition;
pub use error::{ConfigurationError, SubmitBlocked, SubmitError, ValidationFailure};
pub use field::{FieldKind, FieldSpec, OTHERS, SelectOption};
pub use file::{FileSelection, PendingFile, PreviewHandle};
pub use model::{FieldState, FormModel};
pub use payload::{NormalizedPayload, to_snake_case};
pub use schema::{FieldKey, FormSchema, FormSchemaBuilder};
pub use validator::Validator;
pub use value::{FieldValue, FormValues};
