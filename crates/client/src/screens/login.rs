//! Sign-in screen.

use lms_forms::{ConfigurationError, FieldSpec, FormSchema};

pub const ENDPOINT: &str = "/auth/login";

pub const EMAIL: &str = "email";
pub const PASSWORD: &str = "password";

pub fn schema() -> Result<FormSchema, ConfigurationError> {
    FormSchema::builder()
        .field(FieldSpec::email(EMAIL).required())
        .field(FieldSpec::password(PASSWORD).required().clear_when_hidden(false))
        .build()
}
