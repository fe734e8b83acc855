//! Candidate edit screen (staff editing someone else's profile).
//!
//! Password fields are only part of the form while `showPassword` (granted
//! by the caller) or `showResetPassword` (local toggle) is on.

use std::sync::Arc;

use lms_forms::{
    ConfigurationError, FieldSpec, FieldValue, FormModel, FormSchema, OTHERS, SelectOption, Validator,
};

use super::registration::phone_validator;
use super::{EMPLOYEE_TYPES, MANAGERS, password_pair, plain_options};

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const MANAGER: &str = "manager";
pub const OTHER_MANAGER: &str = "otherManager";
pub const EMPLOYEE_TYPE: &str = "employeeType";
pub const OTHER_EMPLOYEE_TYPE: &str = "otherEmployeeType";
pub const STATUS: &str = "status";
pub const PROFILE_IMAGE: &str = "profileImage";
pub const SHOW_PASSWORD: &str = "showPassword";
pub const SHOW_RESET_PASSWORD: &str = "showResetPassword";

pub fn endpoint(candidate_id: &str) -> String {
    format!("/candidates/{candidate_id}")
}

pub fn schema() -> Result<FormSchema, ConfigurationError> {
    let [password, confirm] = password_pair(&[SHOW_PASSWORD, SHOW_RESET_PASSWORD]);

    FormSchema::builder()
        .field(FieldSpec::text(FIRST_NAME).required().validate(Validator::max_length(50)))
        .field(FieldSpec::text(LAST_NAME).required().validate(Validator::max_length(50)))
        .field(FieldSpec::email(EMAIL).required())
        .field(FieldSpec::text(PHONE).validate(phone_validator()))
        .field(FieldSpec::select(MANAGER, plain_options(MANAGERS)).required())
        .field(FieldSpec::other_for(OTHER_MANAGER, MANAGER))
        .field(FieldSpec::select(EMPLOYEE_TYPE, plain_options(EMPLOYEE_TYPES)).required())
        .field(FieldSpec::other_for(OTHER_EMPLOYEE_TYPE, EMPLOYEE_TYPE))
        .field(
            FieldSpec::select(
                STATUS,
                [SelectOption::new("active", "Active"), SelectOption::new("inactive", "Inactive")],
            )
            .required()
            .default_value("active"),
        )
        .field(FieldSpec::file(PROFILE_IMAGE).output_key("profile_image_path"))
        .field(FieldSpec::mode_flag(SHOW_PASSWORD))
        .field(FieldSpec::mode_flag(SHOW_RESET_PASSWORD))
        .field(password)
        .field(confirm)
        .build()
}

/// Open the edit form over an existing record.
///
/// A stored manager or employee type that is not one of the fixed options is
/// shown as `"Others"` with the value moved into the auxiliary field.
pub fn open<I, K>(schema: Arc<FormSchema>, existing: I, show_password: bool) -> Result<FormModel, ConfigurationError>
where
    I: IntoIterator<Item = (K, FieldValue)>,
    K: Into<String>,
{
    let mut initial: Vec<(String, FieldValue)> = Vec::new();
    for (name, value) in existing {
        let name = name.into();
        let (aux, known): (&str, &[&str]) = match name.as_str() {
            MANAGER => (OTHER_MANAGER, &MANAGERS),
            EMPLOYEE_TYPE => (OTHER_EMPLOYEE_TYPE, &EMPLOYEE_TYPES),
            _ => {
                initial.push((name, value));
                continue;
            }
        };
        let custom = value
            .as_text()
            .is_some_and(|text| !text.is_empty() && !known.contains(&text));
        if custom {
            initial.push((aux.to_string(), value));
            initial.push((name, FieldValue::from(OTHERS)));
        } else {
            initial.push((name, value));
        }
    }
    initial.push((SHOW_PASSWORD.to_string(), FieldValue::from(show_password)));

    FormModel::with_values(schema, initial)
}

/// Toggle the local "reset password" mode.
pub fn set_reset_password(form: &mut FormModel, on: bool) -> Result<(), ConfigurationError> {
    form.set_visibility_derived_fields([(SHOW_RESET_PASSWORD, on)])
}
