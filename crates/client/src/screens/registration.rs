//! Candidate self-registration.

use chrono::{Local, NaiveDate};
use lms_forms::{ConfigurationError, FieldSpec, FormSchema, Validator};

use super::{EMPLOYEE_TYPES, MANAGERS, password_pair, plain_options};

pub const ENDPOINT: &str = "/candidates/register";

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const MANAGER: &str = "manager";
pub const OTHER_MANAGER: &str = "otherManager";
pub const EMPLOYEE_TYPE: &str = "employeeType";
pub const OTHER_EMPLOYEE_TYPE: &str = "otherEmployeeType";
pub const SHOW_PASSWORD: &str = "showPassword";
pub const ACCEPT_TERMS: &str = "acceptTerms";

pub(crate) fn phone_validator() -> Validator {
    Validator::custom(Vec::<String>::new(), |value, _| {
        let text = value.as_text().unwrap_or("");
        let digits = text.chars().filter(char::is_ascii_digit).count();
        let allowed = text.chars().all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
        if allowed && (7..=15).contains(&digits) {
            Ok(())
        } else {
            Err("Enter a valid phone number".to_string())
        }
    })
}

fn not_in_future() -> Validator {
    Validator::custom(Vec::<String>::new(), |value, _| {
        let text = value.as_text().unwrap_or("");
        match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) if date > Local::now().date_naive() => {
                Err("Date of birth cannot be in the future".to_string())
            }
            _ => Ok(()),
        }
    })
}

pub fn schema() -> Result<FormSchema, ConfigurationError> {
    let [password, confirm] = password_pair(&[SHOW_PASSWORD]);

    FormSchema::builder()
        .field(FieldSpec::text(FIRST_NAME).required().validate(Validator::max_length(50)))
        .field(FieldSpec::text(LAST_NAME).required().validate(Validator::max_length(50)))
        .field(FieldSpec::email(EMAIL).required())
        .field(FieldSpec::text(PHONE).required().validate(phone_validator()))
        .field(FieldSpec::date(DATE_OF_BIRTH).required().validate(not_in_future()))
        .field(FieldSpec::select(MANAGER, plain_options(MANAGERS)).required())
        .field(FieldSpec::other_for(OTHER_MANAGER, MANAGER).validate(Validator::max_length(100)))
        .field(FieldSpec::select(EMPLOYEE_TYPE, plain_options(EMPLOYEE_TYPES)).required())
        .field(FieldSpec::other_for(OTHER_EMPLOYEE_TYPE, EMPLOYEE_TYPE).validate(Validator::max_length(100)))
        .field(FieldSpec::mode_flag(SHOW_PASSWORD).default_value(true))
        .field(password)
        .field(confirm)
        .field(
            FieldSpec::checkbox(ACCEPT_TERMS)
                .label("Terms and conditions")
                .required()
                .omit_from_payload(),
        )
        .build()
}
