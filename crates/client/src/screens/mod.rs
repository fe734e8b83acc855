//! Form schemas of the data-entry screens.
//!
//! Each screen exposes its field names, its endpoint and a `schema()` that
//! fails fast on inconsistent declarations.

pub mod candidate;
pub mod login;
pub mod question;
pub mod registration;
pub mod report;

use lms_forms::{Condition, FieldSpec, OTHERS, SelectOption, Validator};

pub(crate) const MANAGERS: [&str; 5] = ["Captain", "Chief Officer", "Chief Engineer", "Superintendent", OTHERS];
pub(crate) const EMPLOYEE_TYPES: [&str; 4] = ["Permanent", "Contract", "Cadet", OTHERS];

pub(crate) fn plain_options<const N: usize>(values: [&str; N]) -> Vec<SelectOption> {
    values.into_iter().map(SelectOption::plain).collect()
}

/// Password + confirmation, shown while either mode flag is on.
pub(crate) fn password_pair(mode_flags: &[&str]) -> [FieldSpec; 2] {
    let shown = Condition::any(mode_flags.iter().map(|f| Condition::is_set(*f)));
    [
        FieldSpec::password("password")
            .required()
            .validate(Validator::min_length(8))
            .visible_when(shown.clone()),
        FieldSpec::confirmation_of("confirmPassword", "password")
            .label("Confirm password")
            .required()
            .visible_when(shown),
    ]
}
