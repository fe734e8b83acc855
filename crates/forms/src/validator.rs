//! Field validators.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::value::{FieldValue, FormValues};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";

/// Custom check: receives the field's value and every current value.
pub type CustomCheck = Arc<dyn Fn(&FieldValue, &FormValues) -> Result<(), String> + Send + Sync>;

#[derive(Clone)]
pub enum Validator {
    MinLength { min: usize, message: Option<String> },
    MaxLength { max: usize, message: Option<String> },
    /// Value must equal another field's value (confirmation fields).
    ///
    /// Only enforced while the other field is visible and required. Runs on a
    /// blank confirmation too.
    Matches { field: String, message: String },
    /// Date must not be earlier than another date field.
    NotBefore { field: String, message: String },
    Custom { depends_on: Vec<String>, check: CustomCheck },
}

impl Validator {
    pub fn min_length(min: usize) -> Self {
        Self::MinLength { min, message: None }
    }

    pub fn max_length(max: usize) -> Self {
        Self::MaxLength { max, message: None }
    }

    pub fn matches(field: impl Into<String>) -> Self {
        Self::matches_with(field, PASSWORDS_DO_NOT_MATCH)
    }

    pub fn matches_with(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Matches {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_before(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotBefore {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn custom<S, F>(depends_on: impl IntoIterator<Item = S>, check: F) -> Self
    where
        S: Into<String>,
        F: Fn(&FieldValue, &FormValues) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::Custom {
            depends_on: depends_on.into_iter().map(Into::into).collect(),
            check: Arc::new(check),
        }
    }

    /// Fields other than the validated one that this validator reads.
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            Self::MinLength { .. } | Self::MaxLength { .. } => Vec::new(),
            Self::Matches { field, .. } | Self::NotBefore { field, .. } => vec![field.as_str()],
            Self::Custom { depends_on, .. } => depends_on.iter().map(String::as_str).collect(),
        }
    }

    /// Confirmation checks also run on an empty value, so an optional
    /// confirmation cannot be skipped while its primary holds something.
    pub(crate) fn checks_blank(&self) -> bool {
        matches!(self, Self::Matches { .. })
    }

    /// Run against a non-blank value, or a blank one for
    /// [`Validator::checks_blank`] validators.
    ///
    /// `actively_required` tells whether a named field is currently visible
    /// and required; confirmation checks switch off when it is not.
    pub(crate) fn check(
        &self,
        label: &str,
        value: &FieldValue,
        values: &FormValues,
        actively_required: impl Fn(&str) -> bool,
    ) -> Result<(), String> {
        let text = value.as_text().unwrap_or("");
        match self {
            Self::MinLength { min, message } => {
                if text.chars().count() < *min {
                    return Err(message
                        .clone()
                        .unwrap_or_else(|| format!("{label} must be at least {min} characters")));
                }
                Ok(())
            }
            Self::MaxLength { max, message } => {
                if text.chars().count() > *max {
                    return Err(message
                        .clone()
                        .unwrap_or_else(|| format!("{label} must be at most {max} characters")));
                }
                Ok(())
            }
            Self::Matches { field, message } => {
                if !actively_required(field) {
                    return Ok(());
                }
                if values.text(field) != text {
                    return Err(message.clone());
                }
                Ok(())
            }
            Self::NotBefore { field, message } => {
                let this = NaiveDate::parse_from_str(text, DATE_FORMAT);
                let other = NaiveDate::parse_from_str(values.text(field), DATE_FORMAT);
                match (this, other) {
                    (Ok(this), Ok(other)) if this < other => Err(message.clone()),
                    _ => Ok(()),
                }
            }
            Self::Custom { check, .. } => check(value, values),
        }
    }
}

impl core::fmt::Debug for Validator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MinLength { min, .. } => write!(f, "MinLength({min})"),
            Self::MaxLength { max, .. } => write!(f, "MaxLength({max})"),
            Self::Matches { field, .. } => write!(f, "Matches({field})"),
            Self::NotBefore { field, .. } => write!(f, "NotBefore({field})"),
            Self::Custom { depends_on, .. } => write!(f, "Custom(depends_on: {depends_on:?})"),
        }
    }
}

/// Loose syntactic email check; the backend owns real verification.
pub(crate) fn is_valid_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub(crate) fn is_valid_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_: &str) -> bool {
        true
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("trainer@academy.org"));
        assert!(!is_valid_email("trainer@academy"));
        assert!(!is_valid_email("trainer academy@x.org"));
        assert!(!is_valid_email("@academy.org"));
        assert!(!is_valid_email("a@b@c.org"));
    }

    #[test]
    fn min_length_counts_characters() {
        let v = Validator::min_length(3);
        let values = FormValues::new();
        assert!(v.check("Name", &"éé".into(), &values, always).is_err());
        assert!(v.check("Name", &"ééé".into(), &values, always).is_ok());
    }

    #[test]
    fn matches_is_inert_when_primary_not_required() {
        let v = Validator::matches("password");
        let values: FormValues = [("password", "abc123")].into_iter().collect();
        assert!(v.check("Confirm", &"nope".into(), &values, |_| false).is_ok());
        assert_eq!(
            v.check("Confirm", &"nope".into(), &values, always),
            Err(PASSWORDS_DO_NOT_MATCH.to_string())
        );
    }

    #[test]
    fn blank_confirmation_must_match_primary() {
        let v = Validator::matches("password");
        assert!(v.checks_blank());
        assert!(!Validator::min_length(3).checks_blank());

        let filled: FormValues = [("password", "abc123")].into_iter().collect();
        assert_eq!(
            v.check("Confirm", &"".into(), &filled, always),
            Err(PASSWORDS_DO_NOT_MATCH.to_string())
        );
        let empty: FormValues = [("password", "")].into_iter().collect();
        assert!(v.check("Confirm", &"".into(), &empty, always).is_ok());
    }

    #[test]
    fn not_before_compares_dates() {
        let v = Validator::not_before("from", "End date must be after start date");
        let values: FormValues = [("from", "2024-03-10")].into_iter().collect();
        assert!(v.check("To", &"2024-03-09".into(), &values, always).is_err());
        assert!(v.check("To", &"2024-03-10".into(), &values, always).is_ok());
    }
}
