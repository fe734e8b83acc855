//! Visibility predicates.
//!
//! Conditions are data rather than closures so that the schema builder can
//! see which fields they read and reject unknown names before any screen runs.

use crate::value::{FieldValue, FormValues};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals { field: String, value: FieldValue },
    NotEquals { field: String, value: FieldValue },
    OneOf { field: String, values: Vec<String> },
    /// Checked flag, or non-blank text.
    IsSet(String),
    Any(Vec<Condition>),
    All(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::NotEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn one_of<S: Into<String>>(field: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Self::OneOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_set(field: impl Into<String>) -> Self {
        Self::IsSet(field.into())
    }

    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    pub fn negate(condition: Condition) -> Self {
        Self::Not(Box::new(condition))
    }

    pub fn evaluate(&self, values: &FormValues) -> bool {
        match self {
            Self::Equals { field, value } => values.get(field) == Some(value),
            Self::NotEquals { field, value } => values.get(field) != Some(value),
            Self::OneOf { field, values: options } => {
                let current = values.text(field);
                options.iter().any(|o| o == current)
            }
            Self::IsSet(field) => values.get(field).is_some_and(|v| !v.is_blank()),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(values)),
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(values)),
            Self::Not(inner) => !inner.evaluate(values),
        }
    }

    /// Every field name this condition reads.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Equals { field, .. }
            | Self::NotEquals { field, .. }
            | Self::OneOf { field, .. }
            | Self::IsSet(field) => out.push(field.as_str()),
            Self::Any(conditions) | Self::All(conditions) => {
                for c in conditions {
                    c.collect_fields(out);
                }
            }
            Self::Not(inner) => inner.collect_fields(out),
        }
    }
}
