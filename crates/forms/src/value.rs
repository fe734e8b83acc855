//! Field values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Current value of one field.
///
/// Checkboxes hold flags; every other kind (including file fields, which hold
/// the stored path once uploaded) holds text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, Self::Flag(true))
    }

    /// Unchecked flags and whitespace-only text count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Flag(b) => !b,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Flag(b) => serde_json::Value::Bool(*b),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Snapshot of every field's value, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Text of a field, or `""` for missing and flag fields.
    pub fn text(&self, field: &str) -> &str {
        self.get(field).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn flag(&self, field: &str) -> bool {
        self.get(field).is_some_and(FieldValue::as_flag)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(field.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
