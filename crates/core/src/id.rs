//! Strongly-typed identifiers.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Identifier of a user as issued by the backend.
///
/// The REST API hands out ids either as strings or as integers; both are
/// normalized to their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("UserId: empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawUserId::deserialize(deserializer)? {
            RawUserId::Text(s) => Self::new(s).map_err(serde::de::Error::custom),
            RawUserId::Number(n) => Ok(Self::from(n)),
        }
    }
}
