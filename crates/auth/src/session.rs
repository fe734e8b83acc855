//! Authenticated session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use lms_core::{DomainError, UserId};

use crate::{Permission, Role};

/// Opaque bearer token.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::validation("auth token must not be empty"));
        }
        Ok(Self(raw))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// Who is currently authenticated and what they may do.
///
/// A session is never edited in place. Login and logout replace it as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user_id: UserId,
    role: Role,
    #[serde(default)]
    permissions: BTreeSet<Permission>,
    auth_token: AuthToken,
}

impl Session {
    pub fn new(
        user_id: UserId,
        role: Role,
        permissions: impl IntoIterator<Item = Permission>,
        auth_token: AuthToken,
    ) -> Self {
        Self {
            user_id,
            role,
            permissions: permissions.into_iter().collect(),
            auth_token,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.as_str() == permission)
    }

    pub fn auth_token(&self) -> &AuthToken {
        &self.auth_token
    }
}
