use core::str::FromStr;

use serde::{Deserialize, Serialize};

use lms_core::DomainError;

/// Role of an authenticated user.
///
/// The backend is inconsistent about casing and separators (`"SuperAdmin"`,
/// `"super_admin"`, `"superadmin"`), so parsing ignores both. Once parsed,
/// role comparisons are exact.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Admin,
    SuperAdmin,
    Trainer,
    Candidate,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::SuperAdmin, Role::Trainer, Role::Candidate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
            Role::Trainer => "trainer",
            Role::Candidate => "candidate",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            "trainer" => Ok(Role::Trainer),
            "candidate" => Ok(Role::Candidate),
            _ => Err(DomainError::validation(format!("unknown role '{s}'"))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_any_casing_and_separator() {
        for raw in ["SuperAdmin", "super_admin", "SUPER-ADMIN", "superadmin", "Super Admin"] {
            assert_eq!(raw.parse::<Role>().unwrap(), Role::SuperAdmin, "{raw}");
        }
        assert_eq!("TRAINER".parse::<Role>().unwrap(), Role::Trainer);
        assert_eq!("Candidate".parse::<Role>().unwrap(), Role::Candidate);
    }

    #[test]
    fn rejects_unknown_role() {
        let err = "moderator".parse::<Role>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: Role = serde_json::from_str("\"SuperAdmin\"").unwrap();
        assert_eq!(back, Role::SuperAdmin);
    }
}
