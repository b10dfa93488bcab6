//! Signed-in user and what they may do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tabula::ModalKind;
use thiserror::Error;

/// Access level of a portal user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Role {
    /// Read-only visitor.
    #[default]
    Public,
    /// Can create and edit records.
    Staff,
    /// Full access, deletion included.
    Admin,
}

impl Role {
    /// Whether this role may perform a CRUD action.
    pub fn allows(&self, action: ModalKind) -> bool {
        match (self, action) {
            (Role::Admin, _) => true,
            (Role::Staff, ModalKind::Create | ModalKind::Edit) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Public => "public",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}' (expected public, staff or admin)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Role::Public),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// The user driving the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub role: Role,
}

impl Session {
    pub fn new(user: impl Into<String>, role: Role) -> Self {
        Self {
            user: user.into(),
            role,
        }
    }

    pub fn can(&self, action: ModalKind) -> bool {
        self.role.allows(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_per_role() {
        let all = [ModalKind::Create, ModalKind::Edit, ModalKind::Delete];

        assert!(all.iter().all(|&a| !Role::Public.allows(a)));
        assert!(Role::Staff.allows(ModalKind::Create));
        assert!(Role::Staff.allows(ModalKind::Edit));
        assert!(!Role::Staff.allows(ModalKind::Delete));
        assert!(all.iter().all(|&a| Role::Admin.allows(a)));
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(" Admin ".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("staff".parse::<Role>(), Ok(Role::Staff));
        assert_eq!(
            "dean".parse::<Role>(),
            Err(UnknownRole("dean".to_string()))
        );
        assert_eq!(Role::Public.to_string(), "public");
    }
}
