/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role held by a profile. Decides which route groups a caller may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
    Principal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
            Role::Admin => "admin",
            Role::Principal => "principal",
        }
    }
}

/// Role sets used by route gates
pub mod roles {
    use super::Role;

    pub const ADMIN: &[Role] = &[Role::Admin];
    pub const STUDENT: &[Role] = &[Role::Student];
    pub const STAFF: &[Role] = &[Role::Faculty, Role::Admin, Role::Principal];
}

/// Faculty approval lifecycle: `pending -> approved | rejected`.
/// Non-faculty profiles are stored as `approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

/// Who a notice is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeAudience {
    All,
    Students,
    Faculty,
}

impl NoticeAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeAudience::All => "all",
            NoticeAudience::Students => "students",
            NoticeAudience::Faculty => "faculty",
        }
    }

    /// Audience values visible to a caller holding `role`
    pub fn visible_to(role: Role) -> &'static [&'static str] {
        match role {
            Role::Student => &["all", "students"],
            Role::Faculty => &["all", "faculty"],
            Role::Admin | Role::Principal => &["all", "students", "faculty"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            "admin" => Ok(Role::Admin),
            "principal" => Ok(Role::Principal),
            other => Err(ParseEnumError { kind: "role", value: other.to_string() }),
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(ParseEnumError { kind: "approval status", value: other.to_string() }),
        }
    }
}

impl FromStr for NoticeAudience {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(NoticeAudience::All),
            "students" => Ok(NoticeAudience::Students),
            "faculty" => Ok(NoticeAudience::Faculty),
            other => Err(ParseEnumError { kind: "notice audience", value: other.to_string() }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_and_displays() {
        for role in [Role::Student, Role::Faculty, Role::Admin, Role::Principal] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Principal).unwrap(), "principal");
        let role: Role = serde_json::from_value(serde_json::json!("faculty")).unwrap();
        assert_eq!(role, Role::Faculty);
    }

    #[test]
    fn students_do_not_see_faculty_notices() {
        let visible = NoticeAudience::visible_to(Role::Student);
        assert!(visible.contains(&"students"));
        assert!(!visible.contains(&"faculty"));
    }
}
