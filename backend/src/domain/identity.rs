//! Identity primitives supplied by the external identity layer.
//!
//! The portal never authenticates anyone. It receives an opaque identity
//! reference plus a set of role names, and signals back when a role grant is
//! required after a profile is created.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum accepted length of an identity reference.
pub const IDENTITY_REF_MAX: usize = 450;

/// Validation errors for [`IdentityRef`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityRefError {
    /// The reference was blank.
    #[error("identity reference must not be empty")]
    Empty,
    /// The reference exceeded [`IDENTITY_REF_MAX`] characters.
    #[error("identity reference must be at most {max} characters")]
    TooLong { max: usize },
}

/// Opaque, unique reference to an identity owned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String)]
pub struct IdentityRef(String);

impl IdentityRef {
    /// Validate and wrap an identity reference.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentityRefError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(IdentityRefError::Empty);
        }
        if raw.chars().count() > IDENTITY_REF_MAX {
            return Err(IdentityRefError::TooLong {
                max: IDENTITY_REF_MAX,
            });
        }
        Ok(Self(raw))
    }

    /// Borrow the raw reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IdentityRef {
    type Error = IdentityRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdentityRef> for String {
    fn from(value: IdentityRef) -> Self {
        value.0
    }
}

impl fmt::Display for IdentityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Roles recognised by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Manages the catalogue and reads statistics.
    Admin,
    /// Holds a profile and enrolls in courses.
    Student,
}

impl Role {
    /// Canonical role name as issued by the identity layer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Student => "Student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Student" => Ok(Self::Student),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Post-write hook the identity layer must apply to the caller's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RoleGrant {
    /// Add the [`Role::Student`] role and refresh the session.
    Student,
}

impl RoleGrant {
    /// Role the grant adds.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Student => Role::Student,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdentityRefError::Empty)]
    #[case("   ", IdentityRefError::Empty)]
    fn rejects_blank_references(#[case] raw: &str, #[case] expected: IdentityRefError) {
        assert_eq!(IdentityRef::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_references() {
        let raw = "x".repeat(IDENTITY_REF_MAX + 1);
        assert_eq!(
            IdentityRef::new(raw),
            Err(IdentityRefError::TooLong {
                max: IDENTITY_REF_MAX
            })
        );
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Student)]
    fn role_names_parse_back(#[case] role: Role) {
        assert_eq!(role.as_str().parse::<Role>(), Ok(role));
    }

    #[rstest]
    fn role_names_are_case_sensitive() {
        assert!("admin".parse::<Role>().is_err());
    }
}
