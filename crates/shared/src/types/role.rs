//! User roles for the inventory role policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role within the inventory system.
///
/// Roles gate what operations a user may submit:
/// - `Admin` and `Logistician` may submit any operation and manage
///   reference data (facilities, chemicals).
/// - `Engineer` may only submit consume operations, and only from the
///   facility they are assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user management.
    Admin,
    /// Field engineer tied to a single facility.
    Engineer,
    /// Warehouse logistician.
    Logistician,
}

impl Role {
    /// Returns true if the role may write reference data (facilities, chemicals).
    #[must_use]
    pub fn can_manage_reference_data(&self) -> bool {
        matches!(self, Self::Admin | Self::Logistician)
    }

    /// Returns the lowercase wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Engineer => "engineer",
            Self::Logistician => "logistician",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "engineer" => Ok(Self::Engineer),
            "logistician" => Ok(Self::Logistician),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Engineer, Role::Logistician] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_reference_data_policy() {
        assert!(Role::Admin.can_manage_reference_data());
        assert!(Role::Logistician.can_manage_reference_data());
        assert!(!Role::Engineer.can_manage_reference_data());
    }
}
