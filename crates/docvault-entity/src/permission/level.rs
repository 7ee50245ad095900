//! Permission levels for file and department grants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission level of a grant. Ordered from least to most permissive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "permission_level", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
    /// Read access.
    Read,
    /// Read and write access.
    Write,
    /// Read, write and delete access.
    Delete,
    /// Full control.
    Full,
}

impl PermissionLevel {
    /// Numeric rank; higher means more permissive.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Read => 1,
            Self::Write => 2,
            Self::Delete => 3,
            Self::Full => 4,
        }
    }

    /// Return the level as its stored uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Delete => "DELETE",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = docvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            "DELETE" => Ok(Self::Delete),
            "FULL" => Ok(Self::Full),
            _ => Err(docvault_core::AppError::validation(format!(
                "Invalid permission level: '{s}'. Expected one of: READ, WRITE, DELETE, FULL"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_rank() {
        assert!(PermissionLevel::Full > PermissionLevel::Delete);
        assert!(PermissionLevel::Delete > PermissionLevel::Write);
        assert!(PermissionLevel::Write > PermissionLevel::Read);
        assert_eq!(
            [PermissionLevel::Write, PermissionLevel::Full, PermissionLevel::Read]
                .into_iter()
                .max(),
            Some(PermissionLevel::Full)
        );
    }
}
