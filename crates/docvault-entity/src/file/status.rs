//! Collapsed lifecycle state of a file record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state derived from the `is_active` / `is_deleted` flags.
///
/// The flags are stored independently, but `is_deleted` dominates: a
/// deleted record is never reported as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Visible and downloadable.
    Active,
    /// Hidden from listings but restorable via `set_active`.
    Inactive,
    /// Soft-deleted; retained for audit only.
    Deleted,
}

impl FileStatus {
    /// Derive the status from the stored flags.
    pub fn from_flags(is_active: bool, is_deleted: bool) -> Self {
        match (is_deleted, is_active) {
            (true, _) => Self::Deleted,
            (false, true) => Self::Active,
            (false, false) => Self::Inactive,
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_dominates_active_flag() {
        assert_eq!(FileStatus::from_flags(true, true), FileStatus::Deleted);
        assert_eq!(FileStatus::from_flags(false, true), FileStatus::Deleted);
        assert_eq!(FileStatus::from_flags(true, false), FileStatus::Active);
        assert_eq!(FileStatus::from_flags(false, false), FileStatus::Inactive);
    }
}
