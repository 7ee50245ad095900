//! Audit action kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A file was uploaded.
    Upload,
    /// A download was recorded.
    Download,
    /// A file was soft-deleted.
    Delete,
    /// A file record was updated (e.g. superseded by a new version).
    Update,
    /// A file was viewed.
    View,
    /// A file was activated.
    Activate,
    /// A file was deactivated.
    Deactivate,
}

impl AuditAction {
    /// Return the action as its stored uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "UPLOAD",
            Self::Download => "DOWNLOAD",
            Self::Delete => "DELETE",
            Self::Update => "UPDATE",
            Self::View => "VIEW",
            Self::Activate => "ACTIVATE",
            Self::Deactivate => "DEACTIVATE",
        }
    }

    /// The action recorded when the active flag is set to `is_active`.
    pub fn for_activation(is_active: bool) -> Self {
        if is_active {
            Self::Activate
        } else {
            Self::Deactivate
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = docvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UPLOAD" => Ok(Self::Upload),
            "DOWNLOAD" => Ok(Self::Download),
            "DELETE" => Ok(Self::Delete),
            "UPDATE" => Ok(Self::Update),
            "VIEW" => Ok(Self::View),
            "ACTIVATE" => Ok(Self::Activate),
            "DEACTIVATE" => Ok(Self::Deactivate),
            _ => Err(docvault_core::AppError::validation(format!(
                "Invalid audit action: '{s}'"
            ))),
        }
    }
}
