//! Permission grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{FileId, PermissionGrantId};

use super::level::PermissionLevel;

/// A permission granted either to a department or to an employee on a file.
///
/// Grants are display data only; the upload gate does not consult them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PermissionGrant {
    /// Unique grant identifier.
    pub id: PermissionGrantId,
    /// File the grant applies to (per-file grants).
    pub file_id: Option<FileId>,
    /// Employee the grant applies to (per-file grants).
    pub employee_id: Option<i32>,
    /// Department the grant applies to (department grants).
    pub department_id: Option<i32>,
    /// Granted level.
    pub permission_type: PermissionLevel,
    /// Employee who granted the permission.
    pub granted_by: i32,
    /// When the permission was granted.
    pub granted_at: DateTime<Utc>,
    /// Whether the grant is in effect.
    pub is_active: bool,
}
