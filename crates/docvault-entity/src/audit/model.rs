//! Audit trail entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{AuditEntryId, FileId};

use super::action::AuditAction;

/// An immutable record of an action performed on a file.
///
/// Entries are ordered by `action_date`, with `sequence` (assigned by the
/// store in insertion order) breaking ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AuditEntry {
    /// Unique audit entry identifier.
    pub id: AuditEntryId,
    /// Store-assigned insertion sequence.
    pub sequence: i64,
    /// The file the action was performed on.
    pub file_id: FileId,
    /// The action performed.
    pub action: AuditAction,
    /// Employee who performed the action.
    pub performed_by: i32,
    /// When the action happened.
    pub action_date: DateTime<Utc>,
    /// Origin network address, if known.
    pub ip_address: Option<String>,
    /// Client descriptor (User-Agent), if known.
    pub user_agent: Option<String>,
    /// Optional free-text note.
    pub notes: Option<String>,
}

/// Data required to append an audit entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    /// The file the action was performed on.
    pub file_id: FileId,
    /// The action performed.
    pub action: AuditAction,
    /// Employee who performed the action.
    pub performed_by: i32,
    /// When the action happened.
    pub action_date: DateTime<Utc>,
    /// Origin network address.
    pub ip_address: Option<String>,
    /// Client descriptor.
    pub user_agent: Option<String>,
    /// Free-text note.
    pub notes: Option<String>,
}
