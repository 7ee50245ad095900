//! Audit trail repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{AuditEntryId, FileId};
use docvault_entity::audit::{AuditEntry, NewAuditEntry};

/// Append-only repository for audit entries.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    /// Create a new audit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry. `sequence` is assigned by the database.
    pub async fn create(&self, data: &NewAuditEntry) -> AppResult<AuditEntry> {
        sqlx::query_as::<_, AuditEntry>(
            "INSERT INTO file_audit_log (id, file_id, action, performed_by, action_date, \
             ip_address, user_agent, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(AuditEntryId::new())
        .bind(data.file_id)
        .bind(data.action)
        .bind(data.performed_by)
        .bind(data.action_date)
        .bind(&data.ip_address)
        .bind(&data.user_agent)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create audit entry", e)
        })
    }

    /// Entries for a file in timestamp order, insertion order breaking ties.
    pub async fn find_by_file(&self, file_id: FileId) -> AppResult<Vec<AuditEntry>> {
        sqlx::query_as::<_, AuditEntry>(
            "SELECT * FROM file_audit_log WHERE file_id = $1 \
             ORDER BY action_date ASC, sequence ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list audit entries", e)
        })
    }
}
