//! Repository contracts consumed by the ingestion pipeline.
//!
//! Every operation that mutates a single [`FileRecord`] is expressed as a
//! conditional write: the existence/state check and the update happen as
//! one atomic step per id, so concurrent toggles and deletes on the same
//! file resolve deterministically.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use docvault_core::result::AppResult;
use docvault_core::types::FileId;
use docvault_entity::audit::{AuditEntry, NewAuditEntry};
use docvault_entity::classification::{Category, Department, Employee, Tab};
use docvault_entity::file::FileRecord;
use docvault_entity::permission::PermissionGrant;

/// Durable storage for file records and audit entries.
#[async_trait]
pub trait MetadataRepository: Send + Sync + Debug + 'static {
    /// Look up a file record by id, deleted or not.
    async fn find_file(&self, id: FileId) -> AppResult<Option<FileRecord>>;

    /// Insert a new file record. All-or-nothing.
    async fn insert_file(&self, record: &FileRecord) -> AppResult<FileRecord>;

    /// Insert `record` as the next version of `previous_id`.
    ///
    /// Clears `is_current_version` on the previous record and inserts the
    /// new one in a single atomic write. Fails with a conflict error, and
    /// writes nothing, when the previous record is no longer the current,
    /// undeleted version.
    async fn insert_version(
        &self,
        previous_id: FileId,
        record: &FileRecord,
    ) -> AppResult<FileRecord>;

    /// Increment the download counter of an undeleted, active record.
    ///
    /// Returns `None` when no such record matched.
    async fn increment_download_count(
        &self,
        id: FileId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>>;

    /// Soft-delete an undeleted record.
    ///
    /// Returns `None` when the record is missing or already deleted; the
    /// deletion stamp of an already-deleted record is never rewritten.
    async fn soft_delete(
        &self,
        id: FileId,
        deleted_by: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>>;

    /// Set the active flag of an undeleted record.
    ///
    /// Returns `None` when the record is missing or deleted.
    async fn set_active(
        &self,
        id: FileId,
        is_active: bool,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>>;

    /// Append an audit entry. Entries are never updated or removed.
    async fn append_audit(&self, entry: &NewAuditEntry) -> AppResult<AuditEntry>;

    /// All audit entries for a file, ordered by timestamp then insertion.
    async fn audit_for_file(&self, file_id: FileId) -> AppResult<Vec<AuditEntry>>;
}

/// Read-only access to classification, actor and permission reference data.
#[async_trait]
pub trait ReferenceRepository: Send + Sync + Debug + 'static {
    /// Look up a tab by id.
    async fn find_tab(&self, tab_id: i32) -> AppResult<Option<Tab>>;

    /// Look up a category by id.
    async fn find_category(&self, category_id: i32) -> AppResult<Option<Category>>;

    /// Look up a department by id.
    async fn find_department(&self, department_id: i32) -> AppResult<Option<Department>>;

    /// Look up an employee by id.
    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>>;

    /// Active grants attached to a department.
    async fn department_grants(&self, department_id: i32) -> AppResult<Vec<PermissionGrant>>;

    /// Active per-file grants held by an employee.
    async fn employee_file_grants(&self, employee_id: i32) -> AppResult<Vec<PermissionGrant>>;
}
