//! PostgreSQL-backed implementations of the repository contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use docvault_core::result::AppResult;
use docvault_core::types::FileId;
use docvault_entity::audit::{AuditEntry, NewAuditEntry};
use docvault_entity::classification::{Category, Department, Employee, Tab};
use docvault_entity::file::FileRecord;
use docvault_entity::permission::PermissionGrant;

use crate::connection::DatabasePool;
use crate::repositories::{
    AuditRepository, FileRepository, PermissionGrantRepository, ReferenceDataRepository,
};
use crate::traits::{MetadataRepository, ReferenceRepository};

/// File record and audit storage over PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgMetadataRepository {
    files: FileRepository,
    audit: AuditRepository,
}

impl PgMetadataRepository {
    /// Build the repository from a connected pool.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            files: FileRepository::new(db.pool().clone()),
            audit: AuditRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl MetadataRepository for PgMetadataRepository {
    async fn find_file(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        self.files.find_by_id(id).await
    }

    async fn insert_file(&self, record: &FileRecord) -> AppResult<FileRecord> {
        self.files.create(record).await
    }

    async fn insert_version(
        &self,
        previous_id: FileId,
        record: &FileRecord,
    ) -> AppResult<FileRecord> {
        self.files.create_version(previous_id, record).await
    }

    async fn increment_download_count(
        &self,
        id: FileId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        self.files.increment_download_count(id, at).await
    }

    async fn soft_delete(
        &self,
        id: FileId,
        deleted_by: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        self.files.soft_delete(id, deleted_by, at).await
    }

    async fn set_active(
        &self,
        id: FileId,
        is_active: bool,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        self.files.set_active(id, is_active, at).await
    }

    async fn append_audit(&self, entry: &NewAuditEntry) -> AppResult<AuditEntry> {
        self.audit.create(entry).await
    }

    async fn audit_for_file(&self, file_id: FileId) -> AppResult<Vec<AuditEntry>> {
        self.audit.find_by_file(file_id).await
    }
}

/// Reference data and permission grants over PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgReferenceRepository {
    reference: ReferenceDataRepository,
    grants: PermissionGrantRepository,
}

impl PgReferenceRepository {
    /// Build the repository from a connected pool.
    pub fn new(db: &DatabasePool) -> Self {
        Self {
            reference: ReferenceDataRepository::new(db.pool().clone()),
            grants: PermissionGrantRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl ReferenceRepository for PgReferenceRepository {
    async fn find_tab(&self, tab_id: i32) -> AppResult<Option<Tab>> {
        self.reference.find_tab(tab_id).await
    }

    async fn find_category(&self, category_id: i32) -> AppResult<Option<Category>> {
        self.reference.find_category(category_id).await
    }

    async fn find_department(&self, department_id: i32) -> AppResult<Option<Department>> {
        self.reference.find_department(department_id).await
    }

    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>> {
        self.reference.find_employee(employee_id).await
    }

    async fn department_grants(&self, department_id: i32) -> AppResult<Vec<PermissionGrant>> {
        self.grants.find_by_department(department_id).await
    }

    async fn employee_file_grants(&self, employee_id: i32) -> AppResult<Vec<PermissionGrant>> {
        self.grants.find_by_employee(employee_id).await
    }
}
