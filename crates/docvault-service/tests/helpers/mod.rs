//! Shared fixtures for pipeline tests: seeded in-memory stores wrapped in
//! fault-injecting doubles.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use docvault_auth::{PermissionChecker, UploadPermissionChecker};
use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::ObjectStore;
use docvault_core::types::FileId;
use docvault_database::{MemoryStore, MetadataRepository, ReferenceRepository};
use docvault_entity::audit::{AuditEntry, NewAuditEntry};
use docvault_entity::classification::{Category, Department, Employee, Tab};
use docvault_entity::file::FileRecord;
use docvault_service::IngestionPipeline;
use docvault_service::file::{UploadFile, UploadRequest};
use docvault_storage::providers::memory::MemoryObjectStore;

pub const TAB: i32 = 1;
pub const OTHER_TAB: i32 = 2;
pub const CATEGORY: i32 = 5;
pub const FOREIGN_CATEGORY: i32 = 6;
pub const INACTIVE_CATEGORY: i32 = 7;
pub const DEPARTMENT: i32 = 3;
pub const ACTOR: i32 = 42;
pub const INACTIVE_ACTOR: i32 = 43;

/// Object store that can be told to fail puts or deletes.
#[derive(Debug, Default)]
pub struct FaultyObjectStore {
    pub inner: MemoryObjectStore,
    pub fail_put: AtomicBool,
    pub fail_delete: AtomicBool,
}

#[async_trait]
impl ObjectStore for FaultyObjectStore {
    fn provider_type(&self) -> &str {
        "faulty-memory"
    }

    fn locator(&self, bucket: &str, key: &str) -> String {
        self.inner.locator(bucket, key)
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn put(&self, bucket: &str, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(AppError::storage("injected put failure"));
        }
        self.inner.put(bucket, key, data, content_type).await
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        self.inner.get(bucket, key).await
    }

    async fn delete(&self, bucket: &str, key: &str) -> AppResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(AppError::storage("injected delete failure"));
        }
        self.inner.delete(bucket, key).await
    }

    async fn bucket_exists(&self, bucket: &str) -> AppResult<bool> {
        self.inner.bucket_exists(bucket).await
    }

    async fn ensure_bucket(&self, bucket: &str) -> AppResult<()> {
        self.inner.ensure_bucket(bucket).await
    }
}

/// Metadata repository that can be told to fail inserts or audit appends,
/// or to lose the race for the current version.
#[derive(Debug)]
pub struct FaultyMetadata {
    pub inner: Arc<MemoryStore>,
    pub fail_insert: AtomicBool,
    pub fail_audit: AtomicBool,
    pub retire_before_version: AtomicBool,
}

impl FaultyMetadata {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_insert: AtomicBool::new(false),
            fail_audit: AtomicBool::new(false),
            retire_before_version: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl MetadataRepository for FaultyMetadata {
    async fn find_file(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        self.inner.find_file(id).await
    }

    async fn insert_file(&self, record: &FileRecord) -> AppResult<FileRecord> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::database("injected insert failure"));
        }
        self.inner.insert_file(record).await
    }

    async fn insert_version(
        &self,
        previous_id: FileId,
        record: &FileRecord,
    ) -> AppResult<FileRecord> {
        if self.fail_insert.load(Ordering::SeqCst) {
            return Err(AppError::database("injected insert failure"));
        }
        if self.retire_before_version.load(Ordering::SeqCst) {
            // A concurrent writer deletes the previous version after it was loaded.
            self.inner
                .soft_delete(previous_id, INACTIVE_ACTOR, Utc::now())
                .await?;
        }
        self.inner.insert_version(previous_id, record).await
    }

    async fn increment_download_count(
        &self,
        id: FileId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        self.inner.increment_download_count(id, at).await
    }

    async fn soft_delete(
        &self,
        id: FileId,
        deleted_by: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        self.inner.soft_delete(id, deleted_by, at).await
    }

    async fn set_active(
        &self,
        id: FileId,
        is_active: bool,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        self.inner.set_active(id, is_active, at).await
    }

    async fn append_audit(&self, entry: &NewAuditEntry) -> AppResult<AuditEntry> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(AppError::database("injected audit failure"));
        }
        self.inner.append_audit(entry).await
    }

    async fn audit_for_file(&self, file_id: FileId) -> AppResult<Vec<AuditEntry>> {
        self.inner.audit_for_file(file_id).await
    }
}

/// Upload gate that refuses everyone.
#[derive(Debug)]
pub struct DenyAll;

#[async_trait]
impl PermissionChecker for DenyAll {
    async fn can_upload(&self, _actor_id: i32, _tab_id: i32, _category_id: i32) -> AppResult<bool> {
        Ok(false)
    }
}

/// A pipeline over seeded in-memory stores, with handles on every double.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub metadata: Arc<FaultyMetadata>,
    pub objects: Arc<FaultyObjectStore>,
    pub pipeline: IngestionPipeline,
}

impl Harness {
    /// Seeded harness with the standard upload gate.
    pub async fn new() -> Self {
        let store = seeded_store().await;
        let checker = Arc::new(UploadPermissionChecker::new(
            Arc::clone(&store) as Arc<dyn ReferenceRepository>
        ));
        Self::build(store, checker)
    }

    /// Seeded harness with a custom upload gate.
    pub async fn with_checker(checker: Arc<dyn PermissionChecker>) -> Self {
        Self::build(seeded_store().await, checker)
    }

    fn build(store: Arc<MemoryStore>, checker: Arc<dyn PermissionChecker>) -> Self {
        let metadata = Arc::new(FaultyMetadata::new(Arc::clone(&store)));
        let objects = Arc::new(FaultyObjectStore::default());
        let pipeline = IngestionPipeline::with_checker(
            &AppConfig::default(),
            Arc::clone(&metadata) as Arc<dyn MetadataRepository>,
            Arc::clone(&store) as Arc<dyn ReferenceRepository>,
            Arc::clone(&objects) as Arc<dyn ObjectStore>,
            checker,
        );
        Self {
            store,
            metadata,
            objects,
            pipeline,
        }
    }

    pub fn fail_put(&self) {
        self.objects.fail_put.store(true, Ordering::SeqCst);
    }

    pub fn fail_delete(&self) {
        self.objects.fail_delete.store(true, Ordering::SeqCst);
    }

    pub fn fail_insert(&self) {
        self.metadata.fail_insert.store(true, Ordering::SeqCst);
    }

    pub fn retire_before_version(&self) {
        self.metadata
            .retire_before_version
            .store(true, Ordering::SeqCst);
    }

    pub fn fail_audit(&self, fail: bool) {
        self.metadata.fail_audit.store(fail, Ordering::SeqCst);
    }
}

/// The "report.PDF" request: 1024 bytes into tab 1 / category 5 by employee 42.
pub fn report_request() -> UploadRequest {
    request("report.PDF", "application/pdf", vec![b'%'; 1024])
}

pub fn request(filename: &str, content_type: &str, data: Vec<u8>) -> UploadRequest {
    UploadRequest {
        tab_id: TAB,
        category_id: CATEGORY,
        department_id: DEPARTMENT,
        uploader_id: ACTOR,
        description: Some("Quarterly report".to_string()),
        file: UploadFile::new(filename, content_type, Bytes::from(data)),
    }
}

async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    store.put_tab(tab(TAB, "Engineering", true)).await;
    store.put_tab(tab(OTHER_TAB, "Finance", true)).await;

    store
        .put_category(category(CATEGORY, TAB, "Drawings", true))
        .await;
    store
        .put_category(category(FOREIGN_CATEGORY, OTHER_TAB, "Invoices", true))
        .await;
    store
        .put_category(category(INACTIVE_CATEGORY, TAB, "Archive", false))
        .await;

    store
        .put_department(Department {
            department_id: DEPARTMENT,
            department_code: "ENG".to_string(),
            department_name: "Engineering Department".to_string(),
            is_active: true,
        })
        .await;

    store.put_employee(employee(ACTOR, "Nguyen Van A", true)).await;
    store
        .put_employee(employee(INACTIVE_ACTOR, "Tran Thi B", false))
        .await;

    store
}

fn tab(tab_id: i32, name: &str, is_active: bool) -> Tab {
    Tab {
        tab_id,
        tab_code: format!("T{tab_id}"),
        tab_name: name.to_string(),
        is_active,
    }
}

fn category(category_id: i32, tab_id: i32, name: &str, is_active: bool) -> Category {
    Category {
        category_id,
        tab_id,
        category_code: format!("C{category_id}"),
        category_name: name.to_string(),
        is_active,
    }
}

fn employee(employee_id: i32, name: &str, is_active: bool) -> Employee {
    Employee {
        employee_id,
        employee_code: format!("E{employee_id}"),
        full_name: name.to_string(),
        email: format!("e{employee_id}@example.com"),
        position: "Engineer".to_string(),
        department_id: DEPARTMENT,
        is_active,
    }
}
