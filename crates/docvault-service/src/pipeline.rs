//! The ingestion pipeline facade.
//!
//! Wires the validator, upload gate, name allocator, object store,
//! metadata repository and audit logger into the individual services and
//! exposes every pipeline operation from one place.

use std::sync::Arc;

use docvault_auth::{PermissionChecker, PermissionLister, PermissionSummary, UploadPermissionChecker};
use docvault_core::config::AppConfig;
use docvault_core::error::ErrorKind;
use docvault_core::traits::ObjectStore;
use docvault_core::types::FileId;
use docvault_database::{MetadataRepository, ReferenceRepository};
use docvault_entity::audit::AuditEntry;
use docvault_entity::file::FileRecord;
use docvault_storage::NameAllocator;

use bytes::Bytes;

use crate::audit::AuditLogger;
use crate::context::RequestContext;
use crate::error::IngestError;
use crate::file::{
    BatchClassification, BatchUploadResult, DownloadHandle, DownloadService, FileDetails,
    FileService, FileValidator, LifecycleService, ReferenceResolver, UploadFile, UploadRequest,
    UploadService,
};

/// Entry point for every file operation.
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    upload: UploadService,
    download: DownloadService,
    lifecycle: LifecycleService,
    files: FileService,
    permissions: PermissionLister,
}

impl IngestionPipeline {
    /// Build the pipeline with the standard upload gate.
    pub fn new(
        config: &AppConfig,
        metadata: Arc<dyn MetadataRepository>,
        reference: Arc<dyn ReferenceRepository>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let checker = Arc::new(UploadPermissionChecker::new(Arc::clone(&reference)));
        Self::with_checker(config, metadata, reference, store, checker)
    }

    /// Build the pipeline with a caller-supplied upload gate.
    pub fn with_checker(
        config: &AppConfig,
        metadata: Arc<dyn MetadataRepository>,
        reference: Arc<dyn ReferenceRepository>,
        store: Arc<dyn ObjectStore>,
        checker: Arc<dyn PermissionChecker>,
    ) -> Self {
        let audit = AuditLogger::new(Arc::clone(&metadata));
        let resolver = ReferenceResolver::new(Arc::clone(&reference));

        let upload = UploadService::new(
            FileValidator::from_config(&config.upload),
            checker,
            resolver.clone(),
            NameAllocator::new(config.storage.bucket_prefix.clone()),
            Arc::clone(&store),
            Arc::clone(&metadata),
            audit.clone(),
        );
        let download = DownloadService::from_config(
            Arc::clone(&metadata),
            store,
            audit.clone(),
            &config.upload,
        );
        let lifecycle = LifecycleService::new(Arc::clone(&metadata), audit.clone());
        let files = FileService::new(Arc::clone(&metadata), resolver, audit);
        let permissions = PermissionLister::new(reference, metadata);

        Self {
            upload,
            download,
            lifecycle,
            files,
            permissions,
        }
    }

    /// Upload a new file.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        request: UploadRequest,
    ) -> Result<FileDetails, IngestError> {
        self.upload.upload(ctx, request).await
    }

    /// Upload a new version of an existing file.
    pub async fn upload_version(
        &self,
        ctx: &RequestContext,
        previous_id: FileId,
        request: UploadRequest,
    ) -> Result<FileDetails, IngestError> {
        self.upload.upload_version(ctx, previous_id, request).await
    }

    /// Upload several files under one classification.
    pub async fn upload_batch(
        &self,
        ctx: &RequestContext,
        classification: &BatchClassification,
        files: Vec<UploadFile>,
    ) -> BatchUploadResult {
        self.upload.upload_batch(ctx, classification, files).await
    }

    /// Count a download and return a retrieval handle.
    pub async fn record_download(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<DownloadHandle, IngestError> {
        self.download.record_download(ctx, file_id).await
    }

    /// Read the content behind a download handle.
    pub async fn fetch_content(&self, handle: &DownloadHandle) -> Result<Bytes, IngestError> {
        self.download.fetch_content(handle).await
    }

    /// Soft-delete a file.
    pub async fn soft_delete(&self, ctx: &RequestContext, file_id: FileId) -> Result<(), IngestError> {
        self.lifecycle.soft_delete(ctx, file_id).await
    }

    /// Activate or deactivate a file.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        is_active: bool,
    ) -> Result<FileRecord, IngestError> {
        self.lifecycle.set_active(ctx, file_id, is_active).await
    }

    /// File details with resolved names.
    pub async fn get_file(&self, file_id: FileId) -> Result<FileDetails, IngestError> {
        self.files.get_file(file_id).await
    }

    /// Audit history of a file.
    pub async fn file_history(&self, file_id: FileId) -> Result<Vec<AuditEntry>, IngestError> {
        self.files.file_history(file_id).await
    }

    /// Read-only permission summary of an employee.
    pub async fn list_permissions(
        &self,
        employee_id: i32,
    ) -> Result<PermissionSummary, IngestError> {
        self.permissions
            .list_permissions(employee_id)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => IngestError::not_found(e.message),
                _ => IngestError::Persistence(e),
            })
    }
}
