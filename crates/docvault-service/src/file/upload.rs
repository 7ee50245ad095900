//! Upload workflow: single, versioned and batch uploads.
//!
//! Steps, in order: validate, gate, resolve references, allocate a name,
//! write the object, insert the record, append the audit entry. Nothing
//! durable exists before the object write; if the record insert fails
//! afterwards, exactly one compensating delete is attempted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use docvault_auth::PermissionChecker;
use docvault_core::error::AppError;
use docvault_core::traits::ObjectStore;
use docvault_core::types::FileId;
use docvault_database::MetadataRepository;
use docvault_entity::audit::AuditAction;
use docvault_entity::file::FileRecord;
use docvault_storage::naming::{AllocatedName, NameAllocator, split_filename};

use crate::audit::AuditLogger;
use crate::context::RequestContext;
use crate::error::IngestError;
use crate::file::resolve::ReferenceResolver;
use crate::file::types::{
    BatchClassification, BatchItemResult, BatchUploadResult, FileDetails, UploadFile,
    UploadRequest,
};
use crate::file::validation::{FileValidator, file_extension};

/// Handles uploads of new files and new versions of existing files.
#[derive(Debug, Clone)]
pub struct UploadService {
    validator: FileValidator,
    permissions: Arc<dyn PermissionChecker>,
    resolver: ReferenceResolver,
    allocator: NameAllocator,
    store: Arc<dyn ObjectStore>,
    repo: Arc<dyn MetadataRepository>,
    audit: AuditLogger,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        validator: FileValidator,
        permissions: Arc<dyn PermissionChecker>,
        resolver: ReferenceResolver,
        allocator: NameAllocator,
        store: Arc<dyn ObjectStore>,
        repo: Arc<dyn MetadataRepository>,
        audit: AuditLogger,
    ) -> Self {
        Self {
            validator,
            permissions,
            resolver,
            allocator,
            store,
            repo,
            audit,
        }
    }

    /// Upload a new file. Identical requests are not deduplicated.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        request: UploadRequest,
    ) -> Result<FileDetails, IngestError> {
        self.ingest(ctx, request, None).await
    }

    /// Upload a new version of `previous_id`.
    ///
    /// The previous record must be the current, undeleted version of its
    /// chain, and the request must use the same tab and category.
    pub async fn upload_version(
        &self,
        ctx: &RequestContext,
        previous_id: FileId,
        request: UploadRequest,
    ) -> Result<FileDetails, IngestError> {
        self.ingest(ctx, request, Some(previous_id)).await
    }

    /// Upload several files under one classification.
    ///
    /// Each file is processed independently; one failure never aborts the
    /// others.
    pub async fn upload_batch(
        &self,
        ctx: &RequestContext,
        classification: &BatchClassification,
        files: Vec<UploadFile>,
    ) -> BatchUploadResult {
        let mut items = Vec::with_capacity(files.len());
        for file in files {
            let filename = file.filename.clone();
            let result = self.upload(ctx, classification.request_for(file)).await;
            if let Err(e) = &result {
                warn!(filename = %filename, error = %e, "Batch item failed");
            }
            items.push(BatchItemResult { filename, result });
        }

        let outcome = BatchUploadResult { items };
        info!(
            actor_id = ctx.actor_id,
            success = outcome.success_count(),
            errors = outcome.error_count(),
            "Batch upload completed"
        );
        outcome
    }

    async fn ingest(
        &self,
        ctx: &RequestContext,
        request: UploadRequest,
        previous_id: Option<FileId>,
    ) -> Result<FileDetails, IngestError> {
        let verdict = self.validator.validate(&request.file.payload());
        if !verdict.ok {
            let reasons = verdict.reasons();
            warn!(
                actor_id = ctx.actor_id,
                filename = %request.file.filename,
                reasons = %reasons.join("; "),
                "Upload rejected by validation"
            );
            return Err(IngestError::validation(reasons));
        }

        let allowed = self
            .permissions
            .can_upload(ctx.actor_id, request.tab_id, request.category_id)
            .await
            .map_err(IngestError::Persistence)?;
        if !allowed {
            return Err(IngestError::permission_denied(format!(
                "Employee {} may not upload to tab {} / category {}",
                ctx.actor_id, request.tab_id, request.category_id
            )));
        }

        let names = self.resolver.resolve_for_upload(&request).await?;

        let previous = match previous_id {
            Some(id) => Some(self.current_version(id, &request).await?),
            None => None,
        };

        let name = self
            .allocator
            .allocate(&request.file.filename, request.tab_id, request.category_id);

        self.store
            .ensure_bucket(&name.bucket)
            .await
            .map_err(IngestError::Storage)?;
        self.store
            .put(
                &name.bucket,
                &name.storage_key,
                request.file.data.clone(),
                &request.file.content_type,
            )
            .await
            .map_err(IngestError::Storage)?;

        let record = self.build_record(&request, &name, previous.as_ref());
        let inserted = match &previous {
            Some(prev) => self.repo.insert_version(prev.id, &record).await,
            None => self.repo.insert_file(&record).await,
        };
        let stored = match inserted {
            Ok(stored) => stored,
            Err(cause) => return Err(self.compensate(&name, cause).await),
        };

        self.audit
            .record(
                ctx,
                stored.id,
                AuditAction::Upload,
                Some(match &previous {
                    Some(prev) => format!("Version {} of {}", stored.version, prev.id),
                    None => "File uploaded".to_string(),
                }),
            )
            .await;
        if let Some(prev) = &previous {
            self.audit
                .record(
                    ctx,
                    prev.id,
                    AuditAction::Update,
                    Some(format!("Superseded by version {} ({})", stored.version, stored.id)),
                )
                .await;
        }

        info!(
            file_id = %stored.id,
            actor_id = ctx.actor_id,
            bucket = %stored.storage_bucket,
            key = %stored.storage_key,
            size = stored.file_size,
            version = stored.version,
            "File uploaded"
        );

        Ok(FileDetails::new(stored, names))
    }

    /// Load the record a new version will supersede.
    async fn current_version(
        &self,
        previous_id: FileId,
        request: &UploadRequest,
    ) -> Result<FileRecord, IngestError> {
        let previous = self
            .repo
            .find_file(previous_id)
            .await
            .map_err(IngestError::Persistence)?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| IngestError::not_found(format!("File {previous_id} not found")))?;

        if !previous.is_current_version {
            return Err(IngestError::not_found(format!(
                "File {previous_id} is not the current version"
            )));
        }
        if previous.tab_id != request.tab_id || previous.category_id != request.category_id {
            return Err(IngestError::reference(format!(
                "A new version must stay in tab {} / category {}",
                previous.tab_id, previous.category_id
            )));
        }
        Ok(previous)
    }

    fn build_record(
        &self,
        request: &UploadRequest,
        name: &AllocatedName,
        previous: Option<&FileRecord>,
    ) -> FileRecord {
        let now = Utc::now();
        let (base, _) = split_filename(&request.file.filename);
        let extension = file_extension(&request.file.filename);

        FileRecord {
            id: FileId::new(),
            tab_id: request.tab_id,
            category_id: request.category_id,
            department_id: request.department_id,
            file_name: base.to_string(),
            original_filename: request.file.filename.clone(),
            file_extension: format!(".{extension}"),
            file_size: request.file.data.len() as i64,
            mime_type: request.file.content_type.clone(),
            storage_bucket: name.bucket.clone(),
            storage_key: name.storage_key.clone(),
            storage_locator: self.store.locator(&name.bucket, &name.storage_key),
            uploaded_by: request.uploader_id,
            description: request.description.clone(),
            version: previous.map_or(1, |p| p.version + 1),
            is_current_version: true,
            parent_file_id: previous.map(|p| p.id),
            download_count: 0,
            is_active: true,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Single best-effort delete of an object whose metadata write failed.
    async fn compensate(&self, name: &AllocatedName, cause: AppError) -> IngestError {
        match self.store.delete(&name.bucket, &name.storage_key).await {
            Ok(()) => {
                warn!(
                    target: "docvault::audit",
                    bucket = %name.bucket,
                    key = %name.storage_key,
                    error = %cause,
                    "Metadata insert failed; orphaned object removed"
                );
                IngestError::Persistence(cause)
            }
            Err(compensation) => {
                error!(
                    target: "docvault::audit",
                    bucket = %name.bucket,
                    key = %name.storage_key,
                    error = %cause,
                    compensation_error = %compensation,
                    "Metadata insert failed and orphaned object could not be removed"
                );
                IngestError::PartialFailure {
                    bucket: name.bucket.clone(),
                    key: name.storage_key.clone(),
                    cause,
                    compensation,
                }
            }
        }
    }
}
