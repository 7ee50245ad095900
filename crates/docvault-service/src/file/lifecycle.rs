//! Soft delete and activation toggles.
//!
//! Both are metadata-only: stored objects are kept for recovery and audit.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use docvault_core::types::FileId;
use docvault_database::MetadataRepository;
use docvault_entity::audit::AuditAction;
use docvault_entity::file::FileRecord;

use crate::audit::AuditLogger;
use crate::context::RequestContext;
use crate::error::IngestError;

/// Mutates the lifecycle flags of file records.
#[derive(Debug, Clone)]
pub struct LifecycleService {
    repo: Arc<dyn MetadataRepository>,
    audit: AuditLogger,
}

impl LifecycleService {
    /// Creates a new lifecycle service.
    pub fn new(repo: Arc<dyn MetadataRepository>, audit: AuditLogger) -> Self {
        Self { repo, audit }
    }

    /// Soft-delete a file.
    ///
    /// Deleting an already-deleted record is a no-op that succeeds; the
    /// original deletion stamp is kept and no second DELETE entry is
    /// appended.
    pub async fn soft_delete(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<(), IngestError> {
        let deleted = self
            .repo
            .soft_delete(file_id, ctx.actor_id, Utc::now())
            .await
            .map_err(IngestError::Persistence)?;

        match deleted {
            Some(record) => {
                self.audit
                    .record(
                        ctx,
                        file_id,
                        AuditAction::Delete,
                        Some(format!("Deleted {}", record.original_filename)),
                    )
                    .await;
                info!(%file_id, actor_id = ctx.actor_id, "File soft-deleted");
                Ok(())
            }
            None => match self.find(file_id).await? {
                Some(_) => Ok(()),
                None => Err(IngestError::not_found(format!("File {file_id} not found"))),
            },
        }
    }

    /// Set the active flag of an undeleted file. The deletion flag is untouched.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        is_active: bool,
    ) -> Result<FileRecord, IngestError> {
        let updated = self
            .repo
            .set_active(file_id, is_active, Utc::now())
            .await
            .map_err(IngestError::Persistence)?;

        let Some(record) = updated else {
            let reason = match self.find(file_id).await? {
                Some(_) => format!("File {file_id} has been deleted"),
                None => format!("File {file_id} not found"),
            };
            return Err(IngestError::not_found(reason));
        };

        self.audit
            .record(ctx, file_id, AuditAction::for_activation(is_active), None)
            .await;
        info!(%file_id, actor_id = ctx.actor_id, is_active, "File activation changed");

        Ok(record)
    }

    async fn find(&self, file_id: FileId) -> Result<Option<FileRecord>, IngestError> {
        self.repo
            .find_file(file_id)
            .await
            .map_err(IngestError::Persistence)
    }
}
