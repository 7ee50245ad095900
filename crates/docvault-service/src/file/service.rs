//! Read-only file queries.

use std::sync::Arc;

use docvault_core::types::FileId;
use docvault_database::MetadataRepository;
use docvault_entity::audit::AuditEntry;
use docvault_entity::file::FileRecord;

use crate::audit::AuditLogger;
use crate::error::IngestError;
use crate::file::resolve::ReferenceResolver;
use crate::file::types::FileDetails;

/// Looks up file details and history.
#[derive(Debug, Clone)]
pub struct FileService {
    repo: Arc<dyn MetadataRepository>,
    resolver: ReferenceResolver,
    audit: AuditLogger,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        repo: Arc<dyn MetadataRepository>,
        resolver: ReferenceResolver,
        audit: AuditLogger,
    ) -> Self {
        Self {
            repo,
            resolver,
            audit,
        }
    }

    /// The undeleted record with its resolved display names.
    pub async fn get_file(&self, file_id: FileId) -> Result<FileDetails, IngestError> {
        let record = self
            .find(file_id)
            .await?
            .filter(|f| !f.is_deleted)
            .ok_or_else(|| IngestError::not_found(format!("File {file_id} not found")))?;

        let names = self
            .resolver
            .names_for(&record)
            .await
            .map_err(IngestError::Persistence)?;

        Ok(FileDetails::new(record, names))
    }

    /// Audit entries of a known file, deleted or not.
    pub async fn file_history(&self, file_id: FileId) -> Result<Vec<AuditEntry>, IngestError> {
        if self.find(file_id).await?.is_none() {
            return Err(IngestError::not_found(format!("File {file_id} not found")));
        }
        self.audit
            .history(file_id)
            .await
            .map_err(IngestError::Persistence)
    }

    async fn find(&self, file_id: FileId) -> Result<Option<FileRecord>, IngestError> {
        self.repo
            .find_file(file_id)
            .await
            .map_err(IngestError::Persistence)
    }
}
