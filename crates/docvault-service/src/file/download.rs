//! Download accounting: counts a download and hands back a retrieval handle.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Duration, Utc};
use tracing::info;

use docvault_core::config::UploadConfig;
use docvault_core::traits::ObjectStore;
use docvault_core::types::FileId;
use docvault_database::MetadataRepository;
use docvault_entity::audit::AuditAction;

use crate::audit::AuditLogger;
use crate::context::RequestContext;
use crate::error::IngestError;
use crate::file::types::DownloadHandle;

/// Upper bound on a handle's lifetime (ten years).
const MAX_LINK_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Records downloads of live files.
#[derive(Debug, Clone)]
pub struct DownloadService {
    repo: Arc<dyn MetadataRepository>,
    store: Arc<dyn ObjectStore>,
    audit: AuditLogger,
    link_ttl: Duration,
}

impl DownloadService {
    /// Creates a new download service. Handles expire after `link_ttl_seconds`.
    pub fn new(
        repo: Arc<dyn MetadataRepository>,
        store: Arc<dyn ObjectStore>,
        audit: AuditLogger,
        link_ttl_seconds: u64,
    ) -> Self {
        let link_ttl = Duration::seconds(link_ttl_seconds.min(MAX_LINK_TTL_SECONDS) as i64);
        Self {
            repo,
            store,
            audit,
            link_ttl,
        }
    }

    /// Creates a download service using the `[upload]` section for the TTL.
    pub fn from_config(
        repo: Arc<dyn MetadataRepository>,
        store: Arc<dyn ObjectStore>,
        audit: AuditLogger,
        config: &UploadConfig,
    ) -> Self {
        Self::new(repo, store, audit, config.download_link_ttl_seconds)
    }

    /// Count a download of an undeleted, active file.
    ///
    /// The counter increment and the state check are one conditional
    /// write; the DOWNLOAD audit entry follows and never fails the call.
    pub async fn record_download(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<DownloadHandle, IngestError> {
        let now = Utc::now();
        let record = match self
            .repo
            .increment_download_count(file_id, now)
            .await
            .map_err(IngestError::Persistence)?
        {
            Some(record) => record,
            None => return Err(self.unavailable(file_id).await),
        };

        self.audit
            .record(ctx, file_id, AuditAction::Download, None)
            .await;

        info!(
            %file_id,
            actor_id = ctx.actor_id,
            download_count = record.download_count,
            "Download recorded"
        );

        Ok(DownloadHandle {
            file_id: record.id,
            bucket: record.storage_bucket,
            key: record.storage_key,
            locator: record.storage_locator,
            filename: record.original_filename,
            content_type: record.mime_type,
            size: record.file_size,
            expires_at: now + self.link_ttl,
        })
    }

    /// Read the bytes a handle points at.
    pub async fn fetch_content(&self, handle: &DownloadHandle) -> Result<Bytes, IngestError> {
        if handle.is_expired_at(Utc::now()) {
            return Err(IngestError::not_found(format!(
                "Download link for file {} has expired",
                handle.file_id
            )));
        }
        self.store
            .get(&handle.bucket, &handle.key)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    IngestError::not_found(format!("Content of file {} is missing", handle.file_id))
                } else {
                    IngestError::Storage(e)
                }
            })
    }

    /// Explain why the conditional increment matched nothing.
    async fn unavailable(&self, file_id: FileId) -> IngestError {
        match self.repo.find_file(file_id).await {
            Ok(Some(record)) if record.is_deleted => {
                IngestError::not_found(format!("File {file_id} has been deleted"))
            }
            Ok(Some(_)) => IngestError::not_found(format!("File {file_id} is inactive")),
            Ok(None) => IngestError::not_found(format!("File {file_id} not found")),
            Err(e) => IngestError::Persistence(e),
        }
    }
}
