//! Audit trail appends.
//!
//! An audit append always follows a committed primary effect, so a failed
//! append is reported on the operational channel and never returned to
//! the caller.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use docvault_core::result::AppResult;
use docvault_core::types::FileId;
use docvault_database::MetadataRepository;
use docvault_entity::audit::{AuditAction, AuditEntry, NewAuditEntry};

use crate::context::RequestContext;

/// Appends audit entries through the metadata repository.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    repo: Arc<dyn MetadataRepository>,
}

impl AuditLogger {
    /// Creates a new audit logger.
    pub fn new(repo: Arc<dyn MetadataRepository>) -> Self {
        Self { repo }
    }

    /// Appends an entry and returns the stored row.
    pub async fn append(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        action: AuditAction,
        notes: Option<String>,
    ) -> AppResult<AuditEntry> {
        let entry = NewAuditEntry {
            file_id,
            action,
            performed_by: ctx.actor_id,
            action_date: Utc::now(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            notes,
        };
        self.repo.append_audit(&entry).await
    }

    /// Appends an entry, logging instead of returning any failure.
    ///
    /// Returns whether the entry was stored.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        action: AuditAction,
        notes: Option<String>,
    ) -> bool {
        match self.append(ctx, file_id, action, notes).await {
            Ok(entry) => {
                debug!(%file_id, %action, sequence = entry.sequence, "Audit entry appended");
                true
            }
            Err(e) => {
                error!(
                    target: "docvault::audit",
                    %file_id,
                    %action,
                    actor_id = ctx.actor_id,
                    error = %e,
                    "Failed to append audit entry"
                );
                false
            }
        }
    }

    /// All entries for a file in timestamp order.
    pub async fn history(&self, file_id: FileId) -> AppResult<Vec<AuditEntry>> {
        self.repo.audit_for_file(file_id).await
    }
}
