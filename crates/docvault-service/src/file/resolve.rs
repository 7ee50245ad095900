//! Explicit read-then-resolve of classification and actor references.

use std::sync::Arc;

use docvault_core::result::AppResult;
use docvault_database::ReferenceRepository;
use docvault_entity::file::FileRecord;

use crate::error::IngestError;
use crate::file::types::{ResolvedNames, UploadRequest};

/// Resolves reference rows for uploads and for display.
#[derive(Debug, Clone)]
pub struct ReferenceResolver {
    reference: Arc<dyn ReferenceRepository>,
}

impl ReferenceResolver {
    /// Creates a new resolver.
    pub fn new(reference: Arc<dyn ReferenceRepository>) -> Self {
        Self { reference }
    }

    /// Re-read every reference of an upload request.
    ///
    /// Runs after the upload gate to catch rows archived in between. Every
    /// row must exist and be active, and the category must belong to the
    /// request's tab.
    pub async fn resolve_for_upload(
        &self,
        request: &UploadRequest,
    ) -> Result<ResolvedNames, IngestError> {
        let tab = self
            .reference
            .find_tab(request.tab_id)
            .await
            .map_err(IngestError::Persistence)?
            .filter(|t| t.is_active)
            .ok_or_else(|| {
                IngestError::reference(format!("Tab {} not found or inactive", request.tab_id))
            })?;

        let category = self
            .reference
            .find_category(request.category_id)
            .await
            .map_err(IngestError::Persistence)?
            .filter(|c| c.is_active)
            .ok_or_else(|| {
                IngestError::reference(format!(
                    "Category {} not found or inactive",
                    request.category_id
                ))
            })?;
        if !category.belongs_to(request.tab_id) {
            return Err(IngestError::reference(format!(
                "Category {} belongs to tab {}, not tab {}",
                category.category_id, category.tab_id, request.tab_id
            )));
        }

        let department = self
            .reference
            .find_department(request.department_id)
            .await
            .map_err(IngestError::Persistence)?
            .filter(|d| d.is_active)
            .ok_or_else(|| {
                IngestError::reference(format!(
                    "Department {} not found or inactive",
                    request.department_id
                ))
            })?;

        let uploader = self
            .reference
            .find_employee(request.uploader_id)
            .await
            .map_err(IngestError::Persistence)?
            .filter(|e| e.is_active)
            .ok_or_else(|| {
                IngestError::reference(format!(
                    "Employee {} not found or inactive",
                    request.uploader_id
                ))
            })?;

        Ok(ResolvedNames {
            tab_name: Some(tab.tab_name),
            category_name: Some(category.category_name),
            department_name: Some(department.department_name),
            uploader_name: Some(uploader.full_name),
        })
    }

    /// Best-effort names for an existing record. Missing rows yield `None`.
    pub async fn names_for(&self, record: &FileRecord) -> AppResult<ResolvedNames> {
        Ok(ResolvedNames {
            tab_name: self
                .reference
                .find_tab(record.tab_id)
                .await?
                .map(|t| t.tab_name),
            category_name: self
                .reference
                .find_category(record.category_id)
                .await?
                .map(|c| c.category_name),
            department_name: self
                .reference
                .find_department(record.department_id)
                .await?
                .map(|d| d.department_name),
            uploader_name: self
                .reference
                .find_employee(record.uploaded_by)
                .await?
                .map(|e| e.full_name),
        })
    }
}
