//! Read-only permission summary for an employee.
//!
//! Grants listed here are informational; the upload gate never reads them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::FileId;
use docvault_database::{MetadataRepository, ReferenceRepository};
use docvault_entity::permission::PermissionLevel;

/// Who the summary is for.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeInfo {
    pub employee_id: i32,
    pub full_name: String,
    pub position: String,
    pub department_id: i32,
    pub department_name: Option<String>,
}

/// Highest active level granted to a department.
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentPermission {
    pub department_id: i32,
    pub department_name: Option<String>,
    pub permission_type: PermissionLevel,
}

/// An active grant on a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FilePermission {
    pub file_id: FileId,
    pub file_name: Option<String>,
    pub permission_type: PermissionLevel,
    pub granted_by: i32,
    pub granted_by_name: Option<String>,
    pub granted_at: DateTime<Utc>,
}

/// Everything [`PermissionLister::list_permissions`] returns.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionSummary {
    pub employee: EmployeeInfo,
    pub department_permissions: Vec<DepartmentPermission>,
    pub file_permissions: Vec<FilePermission>,
}

/// Builds permission summaries from stored grants.
#[derive(Debug, Clone)]
pub struct PermissionLister {
    reference: Arc<dyn ReferenceRepository>,
    metadata: Arc<dyn MetadataRepository>,
}

impl PermissionLister {
    /// Creates a new lister.
    pub fn new(
        reference: Arc<dyn ReferenceRepository>,
        metadata: Arc<dyn MetadataRepository>,
    ) -> Self {
        Self {
            reference,
            metadata,
        }
    }

    /// Summarize the grants visible to an active employee.
    pub async fn list_permissions(&self, employee_id: i32) -> AppResult<PermissionSummary> {
        let employee = self
            .reference
            .find_employee(employee_id)
            .await?
            .filter(|e| e.is_active)
            .ok_or_else(|| AppError::not_found(format!("Employee {employee_id} not found")))?;

        let department_name = self
            .reference
            .find_department(employee.department_id)
            .await?
            .map(|d| d.department_name);

        let department_permissions = self
            .reference
            .department_grants(employee.department_id)
            .await?
            .into_iter()
            .map(|g| g.permission_type)
            .max()
            .map(|level| DepartmentPermission {
                department_id: employee.department_id,
                department_name: department_name.clone(),
                permission_type: level,
            })
            .into_iter()
            .collect();

        let mut file_permissions = Vec::new();
        for grant in self.reference.employee_file_grants(employee_id).await? {
            let Some(file_id) = grant.file_id else {
                continue;
            };
            let file_name = self
                .metadata
                .find_file(file_id)
                .await?
                .map(|f| f.original_filename);
            let granted_by_name = self
                .reference
                .find_employee(grant.granted_by)
                .await?
                .map(|e| e.full_name);
            file_permissions.push(FilePermission {
                file_id,
                file_name,
                permission_type: grant.permission_type,
                granted_by: grant.granted_by,
                granted_by_name,
                granted_at: grant.granted_at,
            });
        }

        Ok(PermissionSummary {
            employee: EmployeeInfo {
                employee_id: employee.employee_id,
                full_name: employee.full_name,
                position: employee.position,
                department_id: employee.department_id,
                department_name,
            },
            department_permissions,
            file_permissions,
        })
    }
}
