//! Permission grant repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::permission::PermissionGrant;

/// Repository for reading permission grants.
#[derive(Debug, Clone)]
pub struct PermissionGrantRepository {
    pool: PgPool,
}

impl PermissionGrantRepository {
    /// Create a new permission grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active grants attached to a department.
    pub async fn find_by_department(&self, department_id: i32) -> AppResult<Vec<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM file_permissions WHERE department_id = $1 AND is_active = TRUE \
             ORDER BY granted_at ASC",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list department grants", e)
        })
    }

    /// Active per-file grants held by an employee.
    pub async fn find_by_employee(&self, employee_id: i32) -> AppResult<Vec<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM file_permissions \
             WHERE employee_id = $1 AND file_id IS NOT NULL AND is_active = TRUE \
             ORDER BY granted_at ASC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list file grants", e)
        })
    }
}
