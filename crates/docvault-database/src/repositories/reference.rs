//! Classification and employee lookups.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_entity::classification::{Category, Department, Employee, Tab};

/// Read-only repository over the administratively-owned reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceDataRepository {
    pool: PgPool,
}

impl ReferenceDataRepository {
    /// Create a new reference data repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a tab by id.
    pub async fn find_tab(&self, tab_id: i32) -> AppResult<Option<Tab>> {
        sqlx::query_as::<_, Tab>(
            "SELECT tab_id, tab_code, tab_name, is_active FROM tabs WHERE tab_id = $1",
        )
        .bind(tab_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tab", e))
    }

    /// Find a category by id.
    pub async fn find_category(&self, category_id: i32) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT category_id, tab_id, category_code, category_name, is_active \
             FROM categories WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find category", e))
    }

    /// Find a department by id.
    pub async fn find_department(&self, department_id: i32) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, Department>(
            "SELECT department_id, department_code, department_name, is_active \
             FROM departments WHERE department_id = $1",
        )
        .bind(department_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find department", e))
    }

    /// Find an employee by id.
    pub async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>> {
        sqlx::query_as::<_, Employee>(
            "SELECT employee_id, employee_code, full_name, email, position, department_id, \
             is_active FROM employees WHERE employee_id = $1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find employee", e))
    }
}
