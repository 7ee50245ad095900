//! In-memory implementation of both repository contracts.
//!
//! All state sits behind a single [`RwLock`], so every conditional write
//! observes and mutates a record as one step.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{AuditEntryId, FileId};
use docvault_entity::audit::{AuditEntry, NewAuditEntry};
use docvault_entity::classification::{Category, Department, Employee, Tab};
use docvault_entity::file::FileRecord;
use docvault_entity::permission::PermissionGrant;

use crate::traits::{MetadataRepository, ReferenceRepository};

#[derive(Debug, Default)]
struct State {
    files: HashMap<FileId, FileRecord>,
    audit: Vec<AuditEntry>,
    next_sequence: i64,
    tabs: HashMap<i32, Tab>,
    categories: HashMap<i32, Category>,
    departments: HashMap<i32, Department>,
    employees: HashMap<i32, Employee>,
    grants: Vec<PermissionGrant>,
}

/// Process-local metadata and reference store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a tab.
    pub async fn put_tab(&self, tab: Tab) {
        self.state.write().await.tabs.insert(tab.tab_id, tab);
    }

    /// Add or replace a category.
    pub async fn put_category(&self, category: Category) {
        self.state
            .write()
            .await
            .categories
            .insert(category.category_id, category);
    }

    /// Add or replace a department.
    pub async fn put_department(&self, department: Department) {
        self.state
            .write()
            .await
            .departments
            .insert(department.department_id, department);
    }

    /// Add or replace an employee.
    pub async fn put_employee(&self, employee: Employee) {
        self.state
            .write()
            .await
            .employees
            .insert(employee.employee_id, employee);
    }

    /// Add a permission grant.
    pub async fn put_grant(&self, grant: PermissionGrant) {
        self.state.write().await.grants.push(grant);
    }

    /// Number of stored file records.
    pub async fn file_count(&self) -> usize {
        self.state.read().await.files.len()
    }

    /// Number of stored audit entries across all files.
    pub async fn audit_count(&self) -> usize {
        self.state.read().await.audit.len()
    }
}

#[async_trait]
impl MetadataRepository for MemoryStore {
    async fn find_file(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn insert_file(&self, record: &FileRecord) -> AppResult<FileRecord> {
        let mut state = self.state.write().await;
        if state.files.contains_key(&record.id) {
            return Err(AppError::conflict(format!(
                "File {} already exists",
                record.id
            )));
        }
        state.files.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn insert_version(
        &self,
        previous_id: FileId,
        record: &FileRecord,
    ) -> AppResult<FileRecord> {
        let mut state = self.state.write().await;
        if state.files.contains_key(&record.id) {
            return Err(AppError::conflict(format!(
                "File {} already exists",
                record.id
            )));
        }
        let previous = state
            .files
            .get_mut(&previous_id)
            .filter(|f| f.is_current_version && !f.is_deleted)
            .ok_or_else(|| {
                AppError::conflict(format!(
                    "File {previous_id} is no longer the current version"
                ))
            })?;
        previous.is_current_version = false;
        previous.updated_at = record.created_at;
        state.files.insert(record.id, record.clone());
        Ok(record.clone())
    }

    async fn increment_download_count(
        &self,
        id: FileId,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        let mut state = self.state.write().await;
        Ok(state
            .files
            .get_mut(&id)
            .filter(|f| !f.is_deleted && f.is_active)
            .map(|f| {
                f.download_count += 1;
                f.updated_at = at;
                f.clone()
            }))
    }

    async fn soft_delete(
        &self,
        id: FileId,
        deleted_by: i32,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        let mut state = self.state.write().await;
        Ok(state
            .files
            .get_mut(&id)
            .filter(|f| !f.is_deleted)
            .map(|f| {
                f.is_deleted = true;
                f.is_active = false;
                f.deleted_at = Some(at);
                f.deleted_by = Some(deleted_by);
                f.updated_at = at;
                f.clone()
            }))
    }

    async fn set_active(
        &self,
        id: FileId,
        is_active: bool,
        at: DateTime<Utc>,
    ) -> AppResult<Option<FileRecord>> {
        let mut state = self.state.write().await;
        Ok(state
            .files
            .get_mut(&id)
            .filter(|f| !f.is_deleted)
            .map(|f| {
                f.is_active = is_active;
                f.updated_at = at;
                f.clone()
            }))
    }

    async fn append_audit(&self, entry: &NewAuditEntry) -> AppResult<AuditEntry> {
        let mut state = self.state.write().await;
        state.next_sequence += 1;
        let stored = AuditEntry {
            id: AuditEntryId::new(),
            sequence: state.next_sequence,
            file_id: entry.file_id,
            action: entry.action,
            performed_by: entry.performed_by,
            action_date: entry.action_date,
            ip_address: entry.ip_address.clone(),
            user_agent: entry.user_agent.clone(),
            notes: entry.notes.clone(),
        };
        state.audit.push(stored.clone());
        Ok(stored)
    }

    async fn audit_for_file(&self, file_id: FileId) -> AppResult<Vec<AuditEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<AuditEntry> = state
            .audit
            .iter()
            .filter(|e| e.file_id == file_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.action_date
                .cmp(&b.action_date)
                .then(a.sequence.cmp(&b.sequence))
        });
        Ok(entries)
    }
}

#[async_trait]
impl ReferenceRepository for MemoryStore {
    async fn find_tab(&self, tab_id: i32) -> AppResult<Option<Tab>> {
        Ok(self.state.read().await.tabs.get(&tab_id).cloned())
    }

    async fn find_category(&self, category_id: i32) -> AppResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&category_id).cloned())
    }

    async fn find_department(&self, department_id: i32) -> AppResult<Option<Department>> {
        Ok(self
            .state
            .read()
            .await
            .departments
            .get(&department_id)
            .cloned())
    }

    async fn find_employee(&self, employee_id: i32) -> AppResult<Option<Employee>> {
        Ok(self.state.read().await.employees.get(&employee_id).cloned())
    }

    async fn department_grants(&self, department_id: i32) -> AppResult<Vec<PermissionGrant>> {
        Ok(self
            .state
            .read()
            .await
            .grants
            .iter()
            .filter(|g| g.is_active && g.department_id == Some(department_id))
            .cloned()
            .collect())
    }

    async fn employee_file_grants(&self, employee_id: i32) -> AppResult<Vec<PermissionGrant>> {
        Ok(self
            .state
            .read()
            .await
            .grants
            .iter()
            .filter(|g| g.is_active && g.file_id.is_some() && g.employee_id == Some(employee_id))
            .cloned()
            .collect())
    }
}
