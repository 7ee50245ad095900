//! Upload authorization gate.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use docvault_core::result::AppResult;
use docvault_database::ReferenceRepository;

/// Decides whether an actor may upload into a classification.
///
/// Finer-grained ACLs plug in here by providing another implementation.
#[async_trait]
pub trait PermissionChecker: Send + Sync + Debug + 'static {
    /// `Ok(false)` is a denial; `Err` only reports a failure to decide.
    async fn can_upload(&self, actor_id: i32, tab_id: i32, category_id: i32) -> AppResult<bool>;
}

/// Grants uploads to any active employee into an active tab and an active
/// category belonging to that tab.
#[derive(Debug, Clone)]
pub struct UploadPermissionChecker {
    reference: Arc<dyn ReferenceRepository>,
}

impl UploadPermissionChecker {
    /// Creates a new checker over the reference repository.
    pub fn new(reference: Arc<dyn ReferenceRepository>) -> Self {
        Self { reference }
    }
}

#[async_trait]
impl PermissionChecker for UploadPermissionChecker {
    async fn can_upload(&self, actor_id: i32, tab_id: i32, category_id: i32) -> AppResult<bool> {
        let actor_ok = self
            .reference
            .find_employee(actor_id)
            .await?
            .is_some_and(|e| e.is_active);
        if !actor_ok {
            debug!(actor_id, "Upload denied: actor missing or inactive");
            return Ok(false);
        }

        let tab_ok = self
            .reference
            .find_tab(tab_id)
            .await?
            .is_some_and(|t| t.is_active);
        if !tab_ok {
            debug!(actor_id, tab_id, "Upload denied: tab missing or inactive");
            return Ok(false);
        }

        let category_ok = self
            .reference
            .find_category(category_id)
            .await?
            .is_some_and(|c| c.is_active && c.belongs_to(tab_id));
        if !category_ok {
            debug!(
                actor_id,
                tab_id, category_id, "Upload denied: category missing, inactive or in another tab"
            );
        }
        Ok(category_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_database::MemoryStore;
    use docvault_entity::classification::{Category, Employee, Tab};

    async fn seeded() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .put_employee(Employee {
                employee_id: 42,
                employee_code: "E042".into(),
                full_name: "Alice".into(),
                email: "alice@example.com".into(),
                position: "Engineer".into(),
                department_id: 3,
                is_active: true,
            })
            .await;
        store
            .put_tab(Tab {
                tab_id: 1,
                tab_code: "ENG".into(),
                tab_name: "Engineering".into(),
                is_active: true,
            })
            .await;
        store
            .put_tab(Tab {
                tab_id: 9,
                tab_code: "OLD".into(),
                tab_name: "Archive".into(),
                is_active: false,
            })
            .await;
        store
            .put_category(Category {
                category_id: 5,
                tab_id: 1,
                category_code: "SPEC".into(),
                category_name: "Specifications".into(),
                is_active: true,
            })
            .await;
        store
            .put_category(Category {
                category_id: 6,
                tab_id: 2,
                category_code: "HR".into(),
                category_name: "Policies".into(),
                is_active: true,
            })
            .await;
        store
    }

    #[tokio::test]
    async fn test_grants_when_all_references_hold() {
        let checker = UploadPermissionChecker::new(seeded().await);
        assert!(checker.can_upload(42, 1, 5).await.unwrap());
    }

    #[tokio::test]
    async fn test_denies_missing_or_mismatched_references() {
        let checker = UploadPermissionChecker::new(seeded().await);
        assert!(!checker.can_upload(7, 1, 5).await.unwrap());
        assert!(!checker.can_upload(42, 9, 5).await.unwrap());
        assert!(!checker.can_upload(42, 1, 6).await.unwrap());
        assert!(!checker.can_upload(42, 1, 99).await.unwrap());
    }
}
