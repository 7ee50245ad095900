//! Download accounting, soft delete, activation and query behaviour.

mod helpers;

use chrono::{Duration, Utc};

use docvault_core::types::{FileId, PermissionGrantId};
use docvault_database::MetadataRepository;
use docvault_entity::audit::AuditAction;
use docvault_entity::permission::{PermissionGrant, PermissionLevel};
use docvault_service::{IngestError, RequestContext};

use helpers::*;

fn ctx() -> RequestContext {
    RequestContext::new(ACTOR)
}

async fn uploaded(h: &Harness) -> FileId {
    h.pipeline
        .upload(&ctx(), report_request())
        .await
        .unwrap()
        .record
        .id
}

async fn actions(h: &Harness, file_id: FileId) -> Vec<AuditAction> {
    h.store
        .audit_for_file(file_id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect()
}

#[tokio::test]
async fn test_download_counts_and_returns_a_handle() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;
    let before = Utc::now();

    let handle = h.pipeline.record_download(&ctx(), id).await.unwrap();

    assert_eq!(handle.file_id, id);
    assert_eq!(handle.filename, "report.PDF");
    assert_eq!(handle.content_type, "application/pdf");
    assert_eq!(handle.size, 1024);
    assert!(handle.locator.starts_with("memory://file-management-tab1-cat5/"));
    assert!(handle.expires_at >= before + Duration::seconds(86_400));
    assert!(!handle.is_expired_at(Utc::now()));

    let record = h.store.find_file(id).await.unwrap().unwrap();
    assert_eq!(record.download_count, 1);
    assert_eq!(actions(&h, id).await, vec![AuditAction::Upload, AuditAction::Download]);

    let content = h.pipeline.fetch_content(&handle).await.unwrap();
    assert_eq!(content.len(), 1024);
}

#[tokio::test]
async fn test_download_of_unknown_file_is_not_found() {
    let h = Harness::new().await;

    let err = h
        .pipeline
        .record_download(&ctx(), FileId::new())
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::NotFound { .. }));
    assert_eq!(h.store.audit_count().await, 0);
}

#[tokio::test]
async fn test_soft_delete_then_download_is_not_found() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;

    h.pipeline.soft_delete(&ctx(), id).await.unwrap();
    let err = h.pipeline.record_download(&ctx(), id).await.unwrap_err();

    match err {
        IngestError::NotFound { reason } => assert!(reason.contains("deleted"), "{reason}"),
        other => panic!("expected not found, got {other:?}"),
    }

    let record = h.store.find_file(id).await.unwrap().unwrap();
    assert!(record.is_deleted);
    assert!(!record.is_active);
    assert_eq!(record.deleted_by, Some(ACTOR));
    assert!(record.deleted_at.is_some());
    assert_eq!(record.download_count, 0);
    assert!(h.objects.inner.contains(&record.storage_bucket, &record.storage_key));
}

#[tokio::test]
async fn test_soft_delete_twice_keeps_the_first_stamp() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;

    h.pipeline.soft_delete(&ctx(), id).await.unwrap();
    let first = h.store.find_file(id).await.unwrap().unwrap();

    h.pipeline
        .soft_delete(&RequestContext::new(INACTIVE_ACTOR), id)
        .await
        .unwrap();
    let second = h.store.find_file(id).await.unwrap().unwrap();

    assert_eq!(first.deleted_at, second.deleted_at);
    assert_eq!(second.deleted_by, Some(ACTOR));
    assert_eq!(actions(&h, id).await, vec![AuditAction::Upload, AuditAction::Delete]);
}

#[tokio::test]
async fn test_soft_delete_of_unknown_file_is_not_found() {
    let h = Harness::new().await;

    let err = h.pipeline.soft_delete(&ctx(), FileId::new()).await.unwrap_err();

    assert!(matches!(err, IngestError::NotFound { .. }));
}

#[tokio::test]
async fn test_deactivate_then_activate_restores_the_file() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;

    let inactive = h.pipeline.set_active(&ctx(), id, false).await.unwrap();
    assert!(!inactive.is_active);

    let err = h.pipeline.record_download(&ctx(), id).await.unwrap_err();
    match err {
        IngestError::NotFound { reason } => assert!(reason.contains("inactive"), "{reason}"),
        other => panic!("expected not found, got {other:?}"),
    }

    let active = h.pipeline.set_active(&ctx(), id, true).await.unwrap();
    assert!(active.is_active);
    assert!(!active.is_deleted);

    assert_eq!(
        actions(&h, id).await,
        vec![
            AuditAction::Upload,
            AuditAction::Deactivate,
            AuditAction::Activate
        ]
    );
    h.pipeline.record_download(&ctx(), id).await.unwrap();
}

#[tokio::test]
async fn test_set_active_on_deleted_file_is_not_found() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;
    h.pipeline.soft_delete(&ctx(), id).await.unwrap();

    let err = h.pipeline.set_active(&ctx(), id, true).await.unwrap_err();

    assert!(matches!(err, IngestError::NotFound { .. }));
    let record = h.store.find_file(id).await.unwrap().unwrap();
    assert!(record.is_deleted);
    assert!(!record.is_active);
}

#[tokio::test]
async fn test_audit_failure_does_not_fail_lifecycle_operations() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;
    h.fail_audit(true);

    h.pipeline.record_download(&ctx(), id).await.unwrap();
    h.pipeline.set_active(&ctx(), id, false).await.unwrap();
    h.pipeline.soft_delete(&ctx(), id).await.unwrap();

    assert_eq!(actions(&h, id).await, vec![AuditAction::Upload]);
    let record = h.store.find_file(id).await.unwrap().unwrap();
    assert!(record.is_deleted);
    assert_eq!(record.download_count, 1);
}

#[tokio::test]
async fn test_get_file_hides_deleted_records() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;

    let details = h.pipeline.get_file(id).await.unwrap();
    assert_eq!(details.record.id, id);
    assert_eq!(details.names.category_name.as_deref(), Some("Drawings"));

    h.pipeline.soft_delete(&ctx(), id).await.unwrap();
    let err = h.pipeline.get_file(id).await.unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }));
}

#[tokio::test]
async fn test_history_is_available_after_deletion() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;
    h.pipeline.record_download(&ctx(), id).await.unwrap();
    h.pipeline.soft_delete(&ctx(), id).await.unwrap();

    let history = h.pipeline.file_history(id).await.unwrap();

    let actions: Vec<_> = history.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Upload, AuditAction::Download, AuditAction::Delete]
    );
    assert!(history.windows(2).all(|w| w[0].sequence < w[1].sequence));

    let err = h.pipeline.file_history(FileId::new()).await.unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }));
}

#[tokio::test]
async fn test_permission_listing_reports_grants() {
    let h = Harness::new().await;
    let id = uploaded(&h).await;
    h.store
        .put_grant(PermissionGrant {
            id: PermissionGrantId::new(),
            file_id: Some(id),
            employee_id: Some(ACTOR),
            department_id: None,
            permission_type: PermissionLevel::Write,
            granted_by: ACTOR,
            granted_at: Utc::now(),
            is_active: true,
        })
        .await;

    let summary = h.pipeline.list_permissions(ACTOR).await.unwrap();

    assert_eq!(summary.employee.full_name, "Nguyen Van A");
    assert_eq!(summary.file_permissions.len(), 1);
    assert_eq!(
        summary.file_permissions[0].file_name.as_deref(),
        Some("report.PDF")
    );

    let err = h.pipeline.list_permissions(INACTIVE_ACTOR).await.unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }));
}
