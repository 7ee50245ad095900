//! Upload workflow behaviour against in-memory stores.

mod helpers;

use std::sync::Arc;

use bytes::Bytes;

use docvault_core::error::ErrorKind;
use docvault_core::types::FileId;
use docvault_database::MetadataRepository;
use docvault_entity::audit::AuditAction;
use docvault_service::file::{BatchClassification, UploadFile};
use docvault_service::{IngestError, RequestContext};

use helpers::*;

fn ctx() -> RequestContext {
    RequestContext::new(ACTOR).with_origin(
        Some("10.0.0.7".to_string()),
        Some("docvault-test".to_string()),
    )
}

async fn upload_count(h: &Harness, file_id: FileId) -> usize {
    h.store
        .audit_for_file(file_id)
        .await
        .unwrap()
        .iter()
        .filter(|e| e.action == AuditAction::Upload)
        .count()
}

#[tokio::test]
async fn test_report_pdf_upload_succeeds() {
    let h = Harness::new().await;

    let details = h.pipeline.upload(&ctx(), report_request()).await.unwrap();
    let record = &details.record;

    assert_eq!(record.file_extension, ".pdf");
    assert_eq!(record.file_size, 1024);
    assert_eq!(record.version, 1);
    assert!(record.is_current_version);
    assert!(record.is_active);
    assert!(!record.is_deleted);
    assert_eq!(record.original_filename, "report.PDF");
    assert_eq!(record.file_name, "report");
    assert_eq!(record.storage_bucket, "file-management-tab1-cat5");
    assert!(record.storage_key.starts_with("report_"));
    assert!(record.storage_key.ends_with(".pdf"));
    assert_eq!(details.file_size_display, "1.00 KB");

    assert_eq!(details.names.tab_name.as_deref(), Some("Engineering"));
    assert_eq!(details.names.category_name.as_deref(), Some("Drawings"));
    assert_eq!(details.names.uploader_name.as_deref(), Some("Nguyen Van A"));
    assert_eq!(
        details.names.department_name.as_deref(),
        Some("Engineering Department")
    );

    let stored = h.store.find_file(record.id).await.unwrap().unwrap();
    assert_eq!(&stored, record);
    assert!(h.objects.inner.contains(&record.storage_bucket, &record.storage_key));
    assert_eq!(upload_count(&h, record.id).await, 1);

    let entry = &h.store.audit_for_file(record.id).await.unwrap()[0];
    assert_eq!(entry.performed_by, ACTOR);
    assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.7"));
    assert_eq!(entry.user_agent.as_deref(), Some("docvault-test"));
}

#[tokio::test]
async fn test_identical_uploads_are_not_deduplicated() {
    let h = Harness::new().await;

    let first = h.pipeline.upload(&ctx(), report_request()).await.unwrap();
    let second = h.pipeline.upload(&ctx(), report_request()).await.unwrap();

    assert_ne!(first.record.id, second.record.id);
    assert_ne!(first.record.storage_key, second.record.storage_key);
    assert_eq!(h.store.file_count().await, 2);
    assert_eq!(h.objects.inner.len(), 2);
}

#[tokio::test]
async fn test_category_from_another_tab_is_a_reference_error() {
    let h = Harness::new().await;
    let mut request = report_request();
    request.category_id = FOREIGN_CATEGORY;

    let err = h.pipeline.upload(&ctx(), request).await.unwrap_err();

    assert!(matches!(err, IngestError::Reference { .. }), "{err:?}");
    assert_eq!(h.store.file_count().await, 0);
    assert!(h.objects.inner.is_empty());
    assert_eq!(h.store.audit_count().await, 0);
}

#[tokio::test]
async fn test_path_traversal_is_a_validation_error() {
    let h = Harness::new().await;
    let request = request("../../etc/passwd", "text/plain", b"root:x:0:0".to_vec());

    let err = h.pipeline.upload(&ctx(), request).await.unwrap_err();

    match &err {
        IngestError::Validation { reasons } => {
            assert!(reasons.iter().any(|r| r.contains("path traversal")), "{reasons:?}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(h.store.file_count().await, 0);
    assert!(h.objects.inner.is_empty());
}

#[tokio::test]
async fn test_oversized_content_type_is_rejected_before_storage() {
    let h = Harness::new().await;
    let content_type = format!("application/pdf; name={}", "x".repeat(300));

    let err = h
        .pipeline
        .upload(&ctx(), request("report.pdf", &content_type, vec![1; 16]))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Validation { .. }), "{err:?}");
    assert!(err.reasons()[0].contains("Content type is too long"));
    assert!(h.objects.inner.is_empty());
    assert_eq!(h.store.file_count().await, 0);
}

#[tokio::test]
async fn test_empty_payload_is_rejected_without_side_effects() {
    let h = Harness::new().await;

    let err = h
        .pipeline
        .upload(&ctx(), request("empty.txt", "text/plain", Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Validation { .. }));
    assert_eq!(h.store.file_count().await, 0);
    assert_eq!(h.store.audit_count().await, 0);
}

#[tokio::test]
async fn test_denied_gate_leaves_no_trace() {
    let h = Harness::with_checker(Arc::new(DenyAll)).await;

    let err = h.pipeline.upload(&ctx(), report_request()).await.unwrap_err();

    assert!(matches!(err, IngestError::PermissionDenied { .. }));
    assert_eq!(err.kind(), ErrorKind::Authorization);
    assert_eq!(h.store.file_count().await, 0);
    assert!(h.objects.inner.is_empty());
}

#[tokio::test]
async fn test_inactive_actor_is_denied() {
    let h = Harness::new().await;

    let err = h
        .pipeline
        .upload(&RequestContext::new(INACTIVE_ACTOR), report_request())
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::PermissionDenied { .. }));
}

#[tokio::test]
async fn test_inactive_category_is_denied_before_storage() {
    let h = Harness::new().await;
    let mut request = report_request();
    request.category_id = INACTIVE_CATEGORY;

    let err = h.pipeline.upload(&ctx(), request).await.unwrap_err();

    assert!(matches!(err, IngestError::PermissionDenied { .. }));
    assert!(h.objects.inner.is_empty());
}

#[tokio::test]
async fn test_inactive_uploader_reference_is_rejected() {
    let h = Harness::new().await;
    let mut request = report_request();
    request.uploader_id = INACTIVE_ACTOR;

    let err = h.pipeline.upload(&ctx(), request).await.unwrap_err();

    assert!(matches!(err, IngestError::Reference { .. }), "{err:?}");
    assert_eq!(h.store.file_count().await, 0);
}

#[tokio::test]
async fn test_storage_failure_writes_nothing() {
    let h = Harness::new().await;
    h.fail_put();

    let err = h.pipeline.upload(&ctx(), report_request()).await.unwrap_err();

    assert!(matches!(err, IngestError::Storage(_)), "{err:?}");
    assert!(err.is_retryable());
    assert_eq!(h.store.file_count().await, 0);
    assert_eq!(h.store.audit_count().await, 0);
}

#[tokio::test]
async fn test_insert_failure_removes_the_orphaned_object() {
    let h = Harness::new().await;
    h.fail_insert();

    let err = h.pipeline.upload(&ctx(), report_request()).await.unwrap_err();

    assert!(matches!(err, IngestError::Persistence(_)), "{err:?}");
    assert!(err.is_retryable());
    assert!(h.objects.inner.is_empty());
    assert_eq!(h.store.file_count().await, 0);
    assert_eq!(h.store.audit_count().await, 0);
}

#[tokio::test]
async fn test_failed_compensation_is_a_partial_failure() {
    let h = Harness::new().await;
    h.fail_insert();
    h.fail_delete();

    let err = h.pipeline.upload(&ctx(), report_request()).await.unwrap_err();

    match &err {
        IngestError::PartialFailure { bucket, key, .. } => {
            assert_eq!(bucket, "file-management-tab1-cat5");
            assert!(h.objects.inner.contains(bucket, key));
        }
        other => panic!("expected partial failure, got {other:?}"),
    }
    assert!(!err.is_retryable());
    assert_eq!(err.kind(), ErrorKind::PartialFailure);
    assert_eq!(h.store.file_count().await, 0);
    assert_eq!(h.store.audit_count().await, 0);
}

#[tokio::test]
async fn test_version_conflict_at_insert_removes_the_orphaned_object() {
    let h = Harness::new().await;
    let first = h.pipeline.upload(&ctx(), report_request()).await.unwrap();
    let files_before = h.store.file_count().await;
    let audits_before = h.store.audit_count().await;
    h.retire_before_version();

    let err = h
        .pipeline
        .upload_version(&ctx(), first.record.id, report_request())
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Persistence(_)), "{err:?}");
    assert!(err.is_retryable());
    assert_eq!(h.objects.inner.len(), 1);
    assert!(
        h.objects
            .inner
            .contains(&first.record.storage_bucket, &first.record.storage_key)
    );
    assert_eq!(h.store.file_count().await, files_before);
    assert_eq!(h.store.audit_count().await, audits_before);
}

#[tokio::test]
async fn test_audit_failure_does_not_fail_the_upload() {
    let h = Harness::new().await;
    h.fail_audit(true);

    let details = h.pipeline.upload(&ctx(), report_request()).await.unwrap();

    assert!(h.store.find_file(details.record.id).await.unwrap().is_some());
    assert_eq!(h.store.audit_count().await, 0);
}

#[tokio::test]
async fn test_new_version_supersedes_the_current_one() {
    let h = Harness::new().await;
    let first = h.pipeline.upload(&ctx(), report_request()).await.unwrap();

    let second = h
        .pipeline
        .upload_version(&ctx(), first.record.id, report_request())
        .await
        .unwrap();

    assert_eq!(second.record.version, 2);
    assert_eq!(second.record.parent_file_id, Some(first.record.id));
    assert!(second.record.is_current_version);

    let previous = h.store.find_file(first.record.id).await.unwrap().unwrap();
    assert!(!previous.is_current_version);

    let history = h.store.audit_for_file(first.record.id).await.unwrap();
    let actions: Vec<_> = history.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Upload, AuditAction::Update]);
    assert_eq!(upload_count(&h, second.record.id).await, 1);

    let err = h
        .pipeline
        .upload_version(&ctx(), first.record.id, report_request())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn test_new_version_must_keep_its_classification() {
    let h = Harness::new().await;
    let first = h.pipeline.upload(&ctx(), report_request()).await.unwrap();

    let mut moved = report_request();
    moved.tab_id = OTHER_TAB;
    moved.category_id = FOREIGN_CATEGORY;

    let err = h
        .pipeline
        .upload_version(&ctx(), first.record.id, moved)
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Reference { .. }), "{err:?}");
    assert_eq!(h.store.file_count().await, 1);
    assert_eq!(h.objects.inner.len(), 1);
}

#[tokio::test]
async fn test_version_of_unknown_or_deleted_file_is_not_found() {
    let h = Harness::new().await;

    let err = h
        .pipeline
        .upload_version(&ctx(), FileId::new(), report_request())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }));

    let first = h.pipeline.upload(&ctx(), report_request()).await.unwrap();
    h.pipeline.soft_delete(&ctx(), first.record.id).await.unwrap();
    let err = h
        .pipeline
        .upload_version(&ctx(), first.record.id, report_request())
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::NotFound { .. }));
    assert_eq!(h.objects.inner.len(), 1);
}

#[tokio::test]
async fn test_batch_failures_do_not_abort_other_files() {
    let h = Harness::new().await;
    let classification = BatchClassification {
        tab_id: TAB,
        category_id: CATEGORY,
        department_id: DEPARTMENT,
        uploader_id: ACTOR,
        description: None,
    };
    let files = vec![
        UploadFile::new("a.txt", "text/plain", Bytes::from_static(b"alpha")),
        UploadFile::new("setup.exe", "application/octet-stream", Bytes::from_static(b"MZ")),
        UploadFile::new("b.png", "image/png", Bytes::from_static(b"\x89PNG")),
    ];

    let outcome = h.pipeline.upload_batch(&ctx(), &classification, files).await;

    assert_eq!(outcome.items.len(), 3);
    assert_eq!(outcome.success_count(), 2);
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(outcome.items[1].filename, "setup.exe");
    assert!(matches!(
        outcome.items[1].result,
        Err(IngestError::Validation { .. })
    ));
    assert_eq!(h.store.file_count().await, 2);
}
