//! File commands: upload, download, delete, activation, details and history.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use docvault_core::config::AppConfig;
use docvault_core::error::{AppError, ErrorKind};
use docvault_core::types::FileId;
use docvault_entity::audit::AuditEntry;
use docvault_entity::file::format_file_size;
use docvault_service::file::{BatchClassification, FileDetails, UploadFile};

use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload; each is ingested independently
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Tab the files are classified under
    #[arg(long)]
    pub tab: i32,

    /// Category within the tab
    #[arg(long)]
    pub category: i32,

    /// Owning department
    #[arg(long)]
    pub department: i32,

    /// Acting employee id (also recorded as the uploader)
    #[arg(long)]
    pub actor: i32,

    /// Free-text description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Upload as a new version of this file (single file only)
    #[arg(long)]
    pub version_of: Option<FileId>,

    /// Override the content type instead of guessing from the extension
    #[arg(long)]
    pub content_type: Option<String>,
}

/// Arguments for the download command
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// File id
    pub file_id: FileId,

    /// Acting employee id
    #[arg(long)]
    pub actor: i32,

    /// Write the content to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the delete command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// File id
    pub file_id: FileId,

    /// Acting employee id
    #[arg(long)]
    pub actor: i32,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Arguments for activate / deactivate
#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// File id
    pub file_id: FileId,

    /// Acting employee id
    #[arg(long)]
    pub actor: i32,
}

/// Arguments for show / history
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// File id
    pub file_id: FileId,
}

/// Uploaded file display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File id
    id: String,
    /// Original name
    name: String,
    /// Version
    version: i32,
    /// Size
    size: String,
    /// Status
    status: String,
    /// Bucket
    bucket: String,
    /// Storage key
    key: String,
}

impl From<&FileDetails> for FileRow {
    fn from(details: &FileDetails) -> Self {
        let r = &details.record;
        Self {
            id: r.id.to_string(),
            name: r.original_filename.clone(),
            version: r.version,
            size: details.file_size_display.clone(),
            status: r.status().to_string(),
            bucket: r.storage_bucket.clone(),
            key: r.storage_key.clone(),
        }
    }
}

/// Batch failure display row
#[derive(Debug, Serialize, Tabled)]
struct FailureRow {
    /// Submitted filename
    file: String,
    /// Error kind
    kind: String,
    /// Reasons
    reasons: String,
}

/// Audit display row
#[derive(Debug, Serialize, Tabled)]
struct AuditRow {
    /// Sequence
    seq: i64,
    /// Time
    time: String,
    /// Action
    action: String,
    /// Actor
    actor: i32,
    /// Origin IP
    ip: String,
    /// Notes
    notes: String,
}

impl From<&AuditEntry> for AuditRow {
    fn from(e: &AuditEntry) -> Self {
        Self {
            seq: e.sequence,
            time: e.action_date.format("%Y-%m-%d %H:%M:%S").to_string(),
            action: e.action.to_string(),
            actor: e.performed_by,
            ip: output::or_dash(e.ip_address.as_deref()),
            notes: output::or_dash(e.notes.as_deref()),
        }
    }
}

/// Execute the upload command
pub async fn upload(
    args: &UploadArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if args.version_of.is_some() && args.files.len() != 1 {
        return Err(AppError::validation("--version-of takes exactly one file"));
    }

    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(
            read_upload(
                path,
                args.content_type.as_deref(),
                config.upload.max_file_size_bytes,
            )
            .await?,
        );
    }

    let pipeline = super::build_pipeline(config).await?;
    let ctx = super::cli_context(args.actor);
    let classification = BatchClassification {
        tab_id: args.tab,
        category_id: args.category,
        department_id: args.department,
        uploader_id: args.actor,
        description: args.description.clone(),
    };

    if let Some(previous_id) = args.version_of {
        let file = files.remove(0);
        let details = pipeline
            .upload_version(&ctx, previous_id, classification.request_for(file))
            .await
            .map_err(super::report)?;
        print_uploaded(&[details], format);
        return Ok(());
    }

    let outcome = pipeline.upload_batch(&ctx, &classification, files).await;

    let mut uploaded = Vec::new();
    let mut failures = Vec::new();
    for item in outcome.items {
        match item.result {
            Ok(details) => uploaded.push(details),
            Err(e) => failures.push(FailureRow {
                file: item.filename,
                kind: e.kind().to_string(),
                reasons: e.reasons().join("; "),
            }),
        }
    }

    print_uploaded(&uploaded, format);
    if !failures.is_empty() {
        output::print_list(&failures, format);
        return Err(AppError::internal(format!(
            "{} of {} files failed",
            failures.len(),
            args.files.len()
        )));
    }
    Ok(())
}

/// Execute the download command
pub async fn download(
    args: &DownloadArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pipeline = super::build_pipeline(config).await?;
    let handle = pipeline
        .record_download(&super::cli_context(args.actor), args.file_id)
        .await
        .map_err(super::report)?;

    match &args.output {
        Some(path) => {
            let content = pipeline
                .fetch_content(&handle)
                .await
                .map_err(super::report)?;
            tokio::fs::write(path, &content).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Internal,
                    format!("Failed to write {}", path.display()),
                    e,
                )
            })?;
            output::print_success(&format!(
                "Saved '{}' ({} bytes) to {}",
                handle.filename,
                content.len(),
                path.display()
            ));
        }
        None => match format {
            OutputFormat::Json => output::print_json(&handle),
            OutputFormat::Table => {
                output::print_kv("File", &handle.filename);
                output::print_kv("Locator", &handle.locator);
                output::print_kv("Content type", &handle.content_type);
                output::print_kv("Size", &handle.size.to_string());
                output::print_kv("Expires", &handle.expires_at.to_rfc3339());
            }
        },
    }
    Ok(())
}

/// Execute the delete command
pub async fn delete(args: &DeleteArgs, config: &AppConfig) -> Result<(), AppError> {
    if !args.yes {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!("Delete file {}?", args.file_id))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Prompt error: {e}")))?;
        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let pipeline = super::build_pipeline(config).await?;
    pipeline
        .soft_delete(&super::cli_context(args.actor), args.file_id)
        .await
        .map_err(super::report)?;

    output::print_success(&format!("File {} deleted", args.file_id));
    Ok(())
}

/// Execute activate / deactivate
pub async fn toggle(args: &ToggleArgs, config: &AppConfig, is_active: bool) -> Result<(), AppError> {
    let pipeline = super::build_pipeline(config).await?;
    let record = pipeline
        .set_active(&super::cli_context(args.actor), args.file_id, is_active)
        .await
        .map_err(super::report)?;

    output::print_success(&format!("File {} is now {}", record.id, record.status()));
    Ok(())
}

/// Execute the show command
pub async fn show(args: &ShowArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let pipeline = super::build_pipeline(config).await?;
    let details = pipeline
        .get_file(args.file_id)
        .await
        .map_err(super::report)?;

    if format == OutputFormat::Json {
        output::print_json(&details);
        return Ok(());
    }

    let r = &details.record;
    let names = &details.names;
    output::print_kv("Id", &r.id.to_string());
    output::print_kv("Name", &r.original_filename);
    output::print_kv("Size", &details.file_size_display);
    output::print_kv("Content type", &r.mime_type);
    output::print_kv("Tab", &output::or_dash(names.tab_name.as_deref()));
    output::print_kv("Category", &output::or_dash(names.category_name.as_deref()));
    output::print_kv("Department", &output::or_dash(names.department_name.as_deref()));
    output::print_kv("Uploaded by", &output::or_dash(names.uploader_name.as_deref()));
    output::print_kv("Version", &r.version.to_string());
    output::print_kv("Current version", &r.is_current_version.to_string());
    output::print_kv("Status", &r.status().to_string());
    output::print_kv("Downloads", &r.download_count.to_string());
    output::print_kv("Locator", &r.storage_locator);
    output::print_kv("Created", &r.created_at.to_rfc3339());
    if !r.is_downloadable() {
        output::print_warning("This file cannot be downloaded in its current state.");
    }
    Ok(())
}

/// Execute the history command
pub async fn history(
    args: &ShowArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pipeline = super::build_pipeline(config).await?;
    let entries = pipeline
        .file_history(args.file_id)
        .await
        .map_err(super::report)?;

    let rows: Vec<AuditRow> = entries.iter().map(AuditRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}

fn print_uploaded(uploaded: &[FileDetails], format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(uploaded),
        OutputFormat::Table => {
            let rows: Vec<FileRow> = uploaded.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
        }
    }
}

/// Read a file from disk into an upload, guessing its content type.
///
/// Files larger than `max_size` are refused before any bytes are read.
async fn read_upload(
    path: &Path,
    content_type: Option<&str>,
    max_size: u64,
) -> Result<UploadFile, AppError> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("Invalid file path: {}", path.display())))?
        .to_string();

    let unreadable = |e: std::io::Error| {
        AppError::with_source(
            ErrorKind::NotFound,
            format!("Failed to read {}", path.display()),
            e,
        )
    };

    let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
    if size > max_size {
        return Err(AppError::validation(format!(
            "{}: file size {} exceeds maximum limit of {}",
            path.display(),
            format_file_size(size),
            format_file_size(max_size)
        )));
    }

    let data = tokio::fs::read(path).await.map_err(unreadable)?;

    let content_type = content_type.map(str::to_string).unwrap_or_else(|| {
        mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string()
    });

    Ok(UploadFile::new(filename, content_type, Bytes::from(data)))
}
