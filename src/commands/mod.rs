//! CLI command definitions and dispatch.

pub mod config;
pub mod file;
pub mod migrate;
pub mod permissions;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::{
    DatabasePool, MetadataRepository, PgMetadataRepository, PgReferenceRepository,
    ReferenceRepository,
};
use docvault_service::{IngestError, IngestionPipeline, RequestContext};
use docvault_storage::build_object_store;

use crate::output::{self, OutputFormat};

/// DocVault: classified document storage with an audited lifecycle
#[derive(Debug, Parser)]
#[command(name = "docvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload one or more files
    Upload(file::UploadArgs),
    /// Record a download and optionally save the content
    Download(file::DownloadArgs),
    /// Soft-delete a file
    Delete(file::DeleteArgs),
    /// Re-activate a file
    Activate(file::ToggleArgs),
    /// Deactivate a file
    Deactivate(file::ToggleArgs),
    /// Show file details
    Show(file::ShowArgs),
    /// Show the audit history of a file
    History(file::ShowArgs),
    /// List an employee's permissions
    Permissions(permissions::PermissionsArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Upload(args) => file::upload(args, &config, self.format).await,
            Commands::Download(args) => file::download(args, &config, self.format).await,
            Commands::Delete(args) => file::delete(args, &config).await,
            Commands::Activate(args) => file::toggle(args, &config, true).await,
            Commands::Deactivate(args) => file::toggle(args, &config, false).await,
            Commands::Show(args) => file::show(args, &config, self.format).await,
            Commands::History(args) => file::history(args, &config, self.format).await,
            Commands::Permissions(args) => permissions::execute(args, &config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }
}

/// Helper: wire the Postgres repositories and the configured object store
/// into a pipeline
pub async fn build_pipeline(config: &AppConfig) -> Result<IngestionPipeline, AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    let metadata: Arc<dyn MetadataRepository> = Arc::new(PgMetadataRepository::new(&db));
    let reference: Arc<dyn ReferenceRepository> = Arc::new(PgReferenceRepository::new(&db));
    let store = build_object_store(&config.storage).await?;

    tracing::debug!(
        backend = store.provider_type(),
        "Pipeline wired to object store"
    );

    Ok(IngestionPipeline::new(config, metadata, reference, store))
}

/// Helper: request context for an operator acting from this CLI
pub fn cli_context(actor_id: i32) -> RequestContext {
    RequestContext::new(actor_id).with_origin(
        None,
        Some(format!("docvault-cli/{}", env!("CARGO_PKG_VERSION"))),
    )
}

/// Helper: print every reason of a pipeline error, then convert it for exit
pub fn report(err: IngestError) -> AppError {
    for reason in err.reasons() {
        output::print_error(&reason);
    }
    if err.is_retryable() {
        output::print_warning("The operation may be retried.");
    }
    err.into()
}
