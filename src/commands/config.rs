//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;
use docvault_database::connection::mask_password;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file merged with environment)
    Show,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.database.url = mask_password(&shown.database.url);
            if !shown.storage.s3.secret_key.is_empty() {
                shown.storage.s3.secret_key = "****".to_string();
            }

            match format {
                OutputFormat::Json => output::print_json(&shown),
                OutputFormat::Table => {
                    println!("Configuration from '{config_path}':");
                    output::print_kv("Database", &or_unset(&shown.database.url));
                    output::print_kv(
                        "Pool",
                        &format!(
                            "{}..{} connections",
                            shown.database.min_connections, shown.database.max_connections
                        ),
                    );
                    output::print_kv("Storage backend", &format!("{:?}", shown.storage.backend));
                    output::print_kv("Bucket prefix", &shown.storage.bucket_prefix);
                    output::print_kv("Local root", &shown.storage.local.root_path);
                    output::print_kv("S3 endpoint", &or_unset(&shown.storage.s3.endpoint));
                    output::print_kv(
                        "Max upload",
                        &docvault_entity::file::format_file_size(shown.upload.max_file_size_bytes),
                    );
                    output::print_kv(
                        "Download link TTL",
                        &format!("{}s", shown.upload.download_link_ttl_seconds),
                    );
                    output::print_kv(
                        "Logging",
                        &format!("{} ({})", shown.logging.level, shown.logging.format),
                    );
                }
            }
        }
    }

    Ok(())
}

fn or_unset(value: &str) -> String {
    if value.is_empty() {
        "(not set)".to_string()
    } else {
        value.to_string()
    }
}
