//! Permission listing command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use docvault_core::config::AppConfig;
use docvault_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the permissions command
#[derive(Debug, Args)]
pub struct PermissionsArgs {
    /// Employee id
    pub employee_id: i32,
}

/// Permission display row
#[derive(Debug, Serialize, Tabled)]
struct PermissionRow {
    /// Scope: department or file
    scope: String,
    /// Department or file name
    target: String,
    /// Level
    level: String,
    /// Granted by
    granted_by: String,
}

/// Execute the permissions command
pub async fn execute(
    args: &PermissionsArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pipeline = super::build_pipeline(config).await?;
    let summary = pipeline
        .list_permissions(args.employee_id)
        .await
        .map_err(super::report)?;

    if format == OutputFormat::Json {
        output::print_json(&summary);
        return Ok(());
    }

    let employee = &summary.employee;
    output::print_kv("Employee", &employee.full_name);
    output::print_kv("Position", &employee.position);
    output::print_kv(
        "Department",
        &output::or_dash(employee.department_name.as_deref()),
    );

    let rows: Vec<PermissionRow> = summary
        .department_permissions
        .iter()
        .map(|p| PermissionRow {
            scope: "department".to_string(),
            target: p
                .department_name
                .clone()
                .unwrap_or_else(|| p.department_id.to_string()),
            level: p.permission_type.to_string(),
            granted_by: "-".to_string(),
        })
        .chain(summary.file_permissions.iter().map(|p| PermissionRow {
            scope: "file".to_string(),
            target: p.file_name.clone().unwrap_or_else(|| p.file_id.to_string()),
            level: p.permission_type.to_string(),
            granted_by: p
                .granted_by_name
                .clone()
                .unwrap_or_else(|| p.granted_by.to_string()),
        }))
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
