//! Schema conversion and application.

use super::read_file;
use crate::cli::{ConvertTo, OutputStyle};
use crate::error::CliError;
use crate::printer::Printer;
use authctl_authz::{AuthorizationClient, ResourceTypeDocument, SchemaConversion};
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub(super) async fn convert<W: Write>(
    client: &dyn AuthorizationClient,
    file: &Path,
    to: ConvertTo,
    output: OutputStyle,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let input = read_file(file)?;
    let remote = CliError::Remote {
        operation: "converting schema",
    };

    let conversion = match to {
        ConvertTo::Json => client.convert_schema(&input).await.context(remote)?,
        ConvertTo::Schema => {
            let document: ResourceTypeDocument =
                serde_json::from_str(&input).map_err(|e| CliError::ReadInput {
                    source: file.display().to_string(),
                    details: e.to_string(),
                })?;
            client
                .convert_resource_types(&document)
                .await
                .context(remote)?
        }
    };

    match output {
        OutputStyle::Pretty => print_pretty(&conversion, printer),
        OutputStyle::Raw => match &conversion.schema {
            Some(schema) => printer.line(schema),
            None => printer.json(&conversion.resource_types.unwrap_or_default()),
        },
    }
}

fn print_pretty<W: Write>(
    conversion: &SchemaConversion,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    printer.line("Version:")?;
    printer.line(&conversion.version)?;
    printer.line("")?;

    if !conversion.warnings.is_empty() {
        printer.line("Warnings:")?;
        for warning in &conversion.warnings {
            printer.line(&warning.message)?;
        }
        printer.line("")?;
    }
    if let Some(schema) = &conversion.schema {
        printer.line("Schema:")?;
        printer.line(schema)?;
    }
    if let Some(resource_types) = &conversion.resource_types {
        printer.line("Resource Types:")?;
        printer.json(resource_types)?;
    }
    Ok(())
}

/// Converts a schema file and replaces every resource type with the result.
///
/// Warnings are printed; with `strict` they abort before anything is applied.
pub(super) async fn apply<W: Write>(
    client: &dyn AuthorizationClient,
    file: &Path,
    verbose: bool,
    strict: bool,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let input = read_file(file)?;
    let conversion = client
        .convert_schema(&input)
        .await
        .context(CliError::Remote {
            operation: "converting schema",
        })?;

    if !conversion.warnings.is_empty() {
        printer.line("Warnings:")?;
        for warning in &conversion.warnings {
            printer.line(&warning.message)?;
        }
        printer.line("")?;
        if strict {
            return Err(CliError::SchemaWarnings {
                count: conversion.warnings.len(),
            }
            .into());
        }
    }

    let resource_types = conversion.resource_types.unwrap_or_default();
    printer.line("applying schema...")?;
    if verbose {
        printer.json(&resource_types)?;
    }

    client
        .apply_resource_types(&resource_types)
        .await
        .context(CliError::Remote {
            operation: "applying schema",
        })?;
    info!(count = resource_types.len(), "schema applied");
    printer.line("Schema applied")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fga::fake::RecordingClient;
    use crate::commands::testing::{output, printer};
    use authctl_authz::{ResourceType, SchemaWarning};
    use std::path::PathBuf;

    fn schema_file(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("schema.txt");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn document_type() -> ResourceType {
        ResourceType {
            name: "document".to_string(),
            relations: serde_json::json!({"owner": {}})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn convert_pretty_prints_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = schema_file(&dir, "version 0.3\ntype document\n");
        let mut client = RecordingClient::default();
        client.conversion.warnings = vec![SchemaWarning {
            message: "unused relation".to_string(),
        }];
        client.conversion.resource_types = Some(vec![ResourceType {
            name: "user".to_string(),
            relations: serde_json::Map::new(),
        }]);
        let mut out = printer();

        convert(&client, &path, ConvertTo::Json, OutputStyle::Pretty, &mut out)
            .await
            .unwrap();

        assert_eq!(
            *client.converted.lock().unwrap(),
            ["version 0.3\ntype document\n"]
        );
        let output = output(out);
        assert!(output.starts_with("Version:\n0.3\n\nWarnings:\nunused relation\n\nResource Types:\n["));
        assert!(output.contains("\"type\": \"user\""));
    }

    #[tokio::test]
    async fn convert_raw_prints_schema_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = schema_file(
            &dir,
            r#"{"version": "0.3", "resource_types": [{"type": "user", "relations": {}}]}"#,
        );
        let mut client = RecordingClient::default();
        client.conversion.schema = Some("version 0.3\n\ntype user".to_string());
        let mut out = printer();

        convert(&client, &path, ConvertTo::Schema, OutputStyle::Raw, &mut out)
            .await
            .unwrap();

        assert_eq!(output(out), "version 0.3\n\ntype user\n");
    }

    #[tokio::test]
    async fn convert_missing_file_fails() {
        let client = RecordingClient::default();
        let mut out = printer();

        let err = convert(
            &client,
            Path::new("/nonexistent/schema.txt"),
            ConvertTo::Json,
            OutputStyle::Pretty,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(matches!(err.current_context(), CliError::ReadInput { .. }));
    }

    #[tokio::test]
    async fn apply_applies_converted_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = schema_file(&dir, "version 0.3\ntype document\n");
        let mut client = RecordingClient::default();
        client.conversion.resource_types = Some(vec![document_type()]);
        let mut out = printer();

        apply(&client, &path, true, false, &mut out).await.unwrap();

        assert_eq!(*client.applied.lock().unwrap(), [vec![document_type()]]);
        let output = output(out);
        assert!(output.starts_with("applying schema...\n["));
        assert!(output.ends_with("Schema applied\n"));
    }

    #[tokio::test]
    async fn strict_apply_stops_on_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let path = schema_file(&dir, "version 0.3\ntype document\n");
        let mut client = RecordingClient::default();
        client.conversion.resource_types = Some(vec![document_type()]);
        client.conversion.warnings = vec![SchemaWarning {
            message: "unused relation".to_string(),
        }];
        let mut out = printer();

        let err = apply(&client, &path, false, true, &mut out)
            .await
            .unwrap_err();

        assert_eq!(
            err.current_context(),
            &CliError::SchemaWarnings { count: 1 }
        );
        assert!(client.applied.lock().unwrap().is_empty());
        assert_eq!(output(out), "Warnings:\nunused relation\n\n");
    }
}
