//! Resource type listing and bulk replacement.

use super::read_file_or;
use crate::error::CliError;
use crate::printer::{Printer, Table};
use authctl_authz::{AuthorizationClient, ResourceType};
use authctl_core::ListOptions;
use rootcause::prelude::{Report, ResultExt};
use std::io::{Read, Write};
use std::path::Path;

pub(super) async fn list<W: Write>(
    client: &dyn AuthorizationClient,
    options: ListOptions,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let page = client
        .list_resource_types(&options)
        .await
        .context(CliError::Remote {
            operation: "listing resource types",
        })?;

    let mut table = Table::new(["Resource Type"]);
    for resource_type in &page.data {
        table.row([resource_type.name.as_str()]);
    }
    printer.table(&table)?;
    printer.cursors(&page.list_metadata)
}

/// Replaces every resource type with the JSON array read from `file`, or from
/// `stdin` when no file is given.
pub(super) async fn apply<W: Write>(
    client: &dyn AuthorizationClient,
    file: Option<&Path>,
    stdin: impl Read,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let input = read_file_or(file, stdin)?;
    let resource_types: Vec<ResourceType> =
        serde_json::from_str(&input).map_err(|e| CliError::ReadInput {
            source: file.map_or_else(|| "stdin".to_string(), |p| p.display().to_string()),
            details: e.to_string(),
        })?;

    client
        .apply_resource_types(&resource_types)
        .await
        .context(CliError::Remote {
            operation: "applying resource types",
        })?;
    printer.line("Resource types updated")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fga::fake::RecordingClient;
    use crate::commands::testing::{output, printer};
    use std::io::Cursor;

    #[tokio::test]
    async fn apply_reads_stdin() {
        let client = RecordingClient::default();
        let stdin = Cursor::new(
            r#"[{"type": "user", "relations": {}}, {"type": "document", "relations": {"owner": {}}}]"#,
        );
        let mut out = printer();

        apply(&client, None, stdin, &mut out).await.unwrap();

        let applied = client.applied.lock().unwrap();
        let names: Vec<&str> = applied[0].iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["user", "document"]);
        assert_eq!(output(out), "Resource types updated\n");
    }

    #[tokio::test]
    async fn apply_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("types.json");
        std::fs::write(&path, r#"[{"type": "tenant"}]"#).unwrap();
        let client = RecordingClient::default();
        let mut out = printer();

        apply(&client, Some(path.as_path()), std::io::empty(), &mut out)
            .await
            .unwrap();

        assert_eq!(client.applied.lock().unwrap()[0][0].name, "tenant");
    }

    #[tokio::test]
    async fn apply_rejects_invalid_json() {
        let client = RecordingClient::default();
        let mut out = printer();

        let err = apply(&client, None, Cursor::new("{not json"), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err.current_context(),
            CliError::ReadInput { source, .. } if source == "stdin"
        ));
        assert!(client.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_prints_names() {
        let mut client = RecordingClient::default();
        client.resource_types.data = vec![ResourceType {
            name: "document".to_string(),
            relations: serde_json::Map::new(),
        }];
        let mut out = printer();

        list(&client, ListOptions::default(), &mut out).await.unwrap();

        let output = output(out);
        assert!(output.contains("│ document      │"));
        assert!(output.ends_with("Before: \nAfter: \n"));
    }
}
