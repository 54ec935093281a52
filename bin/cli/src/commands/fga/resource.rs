//! Resource create, update, list and delete.

use super::meta_cell;
use crate::error::CliError;
use crate::printer::{Printer, Table};
use authctl_authz::{AuthorizationClient, ListResources, ObjectRef, Resource, parse_meta};
use authctl_core::ListOptions;
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;

fn resource_from(token: &str, meta: Option<&str>) -> Result<Resource, Report<CliError>> {
    let object: ObjectRef = token.parse().context(CliError::InvalidArguments)?;
    let meta = meta
        .map(parse_meta)
        .transpose()
        .context(CliError::InvalidArguments)?;
    Ok(Resource {
        resource_type: object.object_type,
        resource_id: object.object_id,
        meta,
    })
}

pub(super) async fn create<W: Write>(
    client: &dyn AuthorizationClient,
    token: &str,
    meta: Option<&str>,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let resource = resource_from(token, meta)?;
    let created = client
        .create_resource(&resource)
        .await
        .context(CliError::Remote {
            operation: "creating resource",
        })?;

    match created.meta.as_ref().filter(|m| !m.is_empty()) {
        Some(meta) => {
            let meta = serde_json::to_string(meta).map_err(|e| CliError::Output {
                details: e.to_string(),
            })?;
            printer.line(format_args!("Created resource {} ({meta})", created.token()))
        }
        None => printer.line(format_args!("Created resource {}", created.token())),
    }
}

pub(super) async fn update<W: Write>(
    client: &dyn AuthorizationClient,
    token: &str,
    meta: &str,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let resource = resource_from(token, Some(meta))?;
    let updated = client
        .update_resource(&resource)
        .await
        .context(CliError::Remote {
            operation: "updating resource",
        })?;
    printer.line(format_args!("Updated resource {}", updated.token()))
}

pub(super) async fn list<W: Write>(
    client: &dyn AuthorizationClient,
    resource_type: Option<String>,
    search: Option<String>,
    list: ListOptions,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let filter = ListResources {
        resource_type,
        search,
        list,
    };
    let page = client
        .list_resources(&filter)
        .await
        .context(CliError::Remote {
            operation: "listing resources",
        })?;

    let mut table = Table::new(["Resource Type", "Resource ID", "Meta"]);
    for resource in &page.data {
        table.row([
            resource.resource_type.clone(),
            resource.resource_id.clone(),
            meta_cell(resource.meta.as_ref())?,
        ]);
    }
    printer.table(&table)?;
    printer.cursors(&page.list_metadata)
}

pub(super) async fn delete<W: Write>(
    client: &dyn AuthorizationClient,
    token: &str,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let object: ObjectRef = token.parse().context(CliError::InvalidArguments)?;
    client
        .delete_resource(&object)
        .await
        .context(CliError::Remote {
            operation: "deleting resource",
        })?;
    printer.line(format_args!("Deleted resource {object}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fga::fake::RecordingClient;
    use crate::commands::testing::{output, printer};

    #[tokio::test]
    async fn create_echoes_meta() {
        let client = RecordingClient::default();
        let mut out = printer();

        create(
            &client,
            "user:john",
            Some(r#"{"email": "john@example.com"}"#),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(
            output(out),
            "Created resource user:john ({\"email\":\"john@example.com\"})\n"
        );
        let resources = client.resources.lock().unwrap();
        assert_eq!(resources[0].resource_type, "user");
        assert_eq!(resources[0].resource_id, "john");
    }

    #[tokio::test]
    async fn create_without_meta() {
        let client = RecordingClient::default();
        let mut out = printer();

        create(&client, "tenant:acme:eu", None, &mut out).await.unwrap();

        assert_eq!(output(out), "Created resource tenant:acme:eu\n");
    }

    #[tokio::test]
    async fn malformed_token_is_rejected_before_sending() {
        let client = RecordingClient::default();
        let mut out = printer();

        let err = create(&client, "user", None, &mut out).await.unwrap_err();
        assert_eq!(err.current_context(), &CliError::InvalidArguments);

        let err = update(&client, "user:john", "[1, 2]", &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.current_context(), &CliError::InvalidArguments);

        assert!(client.resources.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_names_resource() {
        let client = RecordingClient::default();
        let mut out = printer();

        delete(&client, "document:xyz", &mut out).await.unwrap();

        assert_eq!(*client.deleted.lock().unwrap(), ["document:xyz"]);
        assert_eq!(output(out), "Deleted resource document:xyz\n");
    }
}
