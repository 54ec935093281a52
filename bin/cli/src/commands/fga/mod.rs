//! `authctl fga`: resource types, resources, relations and schemas.

pub mod relation;
pub mod resource;
pub mod resource_type;
pub mod schema;

use crate::cli::{FgaCommand, RelationCommand, ResourceCommand, ResourceTypeCommand, SchemaCommand};
use crate::error::CliError;
use crate::printer::{Printer, to_pretty_json};
use authctl_authz::AuthorizationClient;
use rootcause::prelude::Report;
use serde_json::{Map, Value as JsonValue};
use std::io::{self, Read, Write};
use std::path::Path;

/// Runs an FGA command.
///
/// # Errors
///
/// Returns [`CliError::InvalidArguments`] for malformed tuples or JSON
/// arguments and [`CliError::Remote`] when the platform request fails. See
/// the individual commands for the rest.
pub async fn run<W: Write>(
    client: &dyn AuthorizationClient,
    command: FgaCommand,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    match command {
        FgaCommand::ResourceType(ResourceTypeCommand::List(list)) => {
            resource_type::list(client, list.into(), printer).await
        }
        FgaCommand::ResourceType(ResourceTypeCommand::Apply { file }) => {
            resource_type::apply(client, file.as_deref(), io::stdin(), printer).await
        }
        FgaCommand::Resource(ResourceCommand::Create { resource, meta }) => {
            resource::create(client, &resource, meta.as_deref(), printer).await
        }
        FgaCommand::Resource(ResourceCommand::Update { resource, meta }) => {
            resource::update(client, &resource, &meta, printer).await
        }
        FgaCommand::Resource(ResourceCommand::List {
            resource_type,
            search,
            list,
        }) => resource::list(client, resource_type, search, list.into(), printer).await,
        FgaCommand::Resource(ResourceCommand::Delete { resource }) => {
            resource::delete(client, &resource, printer).await
        }
        FgaCommand::Relation(RelationCommand::Assign {
            subject,
            relation,
            resource,
            policy,
        }) => {
            relation::assign(
                client,
                &subject,
                &relation,
                &resource,
                policy.as_deref(),
                printer,
            )
            .await
        }
        FgaCommand::Relation(RelationCommand::Remove {
            subject,
            relation,
            resource,
        }) => relation::remove(client, &subject, &relation, &resource, printer).await,
        FgaCommand::Relation(RelationCommand::Check(args)) => {
            relation::check(client, args, printer).await
        }
        FgaCommand::Relation(RelationCommand::Query {
            query,
            context,
            warrant_token,
            list,
        }) => {
            relation::query(
                client,
                &query,
                context.as_deref(),
                warrant_token.as_deref(),
                list.into(),
                printer,
            )
            .await
        }
        FgaCommand::Schema(SchemaCommand::Convert { file, to, output }) => {
            schema::convert(client, &file, to, output, printer).await
        }
        FgaCommand::Schema(SchemaCommand::Apply {
            file,
            verbose,
            strict,
        }) => schema::apply(client, &file, verbose, strict, printer).await,
    }
}

/// Reads a whole file as text.
fn read_file(path: &Path) -> Result<String, Report<CliError>> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::ReadInput {
            source: path.display().to_string(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Reads `path` when given, otherwise everything on `stdin`.
fn read_file_or(path: Option<&Path>, mut stdin: impl Read) -> Result<String, Report<CliError>> {
    match path {
        Some(path) => read_file(path),
        None => {
            let mut input = String::new();
            stdin.read_to_string(&mut input).map_err(|e| CliError::ReadInput {
                source: "stdin".to_string(),
                details: e.to_string(),
            })?;
            Ok(input)
        }
    }
}

/// Renders optional metadata for a table cell.
fn meta_cell(meta: Option<&Map<String, JsonValue>>) -> Result<String, Report<CliError>> {
    match meta {
        Some(meta) if !meta.is_empty() => to_pretty_json(meta),
        _ => Ok(String::new()),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use async_trait::async_trait;
    use authctl_authz::{
        Assignment, AuthorizationClient, AuthzError, CheckRequest, CheckResponse, CheckResult,
        ListResources, QueryRequest, QueryResult, Resource, ResourceType, ResourceTypeDocument,
        SchemaConversion, WarrantReceipt,
    };
    use authctl_core::{ListOptions, Page};
    use rootcause::prelude::Report;
    use std::sync::Mutex;

    /// Records every request and answers with canned responses.
    pub struct RecordingClient {
        pub assignments: Mutex<Vec<Assignment>>,
        pub checks: Mutex<Vec<CheckRequest>>,
        pub queries: Mutex<Vec<QueryRequest>>,
        pub resources: Mutex<Vec<Resource>>,
        pub deleted: Mutex<Vec<String>>,
        pub applied: Mutex<Vec<Vec<ResourceType>>>,
        pub converted: Mutex<Vec<String>>,
        pub check_response: CheckResponse,
        pub conversion: SchemaConversion,
        pub query_results: Page<QueryResult>,
        pub resource_types: Page<ResourceType>,
    }

    impl Default for RecordingClient {
        fn default() -> Self {
            Self {
                assignments: Mutex::default(),
                checks: Mutex::default(),
                queries: Mutex::default(),
                resources: Mutex::default(),
                deleted: Mutex::default(),
                applied: Mutex::default(),
                converted: Mutex::default(),
                check_response: CheckResponse {
                    result: CheckResult::Authorized,
                    is_implicit: false,
                    warrant_token: None,
                    debug_info: None,
                },
                conversion: SchemaConversion {
                    version: "0.3".to_string(),
                    warnings: Vec::new(),
                    schema: None,
                    resource_types: None,
                },
                query_results: Page::default(),
                resource_types: Page::default(),
            }
        }
    }

    #[async_trait]
    impl AuthorizationClient for RecordingClient {
        async fn list_resource_types(
            &self,
            _options: &ListOptions,
        ) -> Result<Page<ResourceType>, Report<AuthzError>> {
            Ok(self.resource_types.clone())
        }

        async fn apply_resource_types(
            &self,
            resource_types: &[ResourceType],
        ) -> Result<Vec<ResourceType>, Report<AuthzError>> {
            self.applied.lock().unwrap().push(resource_types.to_vec());
            Ok(resource_types.to_vec())
        }

        async fn create_resource(&self, resource: &Resource) -> Result<Resource, Report<AuthzError>> {
            self.resources.lock().unwrap().push(resource.clone());
            Ok(resource.clone())
        }

        async fn list_resources(
            &self,
            _filter: &ListResources,
        ) -> Result<Page<Resource>, Report<AuthzError>> {
            Ok(Page {
                data: self.resources.lock().unwrap().clone(),
                ..Page::default()
            })
        }

        async fn update_resource(&self, resource: &Resource) -> Result<Resource, Report<AuthzError>> {
            self.resources.lock().unwrap().push(resource.clone());
            Ok(resource.clone())
        }

        async fn delete_resource(
            &self,
            resource: &authctl_authz::ObjectRef,
        ) -> Result<(), Report<AuthzError>> {
            self.deleted.lock().unwrap().push(resource.to_string());
            Ok(())
        }

        async fn write_assignment(
            &self,
            assignment: &Assignment,
        ) -> Result<WarrantReceipt, Report<AuthzError>> {
            self.assignments.lock().unwrap().push(assignment.clone());
            Ok(WarrantReceipt {
                warrant_token: "tok_1".to_string(),
            })
        }

        async fn check(&self, request: &CheckRequest) -> Result<CheckResponse, Report<AuthzError>> {
            self.checks.lock().unwrap().push(request.clone());
            Ok(self.check_response.clone())
        }

        async fn query(
            &self,
            request: &QueryRequest,
        ) -> Result<Page<QueryResult>, Report<AuthzError>> {
            self.queries.lock().unwrap().push(request.clone());
            Ok(self.query_results.clone())
        }

        async fn convert_schema(&self, schema: &str) -> Result<SchemaConversion, Report<AuthzError>> {
            self.converted.lock().unwrap().push(schema.to_string());
            Ok(self.conversion.clone())
        }

        async fn convert_resource_types(
            &self,
            document: &ResourceTypeDocument,
        ) -> Result<SchemaConversion, Report<AuthzError>> {
            self.converted.lock().unwrap().push(document.version.clone());
            Ok(self.conversion.clone())
        }
    }
}
