//! Client for the platform's fine-grained authorization endpoints.

use crate::error::AuthzError;
use crate::request::{Assignment, CheckRequest, QueryRequest};
use crate::tuple::{ObjectRef, RelationTuple, SubjectRef};
use crate::types::{
    CheckResponse, ListResources, QueryResult, Resource, ResourceType, ResourceTypeDocument,
    SchemaConversion, WarrantReceipt,
};
use async_trait::async_trait;
use authctl_api::{ApiClient, ApiRequest};
use authctl_core::{ListOptions, Page};
use rootcause::prelude::{Report, ResultExt};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, instrument};

const WARRANT_TOKEN_HEADER: &str = "Warrant-Token";

/// Authorization operations used by the command line.
///
/// Implemented over HTTP by [`HttpAuthorizationClient`]; tests substitute
/// in-memory doubles.
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    /// Lists resource types.
    async fn list_resource_types(
        &self,
        list: &ListOptions,
    ) -> Result<Page<ResourceType>, Report<AuthzError>>;

    /// Replaces the full set of resource types.
    async fn apply_resource_types(
        &self,
        resource_types: &[ResourceType],
    ) -> Result<Vec<ResourceType>, Report<AuthzError>>;

    /// Creates a resource.
    async fn create_resource(&self, resource: &Resource) -> Result<Resource, Report<AuthzError>>;

    /// Lists resources.
    async fn list_resources(
        &self,
        filter: &ListResources,
    ) -> Result<Page<Resource>, Report<AuthzError>>;

    /// Replaces a resource's metadata.
    async fn update_resource(&self, resource: &Resource) -> Result<Resource, Report<AuthzError>>;

    /// Deletes a resource and every relation assignment on it.
    async fn delete_resource(&self, resource: &ObjectRef) -> Result<(), Report<AuthzError>>;

    /// Grants or revokes a relation.
    async fn write_assignment(
        &self,
        assignment: &Assignment,
    ) -> Result<WarrantReceipt, Report<AuthzError>>;

    /// Checks whether a subject holds a relation.
    async fn check(&self, request: &CheckRequest) -> Result<CheckResponse, Report<AuthzError>>;

    /// Runs a relation query.
    async fn query(&self, request: &QueryRequest) -> Result<Page<QueryResult>, Report<AuthzError>>;

    /// Converts schema text to resource types.
    async fn convert_schema(&self, schema: &str) -> Result<SchemaConversion, Report<AuthzError>>;

    /// Converts resource types to schema text.
    async fn convert_resource_types(
        &self,
        document: &ResourceTypeDocument,
    ) -> Result<SchemaConversion, Report<AuthzError>>;
}

/// HTTP implementation of [`AuthorizationClient`].
#[derive(Debug, Clone)]
pub struct HttpAuthorizationClient {
    api: ApiClient,
}

impl HttpAuthorizationClient {
    /// Creates a client over an API transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Serialize)]
struct WireSubject<'a> {
    resource_type: &'a str,
    resource_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    relation: Option<&'a str>,
}

impl<'a> From<&'a SubjectRef> for WireSubject<'a> {
    fn from(subject: &'a SubjectRef) -> Self {
        Self {
            resource_type: &subject.object.object_type,
            resource_id: &subject.object.object_id,
            relation: subject.relation.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct WireCheck<'a> {
    resource_type: &'a str,
    resource_id: &'a str,
    relation: &'a str,
    subject: WireSubject<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a Map<String, JsonValue>>,
}

impl<'a> From<&'a RelationTuple> for WireCheck<'a> {
    fn from(tuple: &'a RelationTuple) -> Self {
        Self {
            resource_type: &tuple.resource.object_type,
            resource_id: &tuple.resource.object_id,
            relation: &tuple.relation,
            subject: (&tuple.subject).into(),
            context: tuple.context.as_ref(),
        }
    }
}

#[derive(Serialize)]
struct WireCheckRequest<'a> {
    checks: Vec<WireCheck<'a>>,
    debug: bool,
}

#[derive(Serialize)]
struct WireAssignment<'a> {
    op: &'static str,
    resource_type: &'a str,
    resource_id: &'a str,
    relation: &'a str,
    subject: WireSubject<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy: Option<&'a str>,
}

#[derive(Serialize)]
struct WireMeta<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a Map<String, JsonValue>>,
}

#[derive(Serialize)]
struct WireSchema<'a> {
    schema: &'a str,
}

/// Ids may contain `#`, `?` or `/`, so each segment is percent-encoded.
fn resource_path(resource_type: &str, resource_id: &str) -> String {
    format!(
        "/fga/v1/resources/{}/{}",
        urlencoding::encode(resource_type),
        urlencoding::encode(resource_id)
    )
}

#[async_trait]
impl AuthorizationClient for HttpAuthorizationClient {
    #[instrument(skip(self))]
    async fn list_resource_types(
        &self,
        list: &ListOptions,
    ) -> Result<Page<ResourceType>, Report<AuthzError>> {
        let request = ApiRequest::get("/fga/v1/resource-types").query_pairs(list.to_query());
        let page: Page<ResourceType> = self
            .api
            .send(request)
            .await
            .context(AuthzError::RequestFailed {
                operation: "list resource types",
            })?;

        debug!(count = page.data.len(), "resource types listed");
        Ok(page)
    }

    #[instrument(skip(self, resource_types), fields(count = resource_types.len()))]
    async fn apply_resource_types(
        &self,
        resource_types: &[ResourceType],
    ) -> Result<Vec<ResourceType>, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed {
            operation: "apply resource types",
        };
        let request = ApiRequest::put("/fga/v1/resource-types")
            .json(resource_types)
            .context(failed())?;
        let applied = self.api.send(request).await.context(failed())?;

        debug!("resource types applied");
        Ok(applied)
    }

    #[instrument(skip(self, resource), fields(resource = %resource.token()))]
    async fn create_resource(&self, resource: &Resource) -> Result<Resource, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed {
            operation: "create resource",
        };
        let request = ApiRequest::post("/fga/v1/resources")
            .json(resource)
            .context(failed())?;
        let created = self.api.send(request).await.context(failed())?;

        debug!("resource created");
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_resources(
        &self,
        filter: &ListResources,
    ) -> Result<Page<Resource>, Report<AuthzError>> {
        let mut request = ApiRequest::get("/fga/v1/resources");
        if let Some(resource_type) = filter.resource_type.as_deref().filter(|t| !t.is_empty()) {
            request = request.query("resource_type", resource_type);
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            request = request.query("search", search);
        }
        let request = request.query_pairs(filter.list.to_query());

        let page: Page<Resource> =
            self.api
                .send(request)
                .await
                .context(AuthzError::RequestFailed {
                    operation: "list resources",
                })?;

        debug!(count = page.data.len(), "resources listed");
        Ok(page)
    }

    #[instrument(skip(self, resource), fields(resource = %resource.token()))]
    async fn update_resource(&self, resource: &Resource) -> Result<Resource, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed {
            operation: "update resource",
        };
        let request = ApiRequest::put(resource_path(&resource.resource_type, &resource.resource_id))
            .json(&WireMeta {
                meta: resource.meta.as_ref(),
            })
            .context(failed())?;
        let updated = self.api.send(request).await.context(failed())?;

        debug!("resource updated");
        Ok(updated)
    }

    #[instrument(skip(self, resource), fields(resource = %resource))]
    async fn delete_resource(&self, resource: &ObjectRef) -> Result<(), Report<AuthzError>> {
        let request = ApiRequest::delete(resource_path(&resource.object_type, &resource.object_id));
        self.api
            .send_empty(request)
            .await
            .context(AuthzError::RequestFailed {
                operation: "delete resource",
            })?;

        debug!("resource deleted");
        Ok(())
    }

    #[instrument(skip(self, assignment), fields(op = %assignment.op, tuple = %assignment.tuple))]
    async fn write_assignment(
        &self,
        assignment: &Assignment,
    ) -> Result<WarrantReceipt, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed {
            operation: "write relation assignment",
        };
        let tuple = &assignment.tuple;
        let body = WireAssignment {
            op: assignment.op.as_str(),
            resource_type: &tuple.resource.object_type,
            resource_id: &tuple.resource.object_id,
            relation: &tuple.relation,
            subject: (&tuple.subject).into(),
            policy: tuple.policy.as_deref(),
        };
        let request = ApiRequest::post("/fga/v1/warrants")
            .json(&body)
            .context(failed())?;
        let receipt: WarrantReceipt = self.api.send(request).await.context(failed())?;

        debug!("relation assignment written");
        Ok(receipt)
    }

    #[instrument(skip(self, request), fields(tuple = %request.tuple, debug = request.debug))]
    async fn check(&self, request: &CheckRequest) -> Result<CheckResponse, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed { operation: "check" };
        let body = WireCheckRequest {
            checks: vec![(&request.tuple).into()],
            debug: request.debug,
        };
        let api_request = ApiRequest::post("/fga/v1/check")
            .optional_header(WARRANT_TOKEN_HEADER, request.warrant_token.as_deref())
            .json(&body)
            .context(failed())?;
        let response: CheckResponse = self.api.send(api_request).await.context(failed())?;

        debug!(result = %response.result, "check evaluated");
        Ok(response)
    }

    #[instrument(skip(self, request), fields(query = %request.query))]
    async fn query(&self, request: &QueryRequest) -> Result<Page<QueryResult>, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed { operation: "query" };
        let mut api_request = ApiRequest::get("/fga/v1/query")
            .query("q", request.query.as_str())
            .optional_header(WARRANT_TOKEN_HEADER, request.warrant_token.as_deref());
        if let Some(context) = &request.context {
            let context = serde_json::to_string(context).map_err(|_| failed())?;
            api_request = api_request.query("context", context);
        }
        let api_request = api_request.query_pairs(request.list.to_query());

        let page: Page<QueryResult> = self.api.send(api_request).await.context(failed())?;

        debug!(count = page.data.len(), "query evaluated");
        Ok(page)
    }

    #[instrument(skip(self, schema), fields(bytes = schema.len()))]
    async fn convert_schema(&self, schema: &str) -> Result<SchemaConversion, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed {
            operation: "convert schema",
        };
        let request = ApiRequest::post("/fga/v1/schema/convert")
            .json(&WireSchema { schema })
            .context(failed())?;
        let conversion = self.api.send(request).await.context(failed())?;

        debug!("schema converted to resource types");
        Ok(conversion)
    }

    #[instrument(skip(self, document), fields(version = %document.version))]
    async fn convert_resource_types(
        &self,
        document: &ResourceTypeDocument,
    ) -> Result<SchemaConversion, Report<AuthzError>> {
        let failed = || AuthzError::RequestFailed {
            operation: "convert resource types",
        };
        let request = ApiRequest::post("/fga/v1/schema/convert")
            .json(document)
            .context(failed())?;
        let conversion = self.api.send(request).await.context(failed())?;

        debug!("resource types converted to schema");
        Ok(conversion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{AssignmentOp, build_assignment, build_check_request, build_query_request};
    use crate::types::CheckResult;
    use authctl_api::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpAuthorizationClient {
        let api = ApiClient::new(ApiConfig {
            api_key: "sk_test".to_string(),
            endpoint: Some(server.uri()),
            timeout: None,
        })
        .unwrap();
        HttpAuthorizationClient::new(api)
    }

    #[tokio::test]
    async fn check_sends_tuple_context_and_warrant_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fga/v1/check"))
            .and(header("warrant-token", "tok_1"))
            .and(body_json(json!({
                "checks": [{
                    "resource_type": "document",
                    "resource_id": "xyz",
                    "relation": "viewer",
                    "subject": {"resource_type": "group", "resource_id": "eng", "relation": "member"},
                    "context": {"organization": "acme"}
                }],
                "debug": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "authorized",
                "is_implicit": true,
                "warrant_token": "tok_2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = build_check_request(
            "group:eng#member",
            "viewer",
            "document:xyz",
            Some(r#"{"organization":"acme"}"#),
            Some("tok_1"),
            false,
        )
        .unwrap();
        let response = client_for(&server).check(&request).await.unwrap();
        assert_eq!(response.result, CheckResult::Authorized);
        assert!(response.is_implicit);
    }

    #[tokio::test]
    async fn assignment_posts_warrant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fga/v1/warrants"))
            .and(body_json(json!({
                "op": "create",
                "resource_type": "document",
                "resource_id": "xyz",
                "relation": "owner",
                "subject": {"resource_type": "user", "resource_id": "john"},
                "policy": "region == 'eu'"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"warrant_token": "tok_9"})),
            )
            .mount(&server)
            .await;

        let assignment = build_assignment(
            AssignmentOp::Create,
            "user:john",
            "owner",
            "document:xyz",
            Some("region == 'eu'"),
        )
        .unwrap();
        let receipt = client_for(&server)
            .write_assignment(&assignment)
            .await
            .unwrap();
        assert_eq!(receipt.warrant_token, "tok_9");
    }

    #[tokio::test]
    async fn query_passes_context_as_json_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fga/v1/query"))
            .and(query_param("q", "select document where user:john is owner"))
            .and(query_param("context", r#"{"tier":"gold"}"#))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "resource_type": "document",
                    "resource_id": "xyz",
                    "relation": "owner",
                    "is_implicit": false
                }],
                "list_metadata": {"after": "cur_1"}
            })))
            .mount(&server)
            .await;

        let request = build_query_request(
            "select document where user:john is owner",
            Some(r#"{"tier":"gold"}"#),
            None,
            ListOptions {
                limit: Some(5),
                ..ListOptions::default()
            },
        )
        .unwrap();
        let page = client_for(&server).query(&request).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.list_metadata.after.as_deref(), Some("cur_1"));
    }

    #[tokio::test]
    async fn resource_update_and_delete_use_resource_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/fga/v1/resources/user/john"))
            .and(body_json(json!({"meta": {"email": "john@example.com"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resource_type": "user",
                "resource_id": "john",
                "meta": {"email": "john@example.com"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/fga/v1/resources/user/john"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let meta = crate::request::parse_meta(r#"{"email":"john@example.com"}"#).unwrap();
        let updated = client
            .update_resource(&Resource {
                resource_type: "user".to_string(),
                resource_id: "john".to_string(),
                meta: Some(meta),
            })
            .await
            .unwrap();
        assert_eq!(updated.token(), "user:john");

        client
            .delete_resource(&ObjectRef::new("user", "john"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn resource_path_encodes_reserved_characters() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/fga/v1/resources/document/plan%23v2%3Fdraft%2F1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let resource: ObjectRef = "document:plan#v2?draft/1".parse().unwrap();
        assert_eq!(resource.object_id, "plan#v2?draft/1");
        client_for(&server)
            .delete_resource(&resource)
            .await
            .unwrap();
    }

    #[test]
    fn resource_path_leaves_plain_ids_alone() {
        assert_eq!(resource_path("user", "john"), "/fga/v1/resources/user/john");
        assert_eq!(
            resource_path("document", "plan#v2"),
            "/fga/v1/resources/document/plan%23v2"
        );
    }

    #[tokio::test]
    async fn remote_failure_is_annotated_with_operation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fga/v1/schema/convert"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "invalid schema",
                "errors": ["1:5 unexpected token"]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .convert_schema("type user")
            .await
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &AuthzError::RequestFailed {
                operation: "convert schema"
            }
        );
        let rendered = err.to_string();
        assert!(rendered.contains("invalid schema"), "{rendered}");
        assert!(rendered.contains("1:5 unexpected token"), "{rendered}");
    }
}
