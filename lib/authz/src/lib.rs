//! Fine-grained authorization for authctl.
//!
//! This crate owns the relation-tuple mini-language used on the command line
//! (`user:john owner document:xyz`, `group:eng#member viewer folder:root`),
//! the request builders for checks and relation assignments, rendering of
//! debug decision trees, and the [`AuthorizationClient`] seam over the
//! platform's FGA endpoints.

mod client;
mod decision;
mod error;
mod request;
mod tuple;
mod types;

pub use client::{AuthorizationClient, HttpAuthorizationClient};
pub use decision::{CheckNode, Decision, DecisionTree, NodeSubject};
pub use error::AuthzError;
pub use request::{
    Assignment, AssignmentOp, CheckRequest, QueryRequest, build_assignment, build_check_request,
    build_query_request, parse_context, parse_meta,
};
pub use tuple::{ObjectRef, RelationTuple, SubjectRef, parse_subject, parse_token};
pub use types::{
    CheckResponse, CheckResult, DebugInfo, ListResources, QueryResult, Resource, ResourceType,
    ResourceTypeDocument, SchemaConversion, SchemaWarning, WarrantReceipt,
};
