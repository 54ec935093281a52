//! FGA model types exchanged with the platform.

use crate::decision::DecisionTree;
use authctl_core::ListOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// A resource type definition and its relations.
///
/// Relation definitions are kept as opaque JSON; the platform owns their grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceType {
    /// The type name (e.g., "document").
    #[serde(rename = "type")]
    pub name: String,
    /// Relation definitions keyed by relation name.
    #[serde(default)]
    pub relations: Map<String, JsonValue>,
}

/// A versioned set of resource types, the JSON side of a schema conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTypeDocument {
    /// Schema language version.
    pub version: String,
    /// The resource types.
    pub resource_types: Vec<ResourceType>,
}

/// A resource instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource type.
    pub resource_type: String,
    /// Resource id.
    pub resource_id: String,
    /// Arbitrary metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, JsonValue>>,
}

impl Resource {
    /// Returns the `type:id` token for the resource.
    #[must_use]
    pub fn token(&self) -> String {
        format!("{}:{}", self.resource_type, self.resource_id)
    }
}

/// Filters for listing resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResources {
    /// Only resources of this type.
    pub resource_type: Option<String>,
    /// Search term.
    pub search: Option<String>,
    /// Pagination.
    pub list: ListOptions,
}

/// Response to a relation assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantReceipt {
    /// Token to pass to later checks for read-your-writes consistency.
    pub warrant_token: String,
}

/// Outcome of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResult {
    /// The subject holds the relation.
    Authorized,
    /// The subject does not hold the relation.
    NotAuthorized,
}

impl CheckResult {
    /// Returns the wire name of the result.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::NotAuthorized => "not_authorized",
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Debug information attached to checks run in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Total processing time, in nanoseconds.
    #[serde(default)]
    pub processing_time: u64,
    /// How the decision was reached.
    #[serde(default)]
    pub decision_tree: Option<DecisionTree>,
}

/// Response to a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// The outcome.
    pub result: CheckResult,
    /// Whether the match was through another relation.
    #[serde(default)]
    pub is_implicit: bool,
    /// Consistency token.
    #[serde(default)]
    pub warrant_token: Option<String>,
    /// Present in debug mode.
    #[serde(default)]
    pub debug_info: Option<DebugInfo>,
}

impl CheckResponse {
    /// Returns whether the check authorized the subject.
    #[must_use]
    pub fn authorized(&self) -> bool {
        self.result == CheckResult::Authorized
    }
}

/// One row of a query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Resource type.
    pub resource_type: String,
    /// Resource id.
    pub resource_id: String,
    /// The relation the subject holds.
    pub relation: String,
    /// Whether the relation is held through another relation.
    #[serde(default)]
    pub is_implicit: bool,
    /// Resource metadata.
    #[serde(default)]
    pub meta: Option<Map<String, JsonValue>>,
}

/// A warning produced while converting a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaWarning {
    /// Human-readable warning.
    pub message: String,
}

/// Result of converting between schema text and resource types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConversion {
    /// Schema language version.
    #[serde(default)]
    pub version: String,
    /// Conversion warnings.
    #[serde(default)]
    pub warnings: Vec<SchemaWarning>,
    /// Schema text, when converting from resource types.
    #[serde(default)]
    pub schema: Option<String>,
    /// Resource types, when converting from schema text.
    #[serde(default)]
    pub resource_types: Option<Vec<ResourceType>>,
}
