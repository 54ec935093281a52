//! Builders turning command-line arguments into authorization requests.
//!
//! All functions here are pure: they parse and validate, nothing is sent.

use crate::error::AuthzError;
use crate::tuple::{ObjectRef, RelationTuple, parse_subject};
use authctl_core::ListOptions;
use rootcause::prelude::Report;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Parses a JSON object used as policy evaluation context.
///
/// # Errors
///
/// Returns [`AuthzError::InvalidContext`] for malformed JSON or a JSON value
/// that is not an object.
pub fn parse_context(input: &str) -> Result<Map<String, JsonValue>, Report<AuthzError>> {
    parse_object(input).map_err(|details| {
        AuthzError::InvalidContext {
            input: input.to_string(),
            details,
        }
        .into()
    })
}

/// Parses a JSON object used as resource metadata.
///
/// # Errors
///
/// Returns [`AuthzError::InvalidMeta`] for malformed JSON or a JSON value
/// that is not an object.
pub fn parse_meta(input: &str) -> Result<Map<String, JsonValue>, Report<AuthzError>> {
    parse_object(input).map_err(|details| {
        AuthzError::InvalidMeta {
            input: input.to_string(),
            details,
        }
        .into()
    })
}

fn parse_object(input: &str) -> Result<Map<String, JsonValue>, String> {
    match serde_json::from_str::<JsonValue>(input) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// A single check: does the subject hold the relation on the resource?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// The tuple being checked, including any context.
    pub tuple: RelationTuple,
    /// Consistency token from an earlier write.
    pub warrant_token: Option<String>,
    /// Request a decision tree in the response.
    pub debug: bool,
}

/// Builds a check request from command-line tokens.
///
/// # Errors
///
/// Returns [`AuthzError::MalformedTuple`] for a bad subject, relation or
/// resource token and [`AuthzError::InvalidContext`] when `context_json` is not a JSON object.
pub fn build_check_request(
    subject: &str,
    relation: &str,
    resource: &str,
    context_json: Option<&str>,
    warrant_token: Option<&str>,
    debug: bool,
) -> Result<CheckRequest, Report<AuthzError>> {
    let subject = parse_subject(subject)?;
    let resource: ObjectRef = resource.parse()?;

    let mut tuple = RelationTuple::new(subject, parse_relation(relation)?, resource);
    tuple.context = context_json.map(parse_context).transpose()?;

    Ok(CheckRequest {
        tuple,
        warrant_token: non_empty(warrant_token),
        debug,
    })
}

/// Whether a relation assignment grants or revokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentOp {
    /// Grant the relation.
    Create,
    /// Revoke the relation.
    Delete,
}

impl AssignmentOp {
    /// Returns the wire name of the operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AssignmentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A relation assignment (warrant) to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Grant or revoke.
    pub op: AssignmentOp,
    /// The tuple, with its optional policy.
    pub tuple: RelationTuple,
}

/// Builds a relation assignment from command-line tokens.
///
/// The policy is passed through untouched; the platform validates it.
///
/// # Errors
///
/// Returns [`AuthzError::MalformedTuple`] for a bad subject, relation or
/// resource token.
pub fn build_assignment(
    op: AssignmentOp,
    subject: &str,
    relation: &str,
    resource: &str,
    policy: Option<&str>,
) -> Result<Assignment, Report<AuthzError>> {
    let subject = parse_subject(subject)?;
    let resource: ObjectRef = resource.parse()?;

    let mut tuple = RelationTuple::new(subject, parse_relation(relation)?, resource);
    tuple.policy = non_empty(policy);

    Ok(Assignment { op, tuple })
}

/// A query over the relation graph, e.g. `select document where user:john is owner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// The query text.
    pub query: String,
    /// Variables available to policies while evaluating the query.
    pub context: Option<Map<String, JsonValue>>,
    /// Consistency token from an earlier write.
    pub warrant_token: Option<String>,
    /// Pagination.
    pub list: ListOptions,
}

/// Builds a query request.
///
/// # Errors
///
/// Returns [`AuthzError::InvalidContext`] when `context_json` is not a JSON object.
pub fn build_query_request(
    query: &str,
    context_json: Option<&str>,
    warrant_token: Option<&str>,
    list: ListOptions,
) -> Result<QueryRequest, Report<AuthzError>> {
    Ok(QueryRequest {
        query: query.trim().to_string(),
        context: context_json.map(parse_context).transpose()?,
        warrant_token: non_empty(warrant_token),
        list,
    })
}

/// A relation is a single non-empty word.
fn parse_relation(relation: &str) -> Result<&str, Report<AuthzError>> {
    let relation = relation.trim();
    let reason = if relation.is_empty() {
        "missing relation"
    } else if relation.contains(char::is_whitespace) {
        "relation contains whitespace"
    } else {
        return Ok(relation);
    };
    Err(AuthzError::MalformedTuple {
        token: relation.to_string(),
        reason,
    }
    .into())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_request_round_trips_through_display() {
        let request =
            build_check_request("user:john", "owner", "document:xyz", None, None, false).unwrap();
        let formatted = request.tuple.to_string();
        assert_eq!(formatted, "user:john owner document:xyz");
        assert_eq!(formatted.parse::<RelationTuple>().unwrap(), request.tuple);
    }

    #[test]
    fn check_request_keeps_subject_relation() {
        let request =
            build_check_request("group:eng#member", "viewer", "folder:root", None, None, true)
                .unwrap();
        assert_eq!(request.tuple.to_string(), "group:eng#member viewer folder:root");
        assert!(request.debug);
    }

    #[test]
    fn check_request_appends_context() {
        let request = build_check_request(
            "user:john",
            "owner",
            "document:xyz",
            Some(r#"{"organization":"acme"}"#),
            Some("tok_1"),
            false,
        )
        .unwrap();
        let formatted = request.tuple.to_string();
        assert_eq!(
            formatted,
            r#"user:john owner document:xyz '{"organization":"acme"}'"#
        );
        assert_eq!(request.warrant_token.as_deref(), Some("tok_1"));
        assert_eq!(formatted.parse::<RelationTuple>().unwrap(), request.tuple);
    }

    #[test]
    fn check_request_rejects_malformed_context() {
        for context in ["{not json", "[1, 2]", "\"acme\""] {
            let err = build_check_request(
                "user:john",
                "owner",
                "document:xyz",
                Some(context),
                None,
                false,
            )
            .unwrap_err();
            assert!(
                matches!(err.current_context(), AuthzError::InvalidContext { .. }),
                "context {context:?}"
            );
        }
    }

    #[test]
    fn check_request_rejects_malformed_tokens() {
        let err = build_check_request("john", "owner", "document:xyz", None, None, false)
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            AuthzError::MalformedTuple { token, .. } if token == "john"
        ));

        let err = build_check_request("user:john", "owner", "documentxyz", None, None, false)
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            AuthzError::MalformedTuple { token, .. } if token == "documentxyz"
        ));
    }

    #[test]
    fn check_request_rejects_missing_relation() {
        for relation in ["", "   "] {
            let err = build_check_request("user:john", relation, "document:xyz", None, None, false)
                .unwrap_err();
            assert_eq!(
                err.current_context(),
                &AuthzError::MalformedTuple {
                    token: String::new(),
                    reason: "missing relation",
                }
            );
        }
    }

    #[test]
    fn relation_with_inner_whitespace_is_rejected() {
        let err = build_assignment(AssignmentOp::Create, "user:john", "can edit", "document:xyz", None)
            .unwrap_err();
        assert_eq!(
            err.current_context(),
            &AuthzError::MalformedTuple {
                token: "can edit".to_string(),
                reason: "relation contains whitespace",
            }
        );
    }

    #[test]
    fn relation_is_trimmed_and_round_trips() {
        let assignment =
            build_assignment(AssignmentOp::Delete, "user:john", " owner ", "document:xyz", None)
                .unwrap();
        let formatted = assignment.tuple.to_string();
        assert_eq!(formatted, "user:john owner document:xyz");
        assert_eq!(formatted.parse::<RelationTuple>().unwrap(), assignment.tuple);
    }

    #[test]
    fn empty_warrant_token_is_absent() {
        let request =
            build_check_request("user:john", "owner", "document:xyz", None, Some(""), false)
                .unwrap();
        assert_eq!(request.warrant_token, None);
    }

    #[test]
    fn assignment_carries_policy() {
        let assignment = build_assignment(
            AssignmentOp::Create,
            "user:john",
            "owner",
            "document:xyz",
            Some("region == 'eu'"),
        )
        .unwrap();
        assert_eq!(assignment.op.as_str(), "create");
        assert_eq!(assignment.tuple.policy.as_deref(), Some("region == 'eu'"));
        let formatted = assignment.tuple.to_string();
        assert_eq!(formatted, "user:john owner document:xyz [region == 'eu']");
        assert_eq!(formatted.parse::<RelationTuple>().unwrap(), assignment.tuple);
    }

    #[test]
    fn assignment_without_policy() {
        let assignment =
            build_assignment(AssignmentOp::Delete, "user:john", "owner", "document:xyz", Some(""))
                .unwrap();
        assert_eq!(assignment.op, AssignmentOp::Delete);
        assert_eq!(assignment.tuple.policy, None);
        assert_eq!(
            assignment.tuple,
            RelationTuple::new(
                parse_subject("user:john").unwrap(),
                "owner",
                ObjectRef::new("document", "xyz"),
            )
        );
    }

    #[test]
    fn meta_must_be_an_object() {
        let meta = parse_meta(r#"{"email":"john@example.com"}"#).unwrap();
        assert_eq!(meta["email"], "john@example.com");

        let err = parse_meta("42").unwrap_err();
        assert!(matches!(err.current_context(), AuthzError::InvalidMeta { .. }));
    }

    #[test]
    fn query_request_parses_context() {
        let query = build_query_request(
            " select document where user:john is owner ",
            Some(r#"{"tier":"gold"}"#),
            None,
            ListOptions::default(),
        )
        .unwrap();
        assert_eq!(query.query, "select document where user:john is owner");
        assert_eq!(query.context.unwrap()["tier"], "gold");
    }
}
