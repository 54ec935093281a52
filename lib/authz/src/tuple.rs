//! The relation-tuple mini-language.
//!
//! Subjects and resources are written as `type:id`; a subject may carry a
//! relation of its own (`group:eng#member`, "every member of eng"). A tuple
//! renders as `subject relation resource`, followed by ` [policy]` and
//! ` '<context json>'` when those are present.

use crate::error::AuthzError;
use rootcause::prelude::Report;
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

/// Splits a `type:id` token on its first `:`.
///
/// Both halves must be non-empty. The id may itself contain `:`.
///
/// # Errors
///
/// Returns [`AuthzError::MalformedTuple`] when the separator is missing or
/// either half is empty.
pub fn parse_token(token: &str) -> Result<(&str, &str), Report<AuthzError>> {
    let token = token.trim();
    let malformed = |reason| AuthzError::MalformedTuple {
        token: token.to_string(),
        reason,
    };

    let (object_type, object_id) = token
        .split_once(':')
        .ok_or_else(|| malformed("expected <type>:<id>"))?;
    if object_type.is_empty() {
        return Err(malformed("missing type before ':'").into());
    }
    if object_id.is_empty() {
        return Err(malformed("missing id after ':'").into());
    }
    Ok((object_type, object_id))
}

/// Parses a subject token, `type:id` or `type:id#relation`.
///
/// `type:id` yields no relation; `type:id#` yields an empty relation.
///
/// # Errors
///
/// Returns [`AuthzError::MalformedTuple`] for the same reasons as
/// [`parse_token`], or when the id before `#` is empty.
pub fn parse_subject(token: &str) -> Result<SubjectRef, Report<AuthzError>> {
    let (object_type, id_and_relation) = parse_token(token)?;
    let (object_id, relation) = match id_and_relation.split_once('#') {
        Some((id, relation)) => (id, Some(relation.to_string())),
        None => (id_and_relation, None),
    };
    if object_id.is_empty() {
        return Err(AuthzError::MalformedTuple {
            token: token.trim().to_string(),
            reason: "missing id before '#'",
        }
        .into());
    }

    Ok(SubjectRef {
        object: ObjectRef::new(object_type, object_id),
        relation,
    })
}

/// A typed reference to a resource, `type:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// The resource type (e.g., "document").
    pub object_type: String,
    /// The resource id.
    pub object_id: String,
}

impl ObjectRef {
    /// Creates a new reference.
    #[must_use]
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }
}

impl FromStr for ObjectRef {
    type Err = Report<AuthzError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (object_type, object_id) = parse_token(s)?;
        Ok(Self::new(object_type, object_id))
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// The subject of a relation: a resource, or a relation on one (a userset).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectRef {
    /// The subject resource.
    pub object: ObjectRef,
    /// Relation on the subject, for usersets like `group:eng#member`.
    pub relation: Option<String>,
}

impl FromStr for SubjectRef {
    type Err = Report<AuthzError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_subject(s)
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.object)?;
        if let Some(relation) = &self.relation {
            write!(f, "#{}", relation)?;
        }
        Ok(())
    }
}

/// An assertion that a subject has a relation to a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTuple {
    /// Who holds the relation.
    pub subject: SubjectRef,
    /// The relation name (e.g., "owner").
    pub relation: String,
    /// What the relation is held on.
    pub resource: ObjectRef,
    /// Boolean expression gating when the relation applies.
    pub policy: Option<String>,
    /// Variables available to policies while evaluating a check.
    pub context: Option<Map<String, JsonValue>>,
}

impl RelationTuple {
    /// Creates a tuple without policy or context.
    #[must_use]
    pub fn new(subject: SubjectRef, relation: impl Into<String>, resource: ObjectRef) -> Self {
        Self {
            subject,
            relation: relation.into(),
            resource,
            policy: None,
            context: None,
        }
    }
}

impl fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.relation, self.resource)?;
        if let Some(policy) = self.policy.as_deref().filter(|p| !p.is_empty()) {
            write!(f, " [{}]", policy)?;
        }
        if let Some(context) = self.context.as_ref().filter(|c| !c.is_empty()) {
            let json = serde_json::to_string(context).map_err(|_| fmt::Error)?;
            write!(f, " '{}'", json)?;
        }
        Ok(())
    }
}

impl FromStr for RelationTuple {
    type Err = Report<AuthzError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AuthzError::InvalidTuple {
            input: s.to_string(),
        };

        let mut parts = s.trim().splitn(4, char::is_whitespace);
        let (Some(subject), Some(relation), Some(resource)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid().into());
        };
        if relation.is_empty() {
            return Err(invalid().into());
        }

        let mut tuple = Self::new(subject.parse()?, relation, resource.parse()?);
        let mut rest = parts.next().unwrap_or_default().trim();

        if let Some(bracketed) = rest.strip_prefix('[') {
            let (policy, remainder) = if let Some(policy) = bracketed.strip_suffix(']') {
                (policy, "")
            } else {
                let end = bracketed.rfind("] '").ok_or_else(invalid)?;
                (&bracketed[..end], &bracketed[end + 1..])
            };
            tuple.policy = Some(policy.to_string());
            rest = remainder.trim();
        }

        if !rest.is_empty() {
            let json = rest
                .strip_prefix('\'')
                .and_then(|r| r.strip_suffix('\''))
                .ok_or_else(invalid)?;
            tuple.context = Some(crate::request::parse_context(json)?);
        }

        Ok(tuple)
    }
}
