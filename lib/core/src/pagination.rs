//! Cursor pagination shared by every list endpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort order of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Oldest first.
    Asc,
    /// Newest first.
    Desc,
}

impl Order {
    /// Returns the query-string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an order other than `asc`/`desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOrderError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseOrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid order '{}' (expected asc or desc)", self.input)
    }
}

impl std::error::Error for ParseOrderError {}

impl FromStr for Order {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ParseOrderError {
                input: s.to_string(),
            }),
        }
    }
}

/// Common filters for a paginated list request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of results to return.
    pub limit: Option<u32>,
    /// Cursor of a result; only results before it are returned.
    pub before: Option<String>,
    /// Cursor of a result; only results after it are returned.
    pub after: Option<String>,
    /// Sort order.
    pub order: Option<Order>,
}

impl ListOptions {
    /// Returns the options as query-string pairs, omitting unset values.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(before) = self.before.as_deref().filter(|b| !b.is_empty()) {
            query.push(("before", before.to_string()));
        }
        if let Some(after) = self.after.as_deref().filter(|a| !a.is_empty()) {
            query.push(("after", after.to_string()));
        }
        if let Some(order) = self.order {
            query.push(("order", order.as_str().to_string()));
        }
        query
    }
}

/// Cursors returned alongside a page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadata {
    /// Cursor for the previous page.
    #[serde(default)]
    pub before: Option<String>,
    /// Cursor for the next page.
    #[serde(default)]
    pub after: Option<String>,
}

/// A page of results from a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The results on this page.
    pub data: Vec<T>,
    /// Cursors for neighbouring pages.
    #[serde(default)]
    pub list_metadata: ListMetadata,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            list_metadata: ListMetadata::default(),
        }
    }
}
