//! Request descriptions handed to [`ApiClient`](crate::ApiClient).

use crate::error::ApiError;
use rootcause::prelude::Report;
use serde::Serialize;
use serde_json::Value as JsonValue;

pub use reqwest::Method;

/// A single API request: method, path, query, extra headers and JSON body.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(&'static str, String)>,
    pub(crate) body: Option<JsonValue>,
}

impl ApiRequest {
    /// Creates a request with the given method and path (relative to the endpoint).
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query-string pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends several query-string pairs.
    #[must_use]
    pub fn query_pairs<K: Into<String>>(
        mut self,
        pairs: impl IntoIterator<Item = (K, String)>,
    ) -> Self {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value)));
        self
    }

    /// Adds a header when a value is present and non-empty.
    #[must_use]
    pub fn optional_header(mut self, name: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.headers.push((name, value.to_string()));
        }
        self
    }

    /// Sets the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if the body cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, Report<ApiError>> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode {
            details: e.to_string(),
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_header_skips_empty_values() {
        let request = ApiRequest::get("/x")
            .optional_header("Warrant-Token", None)
            .optional_header("Warrant-Token", Some(""));
        assert!(request.headers.is_empty());

        let request = request.optional_header("Warrant-Token", Some("tok"));
        assert_eq!(request.headers, vec![("Warrant-Token", "tok".to_string())]);
    }

    #[test]
    fn json_body_is_stored_as_value() {
        let request = ApiRequest::post("/x")
            .json(&serde_json::json!({"name": "acme"}))
            .expect("encodable");
        assert_eq!(request.body, Some(serde_json::json!({"name": "acme"})));
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/x");
    }
}
