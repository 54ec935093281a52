//! Authenticated HTTP client for the platform API.

use crate::error::ApiError;
use crate::request::ApiRequest;
use reqwest::StatusCode;
use rootcause::prelude::Report;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, instrument};

/// Endpoint used when a profile does not override it.
pub const DEFAULT_ENDPOINT: &str = "https://api.workos.com";

const USER_AGENT: &str = concat!("authctl/", env!("CARGO_PKG_VERSION"));

/// Connection settings resolved from the active profile.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Secret API key sent as a bearer token.
    pub api_key: String,
    /// Endpoint override; `None` or empty uses [`DEFAULT_ENDPOINT`].
    pub endpoint: Option<String>,
    /// Per-request deadline.
    pub timeout: Option<Duration>,
}

/// Platform API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Creates a new API client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: ApiConfig) -> Result<Self, Report<ApiError>> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::Client {
            details: e.to_string(),
        })?;

        let base_url = config
            .endpoint
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request and decodes the JSON response body.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, Report<ApiError>> {
        let body = self.execute(request).await?;
        let decoded = serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            details: e.to_string(),
        })?;
        Ok(decoded)
    }

    /// Sends a request whose response body is ignored.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), Report<ApiError>> {
        self.execute(request).await?;
        Ok(())
    }

    async fn execute(&self, request: ApiRequest) -> Result<Vec<u8>, Report<ApiError>> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .http
            .request(request.method, url)
            .bearer_auth(&self.api_key);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let path = request.path;
        let response = builder
            .send()
            .await
            .map_err(|e| transport_error(&e, &path))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&e, &path))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "request rejected");
            return Err(rejection(status, &body).into());
        }

        debug!(status = status.as_u16(), bytes = body.len(), "request succeeded");
        Ok(body.to_vec())
    }
}

fn transport_error(error: &reqwest::Error, path: &str) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            path: path.to_string(),
        }
    } else {
        ApiError::Transport {
            details: error.to_string(),
        }
    }
}

/// Error payload returned by the API on rejected requests.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    errors: Vec<JsonValue>,
}

fn rejection(status: StatusCode, body: &[u8]) -> ApiError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();

    let message = parsed
        .message
        .or(parsed.error_description)
        .or(parsed.error)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let raw = String::from_utf8_lossy(body).trim().to_string();
            if raw.is_empty() || raw.starts_with('{') {
                status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string()
            } else {
                raw
            }
        });

    let errors = parsed.errors.iter().map(error_message).collect();

    ApiError::Rejected {
        status: status.as_u16(),
        message,
        errors,
    }
}

fn error_message(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Object(fields) => match fields.get("message").and_then(JsonValue::as_str) {
            Some(message) => message.to_string(),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}
