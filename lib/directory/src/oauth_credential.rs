//! OAuth credentials (social sign-in methods).

use crate::error::DirectoryError;
use async_trait::async_trait;
use authctl_api::{ApiClient, ApiRequest};
use authctl_core::Page;
use rootcause::prelude::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Identity provider behind an OAuth credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OAuthConnectionType {
    /// Sign in with Apple.
    #[serde(rename = "AppleOAuth")]
    AppleOAuth,
    /// Sign in with GitHub.
    #[serde(rename = "GitHubOAuth")]
    GitHubOAuth,
    /// Sign in with Google.
    #[serde(rename = "GoogleOAuth")]
    GoogleOAuth,
    /// Sign in with Microsoft.
    #[serde(rename = "MicrosoftOAuth")]
    MicrosoftOAuth,
}

impl OAuthConnectionType {
    /// Every connection type, in menu order.
    pub const ALL: [Self; 4] = [
        Self::AppleOAuth,
        Self::GitHubOAuth,
        Self::GoogleOAuth,
        Self::MicrosoftOAuth,
    ];

    /// Returns the wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppleOAuth => "AppleOAuth",
            Self::GitHubOAuth => "GitHubOAuth",
            Self::GoogleOAuth => "GoogleOAuth",
            Self::MicrosoftOAuth => "MicrosoftOAuth",
        }
    }
}

impl fmt::Display for OAuthConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown connection type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConnectionTypeError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseConnectionTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown OAuth connection type '{}'", self.input)
    }
}

impl std::error::Error for ParseConnectionTypeError {}

impl FromStr for OAuthConnectionType {
    type Err = ParseConnectionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseConnectionTypeError {
                input: s.to_string(),
            })
    }
}

/// A configured OAuth credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthCredential {
    /// Credential id.
    pub id: String,
    /// Identity provider.
    #[serde(rename = "type")]
    pub connection_type: OAuthConnectionType,
    /// Configuration state, as reported by the platform.
    #[serde(default)]
    pub state: String,
    /// Whether the platform's shared client credentials are in use.
    #[serde(default)]
    pub is_userland_enabled: bool,
}

/// Parameters for creating an OAuth credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOAuthCredential {
    /// Identity provider.
    #[serde(rename = "type")]
    pub connection_type: OAuthConnectionType,
}

/// OAuth credential operations.
#[async_trait]
pub trait OAuthCredentialClient: Send + Sync {
    /// Lists OAuth credentials.
    async fn list(&self) -> Result<Page<OAuthCredential>, Report<DirectoryError>>;

    /// Creates an OAuth credential.
    async fn create(
        &self,
        params: &CreateOAuthCredential,
    ) -> Result<OAuthCredential, Report<DirectoryError>>;
}

/// HTTP implementation of [`OAuthCredentialClient`].
#[derive(Debug, Clone)]
pub struct HttpOAuthCredentialClient {
    api: ApiClient,
}

impl HttpOAuthCredentialClient {
    /// Creates a client over an API transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OAuthCredentialClient for HttpOAuthCredentialClient {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Page<OAuthCredential>, Report<DirectoryError>> {
        let page: Page<OAuthCredential> = self
            .api
            .send(ApiRequest::get("/oauth_credentials"))
            .await
            .context(DirectoryError::RequestFailed {
                operation: "list oauth credentials",
            })?;

        debug!(count = page.data.len(), "oauth credentials listed");
        Ok(page)
    }

    #[instrument(skip(self, params), fields(connection_type = %params.connection_type))]
    async fn create(
        &self,
        params: &CreateOAuthCredential,
    ) -> Result<OAuthCredential, Report<DirectoryError>> {
        let failed = || DirectoryError::RequestFailed {
            operation: "create oauth credential",
        };
        let request = ApiRequest::post("/oauth_credentials")
            .json(params)
            .context(failed())?;
        let credential: OAuthCredential = self.api.send(request).await.context(failed())?;

        debug!(id = %credential.id, "oauth credential created");
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authctl_api::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpOAuthCredentialClient {
        let api = ApiClient::new(ApiConfig {
            api_key: "sk_test".to_string(),
            endpoint: Some(server.uri()),
            timeout: None,
        })
        .unwrap();
        HttpOAuthCredentialClient::new(api)
    }

    #[test]
    fn connection_type_parses_ignoring_case() {
        assert_eq!(
            "githuboauth".parse::<OAuthConnectionType>().unwrap(),
            OAuthConnectionType::GitHubOAuth
        );
        assert!("FacebookOAuth".parse::<OAuthConnectionType>().is_err());
    }

    #[tokio::test]
    async fn list_decodes_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth_credentials"))
            .and(header("authorization", "Bearer sk_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": "oauth_cred_1",
                    "type": "GoogleOAuth",
                    "state": "valid",
                    "is_userland_enabled": true
                }]
            })))
            .mount(&server)
            .await;

        let page = client_for(&server).list().await.unwrap();
        assert_eq!(page.data[0].connection_type, OAuthConnectionType::GoogleOAuth);
        assert!(page.data[0].is_userland_enabled);
        assert_eq!(page.list_metadata.after, None);
    }

    #[tokio::test]
    async fn create_sends_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth_credentials"))
            .and(body_json(json!({"type": "AppleOAuth"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "oauth_cred_2",
                "type": "AppleOAuth",
                "state": "invalid",
                "is_userland_enabled": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credential = client_for(&server)
            .create(&CreateOAuthCredential {
                connection_type: OAuthConnectionType::AppleOAuth,
            })
            .await
            .unwrap();
        assert_eq!(credential.id, "oauth_cred_2");
    }
}
