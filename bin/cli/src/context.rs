//! Per-invocation state handed to every command.

use crate::error::CliError;
use authctl_api::{ApiClient, ApiConfig};
use authctl_authz::HttpAuthorizationClient;
use authctl_directory::{HttpOAuthCredentialClient, HttpOrganizationClient};
use authctl_profile::{Profile, ProfileStore};
use rootcause::prelude::{Report, ResultExt};
use std::time::Duration;
use tracing::debug;

/// Returns the active profile, or the line explaining why there is none.
fn require_active(store: &ProfileStore) -> Result<&Profile, String> {
    store
        .active_profile()
        .map_err(|report| format!("Error: {}", report.current_context()))
}

/// Returns the active profile, or prints why there is none and exits with status 1.
pub fn active_or_exit(store: &ProfileStore) -> &Profile {
    match require_active(store) {
        Ok(profile) => profile,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

/// The loaded profile store and connection settings for one command.
#[derive(Debug)]
pub struct Context {
    store: ProfileStore,
    timeout: Option<Duration>,
}

impl Context {
    /// Creates a context.
    #[must_use]
    pub fn new(store: ProfileStore, timeout: Option<Duration>) -> Self {
        Self { store, timeout }
    }

    /// Returns the profile store for modification.
    pub fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    /// Builds an API transport for the active profile, exiting when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Remote`] when the HTTP client cannot be created.
    pub fn api(&self) -> Result<ApiClient, Report<CliError>> {
        let profile = active_or_exit(&self.store);
        debug!(profile = %profile.name, endpoint = ?profile.endpoint(), "using profile");

        ApiClient::new(ApiConfig {
            api_key: profile.api_key.clone(),
            endpoint: profile.endpoint().map(str::to_string),
            timeout: self.timeout,
        })
        .context(CliError::Remote {
            operation: "creating API client",
        })
    }

    /// Builds the authorization client for the active profile.
    ///
    /// # Errors
    ///
    /// See [`Context::api`].
    pub fn authorization(&self) -> Result<HttpAuthorizationClient, Report<CliError>> {
        Ok(HttpAuthorizationClient::new(self.api()?))
    }

    /// Builds the organization client for the active profile.
    ///
    /// # Errors
    ///
    /// See [`Context::api`].
    pub fn organizations(&self) -> Result<HttpOrganizationClient, Report<CliError>> {
        Ok(HttpOrganizationClient::new(self.api()?))
    }

    /// Builds the OAuth credential client for the active profile.
    ///
    /// # Errors
    ///
    /// See [`Context::api`].
    pub fn oauth_credentials(&self) -> Result<HttpOAuthCredentialClient, Report<CliError>> {
        Ok(HttpOAuthCredentialClient::new(self.api()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::store_at;

    #[test]
    fn empty_store_points_at_init() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir.path().join(".authctl.json"));

        assert_eq!(
            require_active(&store).unwrap_err(),
            "Error: no active profile configured. Run 'authctl init'"
        );
    }

    #[test]
    fn dangling_active_profile_points_at_init() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_at(&dir.path().join(".authctl.json"));
        store.add(Profile {
            name: "staging".to_string(),
            environment_type: "Sandbox".to_string(),
            api_key: "sk_staging".to_string(),
            endpoint: None,
        });
        store.set_active("production");

        assert_eq!(
            require_active(&store).unwrap_err(),
            "Error: configured active profile 'production' is invalid. Run 'authctl init'"
        );
    }

    #[test]
    fn api_client_uses_active_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_at(&dir.path().join(".authctl.json"));
        store.add(Profile {
            name: "staging".to_string(),
            environment_type: "Sandbox".to_string(),
            api_key: "sk_staging".to_string(),
            endpoint: Some("http://localhost:8000".to_string()),
        });
        store.set_active("staging");

        assert_eq!(require_active(&store).unwrap().api_key, "sk_staging");
        let context = Context::new(store, Some(Duration::from_secs(5)));
        assert!(context.api().is_ok());
    }
}
