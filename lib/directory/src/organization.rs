//! Organizations and their domains.

use crate::error::DirectoryError;
use async_trait::async_trait;
use authctl_api::{ApiClient, ApiRequest};
use authctl_core::{ListOptions, OrganizationId, Page};
use chrono::{DateTime, Utc};
use rootcause::prelude::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Verification state of an organization domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainState {
    /// Ownership of the domain is verified.
    Verified,
    /// Verification is outstanding.
    Pending,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl DomainState {
    /// Returns the wire name of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DomainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for a domain state other than `verified`/`pending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDomainStateError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseDomainStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid domain state '{}' (expected verified or pending)",
            self.input
        )
    }
}

impl std::error::Error for ParseDomainStateError {}

impl FromStr for DomainState {
    type Err = ParseDomainStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "verified" => Ok(Self::Verified),
            "pending" => Ok(Self::Pending),
            _ => Err(ParseDomainStateError {
                input: s.to_string(),
            }),
        }
    }
}

/// A domain attached to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDomain {
    /// Domain id.
    pub id: String,
    /// The domain name.
    pub domain: String,
    /// Verification state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<DomainState>,
}

/// An organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization id.
    pub id: OrganizationId,
    /// Display name.
    pub name: String,
    /// Whether users outside the organization's domains may sign in.
    #[serde(default)]
    pub allow_profiles_outside_organization: bool,
    /// Attached domains.
    #[serde(default)]
    pub domains: Vec<OrganizationDomain>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    /// Returns the domain names, comma separated.
    #[must_use]
    pub fn domain_names(&self) -> String {
        self.domains
            .iter()
            .map(|d| d.domain.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A domain to attach when creating or updating an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainData {
    /// The domain name.
    pub domain: String,
    /// Initial verification state.
    pub state: DomainState,
}

/// Parameters for creating an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrganization {
    /// Display name.
    pub name: String,
    /// Domains to attach.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_data: Vec<DomainData>,
}

/// Parameters for updating an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOrganization {
    /// Organization to update.
    #[serde(skip)]
    pub id: OrganizationId,
    /// New display name.
    pub name: String,
    /// Replacement domains.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_data: Vec<DomainData>,
}

/// Filters for listing organizations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOrganizations {
    /// Only organizations with any of these domains.
    pub domains: Vec<String>,
    /// Pagination.
    pub list: ListOptions,
}

/// Organization operations.
#[async_trait]
pub trait OrganizationClient: Send + Sync {
    /// Creates an organization.
    async fn create(
        &self,
        params: &CreateOrganization,
    ) -> Result<Organization, Report<DirectoryError>>;

    /// Updates an organization.
    async fn update(
        &self,
        params: &UpdateOrganization,
    ) -> Result<Organization, Report<DirectoryError>>;

    /// Fetches an organization.
    async fn get(&self, id: OrganizationId) -> Result<Organization, Report<DirectoryError>>;

    /// Lists organizations.
    async fn list(
        &self,
        filter: &ListOrganizations,
    ) -> Result<Page<Organization>, Report<DirectoryError>>;

    /// Deletes an organization.
    async fn delete(&self, id: OrganizationId) -> Result<(), Report<DirectoryError>>;
}

/// HTTP implementation of [`OrganizationClient`].
#[derive(Debug, Clone)]
pub struct HttpOrganizationClient {
    api: ApiClient,
}

impl HttpOrganizationClient {
    /// Creates a client over an API transport.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn organization_path(id: OrganizationId) -> String {
    format!("/organizations/{id}")
}

#[async_trait]
impl OrganizationClient for HttpOrganizationClient {
    #[instrument(skip(self, params), fields(name = %params.name))]
    async fn create(
        &self,
        params: &CreateOrganization,
    ) -> Result<Organization, Report<DirectoryError>> {
        let failed = || DirectoryError::RequestFailed {
            operation: "create organization",
        };
        let request = ApiRequest::post("/organizations")
            .json(params)
            .context(failed())?;
        let organization: Organization = self.api.send(request).await.context(failed())?;

        debug!(id = %organization.id, "organization created");
        Ok(organization)
    }

    #[instrument(skip(self, params), fields(id = %params.id))]
    async fn update(
        &self,
        params: &UpdateOrganization,
    ) -> Result<Organization, Report<DirectoryError>> {
        let failed = || DirectoryError::RequestFailed {
            operation: "update organization",
        };
        let request = ApiRequest::put(organization_path(params.id))
            .json(params)
            .context(failed())?;
        let organization = self.api.send(request).await.context(failed())?;

        debug!("organization updated");
        Ok(organization)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: OrganizationId) -> Result<Organization, Report<DirectoryError>> {
        self.api
            .send(ApiRequest::get(organization_path(id)))
            .await
            .context(DirectoryError::RequestFailed {
                operation: "get organization",
            })
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: &ListOrganizations,
    ) -> Result<Page<Organization>, Report<DirectoryError>> {
        let request = ApiRequest::get("/organizations")
            .query_pairs(
                filter
                    .domains
                    .iter()
                    .filter(|d| !d.is_empty())
                    .map(|d| ("domains", d.clone())),
            )
            .query_pairs(filter.list.to_query());

        let page: Page<Organization> =
            self.api
                .send(request)
                .await
                .context(DirectoryError::RequestFailed {
                    operation: "list organizations",
                })?;

        debug!(count = page.data.len(), "organizations listed");
        Ok(page)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: OrganizationId) -> Result<(), Report<DirectoryError>> {
        self.api
            .send_empty(ApiRequest::delete(organization_path(id)))
            .await
            .context(DirectoryError::RequestFailed {
                operation: "delete organization",
            })?;

        debug!("organization deleted");
        Ok(())
    }
}
