//! Directory resources for authctl: organizations and OAuth credentials.
//!
//! Each resource family is exposed as a capability trait
//! ([`OrganizationClient`], [`OAuthCredentialClient`]) with an HTTP
//! implementation over [`authctl_api::ApiClient`].

mod error;
mod oauth_credential;
mod organization;

pub use error::DirectoryError;
pub use oauth_credential::{
    CreateOAuthCredential, HttpOAuthCredentialClient, OAuthConnectionType, OAuthCredential,
    OAuthCredentialClient, ParseConnectionTypeError,
};
pub use organization::{
    CreateOrganization, DomainData, DomainState, HttpOrganizationClient, ListOrganizations,
    Organization, OrganizationClient, OrganizationDomain, ParseDomainStateError,
    UpdateOrganization,
};
