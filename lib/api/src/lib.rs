//! HTTP transport shared by the authctl API clients.
//!
//! Every resource family (authorization, organizations, OAuth credentials)
//! talks to the platform through an [`ApiClient`]: bearer authentication,
//! JSON bodies, and structured decoding of rejected requests. Retries are
//! deliberately absent; a request is sent exactly once.

mod client;
mod error;
mod request;

pub use client::{ApiClient, ApiConfig, DEFAULT_ENDPOINT};
pub use error::ApiError;
pub use request::{ApiRequest, Method};
