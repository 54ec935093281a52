//! Profile store for authctl.
//!
//! Connection profiles (API key, environment type, optional endpoint) live in
//! a JSON document in the user's home directory, with one of them marked
//! active. Environment variables prefixed `AUTHCTL_` can override the active
//! profile and, for the reserved [`HEADLESS_PROFILE`], every profile field, so
//! the CLI can run without a config file in CI.

mod error;
mod store;

pub use error::ProfileError;
pub use store::{
    CONFIG_FILE_NAME, ENV_PREFIX, HEADLESS_PROFILE, Profile, ProfileStore, validate_profile_name,
};
