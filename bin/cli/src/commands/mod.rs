//! Command handlers.
//!
//! Handlers take their collaborators as trait objects so they can be driven
//! by the HTTP clients at runtime and by in-memory fakes in tests.

pub mod fga;
pub mod init;
pub mod oauth_credential;
pub mod organization;
pub mod profile;

use crate::error::CliError;
use crate::prompt::ParameterSource;
use rootcause::prelude::Report;

const ENVIRONMENT_TYPES: [&str; 2] = ["Production", "Sandbox"];

/// Asks which kind of environment a profile points at.
pub(crate) fn ask_environment_type(
    prompt: &mut dyn ParameterSource,
) -> Result<String, Report<CliError>> {
    let options: Vec<String> = ENVIRONMENT_TYPES.iter().map(ToString::to_string).collect();
    let index = prompt.select("Select an environment type.", &options)?;
    Ok(options[index].clone())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
