//! `authctl init`: configure a first profile and make it active.

use super::{ask_environment_type, non_empty};
use crate::cli::InitArgs;
use crate::error::CliError;
use crate::printer::Printer;
use crate::prompt::{self, ParameterSource};
use authctl_api::DEFAULT_ENDPOINT;
use authctl_profile::{Profile, ProfileStore, validate_profile_name};
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;
use tracing::info;

/// Runs `init`, prompting for whatever was not passed as a flag.
///
/// # Errors
///
/// Returns [`CliError::InvalidArguments`] for an invalid profile name,
/// [`CliError::Prompt`] when prompting fails and [`CliError::Profile`] when
/// the store cannot be written.
pub fn run<W: Write>(
    store: &mut ProfileStore,
    args: InitArgs,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let interactive =
        args.api_key.is_none() || args.name.is_none() || args.environment_type.is_none();

    let api_key = match args.api_key {
        Some(api_key) => api_key,
        None => prompt.text("Enter your API key.", &prompt::required)?,
    };
    let name = match args.name {
        Some(name) => name,
        None => prompt.text(
            "Give this API key a unique profile name (e.g. john-local-dev).",
            &prompt::profile_name,
        )?,
    };
    validate_profile_name(&name).context(CliError::InvalidArguments)?;

    let environment_type = match args.environment_type {
        Some(environment_type) => environment_type,
        None => ask_environment_type(prompt)?,
    };
    let endpoint = match args.endpoint {
        Some(endpoint) => Some(endpoint),
        None if interactive => Some(prompt.text(
            &format!("Enter an API endpoint, or leave empty for {DEFAULT_ENDPOINT}."),
            &prompt::any,
        )?),
        None => None,
    };

    if interactive
        && store.get(&name).is_some()
        && !prompt.confirm(&format!("Profile {name} already exists. Replace it?"))?
    {
        return printer.line("Nothing changed");
    }

    store.add(Profile {
        name: name.clone(),
        environment_type,
        api_key,
        endpoint: non_empty(endpoint),
    });
    store.set_active(name.as_str());
    store.write().context(CliError::Profile)?;

    info!(profile = %name, path = %store.path().display(), "profile initialised");
    printer.line(format_args!("Profile {name} added and set as active"))
}
