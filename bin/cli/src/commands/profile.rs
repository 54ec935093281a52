//! `authctl profile`: add, remove, switch and list connection profiles.

use super::{ask_environment_type, non_empty};
use crate::cli::{ProfileAddArgs, ProfileCommand};
use crate::error::CliError;
use crate::printer::{Printer, Table};
use crate::prompt::{self, ParameterSource};
use authctl_profile::{Profile, ProfileError, ProfileStore, validate_profile_name};
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;

/// Runs a profile command against `store`, writing the store back after changes.
///
/// # Errors
///
/// Returns [`CliError::Profile`] for unknown profiles or when the store cannot
/// be written, and [`CliError::MissingArgument`] for `add NAME` without an
/// API key.
pub fn run<W: Write>(
    store: &mut ProfileStore,
    command: ProfileCommand,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    match command {
        ProfileCommand::Add(args) => add(store, args, prompt, printer),
        ProfileCommand::Remove { name } => remove(store, name, prompt, printer),
        ProfileCommand::Switch { name } => switch(store, name, prompt, printer),
        ProfileCommand::List => list(store, printer),
    }
}

fn add<W: Write>(
    store: &mut ProfileStore,
    args: ProfileAddArgs,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let (name, environment_type, api_key) = match args.name {
        Some(name) => {
            let api_key = args
                .api_key
                .ok_or(CliError::MissingArgument { name: "API key" })?;
            let environment_type = args.environment_type.unwrap_or_default();
            (name, environment_type, api_key)
        }
        None => {
            let name = prompt.text(
                "Enter a name for the new profile (e.g. local, staging).",
                &prompt::profile_name,
            )?;
            let environment_type = match args.environment_type {
                Some(environment_type) => environment_type,
                None => ask_environment_type(prompt)?,
            };
            let api_key = prompt.text("Enter the API key for this profile.", &prompt::required)?;
            (name, environment_type, api_key)
        }
    };
    validate_profile_name(&name).context(CliError::InvalidArguments)?;

    store.add(Profile {
        name: name.clone(),
        environment_type,
        api_key,
        endpoint: non_empty(args.endpoint_arg.or(args.endpoint)),
    });
    store.write().context(CliError::Profile)?;

    printer.line(format_args!("Profile {name} added"))
}

fn remove<W: Write>(
    store: &mut ProfileStore,
    name: Option<String>,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let name = match name {
        Some(name) => name,
        None => prompt.text("Enter the name of the profile to remove.", &prompt::required)?,
    };

    store.remove(&name).context(CliError::Profile)?;
    store.write().context(CliError::Profile)?;

    printer.line(format_args!("Profile {name} removed"))
}

fn switch<W: Write>(
    store: &mut ProfileStore,
    name: Option<String>,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let name = match name {
        Some(name) => {
            if store.get(&name).is_none() {
                return Err(Report::<ProfileError>::from(ProfileError::ProfileNotFound { name }))
                    .context(CliError::Profile);
            }
            name
        }
        None => choose_profile(store, prompt)?,
    };

    store.set_active(name.as_str());
    store.write().context(CliError::Profile)?;

    printer.line(format_args!("Switched to profile {name}"))
}

fn choose_profile(
    store: &ProfileStore,
    prompt: &mut dyn ParameterSource,
) -> Result<String, Report<CliError>> {
    if store.environments.is_empty() {
        return Err(Report::<ProfileError>::from(ProfileError::NoProfiles)).context(CliError::Profile);
    }

    let names: Vec<&String> = store.environments.keys().collect();
    let labels: Vec<String> = store.environments.values().map(label).collect();
    let index = prompt.select("Select a profile to switch to.", &labels)?;
    Ok(names[index].clone())
}

fn label(profile: &Profile) -> String {
    let mut label = profile.name.clone();
    if !profile.environment_type.is_empty() {
        label.push_str(&format!(" [{}]", profile.environment_type));
    }
    if let Some(endpoint) = profile.endpoint() {
        label.push_str(&format!(" [{endpoint}]"));
    }
    label
}

fn list<W: Write>(store: &ProfileStore, printer: &mut Printer<W>) -> Result<(), Report<CliError>> {
    let mut table = Table::new(["Name", "Type", "Endpoint", "Active"]);
    for profile in store.environments.values() {
        let active = if profile.name == store.active_environment { "*" } else { "" };
        table.row([
            profile.name.as_str(),
            profile.environment_type.as_str(),
            profile.endpoint().unwrap_or_default(),
            active,
        ]);
    }
    printer.table(&table)
}
