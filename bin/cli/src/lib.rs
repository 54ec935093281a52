//! The `authctl` command-line client.
//!
//! [`run`] loads the profile store, builds clients for the active profile and
//! dispatches to the handlers in [`commands`]. Handlers write through a
//! [`Printer`] and ask for missing arguments through a [`ParameterSource`],
//! so everything below `main` runs against buffers in tests.

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod printer;
pub mod prompt;

pub use cli::Cli;
pub use context::Context;
pub use error::CliError;
pub use printer::Printer;
pub use prompt::{ParameterSource, SuppliedAnswers, TerminalPrompt};

use authctl_profile::ProfileStore;
use cli::Command;
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;
use std::time::Duration;
use tracing::debug;

/// Runs one parsed command line.
///
/// # Errors
///
/// Returns [`CliError::Profile`] when the profile store cannot be loaded, and
/// whatever the selected command reports.
pub async fn run<W: Write>(
    cli: Cli,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let store = match &cli.config {
        Some(path) => ProfileStore::load_at(path),
        None => ProfileStore::load(),
    }
    .context(CliError::Profile)?;
    debug!(path = %store.path().display(), "profile store ready");

    let mut context = Context::new(store, cli.timeout.map(Duration::from_secs));

    match cli.command {
        Command::Init(args) => commands::init::run(context.store_mut(), args, prompt, printer),
        Command::Profile(command) => {
            commands::profile::run(context.store_mut(), command, prompt, printer)
        }
        Command::Organization(command) => {
            let client = context.organizations()?;
            commands::organization::run(&client, command, prompt, printer).await
        }
        Command::OAuthCredential(command) => {
            let client = context.oauth_credentials()?;
            commands::oauth_credential::run(&client, command, prompt, printer).await
        }
        Command::Fga(command) => {
            let client = context.authorization()?;
            commands::fga::run(&client, command, printer).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn profile_commands_use_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        let config = path.to_str().unwrap();
        let mut answers = SuppliedAnswers::default();

        let cli = Cli::try_parse_from([
            "authctl", "--config", config, "profile", "add", "ci", "sk_ci",
        ])
        .unwrap();
        let mut printer = Printer::new(Vec::new());
        run(cli, &mut answers, &mut printer).await.unwrap();

        let cli =
            Cli::try_parse_from(["authctl", "profile", "switch", "ci", "--config", config]).unwrap();
        let mut printer = Printer::new(Vec::new());
        run(cli, &mut answers, &mut printer).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let document: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(document["environments"]["ci"]["api_key"], "sk_ci");
        assert!(written.contains("\n    \"active_environment\""));
    }
}
