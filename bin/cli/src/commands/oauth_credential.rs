//! `authctl oauth-credential`: list and create OAuth credentials.

use crate::cli::OAuthCredentialCommand;
use crate::error::CliError;
use crate::printer::{Printer, Table, yes_no};
use crate::prompt::ParameterSource;
use authctl_directory::{
    CreateOAuthCredential, OAuthConnectionType, OAuthCredential, OAuthCredentialClient,
};
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;

/// Runs an OAuth credential command.
///
/// # Errors
///
/// Returns [`CliError::Remote`] when the platform request fails and
/// [`CliError::Prompt`] when interactive input fails.
pub async fn run<W: Write>(
    client: &dyn OAuthCredentialClient,
    command: OAuthCredentialCommand,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    match command {
        OAuthCredentialCommand::List => {
            let page = client.list().await.context(CliError::Remote {
                operation: "listing oauth credentials",
            })?;
            printer.table(&credential_table(&page.data))
        }
        OAuthCredentialCommand::Create { connection_type } => {
            let connection_type = match connection_type {
                Some(connection_type) => connection_type,
                None => {
                    let labels: Vec<String> = OAuthConnectionType::ALL
                        .iter()
                        .map(ToString::to_string)
                        .collect();
                    let index = prompt.select("Select an OAuth provider.", &labels)?;
                    OAuthConnectionType::ALL[index]
                }
            };
            let credential = client
                .create(&CreateOAuthCredential { connection_type })
                .await
                .context(CliError::Remote {
                    operation: "creating oauth credential",
                })?;
            printer.table(&credential_table(std::slice::from_ref(&credential)))
        }
    }
}

fn credential_table(credentials: &[OAuthCredential]) -> Table {
    let mut table = Table::new(["ID", "Type", "State", "Userland Enabled"]);
    for credential in credentials {
        table.row([
            credential.id.as_str(),
            credential.connection_type.as_str(),
            credential.state.as_str(),
            yes_no(credential.is_userland_enabled),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{output, printer};
    use crate::prompt::SuppliedAnswers;
    use async_trait::async_trait;
    use authctl_core::Page;
    use authctl_directory::DirectoryError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCredentials {
        created: Mutex<Vec<OAuthConnectionType>>,
    }

    #[async_trait]
    impl OAuthCredentialClient for RecordingCredentials {
        async fn list(&self) -> Result<Page<OAuthCredential>, Report<DirectoryError>> {
            Ok(Page {
                data: vec![OAuthCredential {
                    id: "oauth_cred_1".to_string(),
                    connection_type: OAuthConnectionType::GoogleOAuth,
                    state: "valid".to_string(),
                    is_userland_enabled: true,
                }],
                ..Page::default()
            })
        }

        async fn create(
            &self,
            params: &CreateOAuthCredential,
        ) -> Result<OAuthCredential, Report<DirectoryError>> {
            self.created.lock().unwrap().push(params.connection_type);
            Ok(OAuthCredential {
                id: "oauth_cred_2".to_string(),
                connection_type: params.connection_type,
                state: "invalid".to_string(),
                is_userland_enabled: false,
            })
        }
    }

    #[tokio::test]
    async fn list_shows_userland_marker() {
        let client = RecordingCredentials::default();
        let mut out = printer();

        run(
            &client,
            OAuthCredentialCommand::List,
            &mut SuppliedAnswers::default(),
            &mut out,
        )
        .await
        .unwrap();

        let row = output(out)
            .lines()
            .find(|line| line.contains("oauth_cred_1"))
            .map(str::to_string)
            .unwrap();
        assert!(row.contains("GoogleOAuth"));
        assert!(row.contains(yes_no(true)));
    }

    #[tokio::test]
    async fn create_asks_for_provider() {
        let client = RecordingCredentials::default();
        let mut answers = SuppliedAnswers::new(["2"]);
        let mut out = printer();

        run(
            &client,
            OAuthCredentialCommand::Create {
                connection_type: None,
            },
            &mut answers,
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(
            *client.created.lock().unwrap(),
            [OAuthConnectionType::GitHubOAuth]
        );
        assert!(output(out).contains("oauth_cred_2"));
    }
}
