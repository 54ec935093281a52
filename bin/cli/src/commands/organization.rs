//! `authctl organization`: create, update, get, delete and list organizations.

use crate::cli::OrganizationCommand;
use crate::error::CliError;
use crate::printer::{Printer, Table};
use crate::prompt::{self, ParameterSource};
use authctl_directory::{
    CreateOrganization, DomainData, DomainState, ListOrganizations, OrganizationClient,
    UpdateOrganization,
};
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;

/// Runs an organization command.
///
/// # Errors
///
/// Returns [`CliError::Remote`] when the platform request fails and
/// [`CliError::Prompt`] when interactive input fails.
pub async fn run<W: Write>(
    client: &dyn OrganizationClient,
    command: OrganizationCommand,
    prompt: &mut dyn ParameterSource,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    match command {
        OrganizationCommand::Create {
            name,
            domain,
            state,
        } => {
            let (name, domain, state) = match name {
                Some(name) => (name, domain, state),
                None => ask_organization(prompt)?,
            };
            let params = CreateOrganization {
                name,
                domain_data: domain_data(domain, state),
            };
            let organization = client.create(&params).await.context(CliError::Remote {
                operation: "creating organization",
            })?;
            printer.line("Created organization:")?;
            printer.json(&organization)
        }
        OrganizationCommand::Update {
            id,
            name,
            domain,
            state,
        } => {
            let params = UpdateOrganization {
                id,
                name,
                domain_data: domain_data(domain, state),
            };
            let organization = client.update(&params).await.context(CliError::Remote {
                operation: "updating organization",
            })?;
            printer.line("Updated organization:")?;
            printer.json(&organization)
        }
        OrganizationCommand::Get { id } => {
            let organization = client.get(id).await.context(CliError::Remote {
                operation: "getting organization",
            })?;
            printer.json(&organization)
        }
        OrganizationCommand::Delete { id } => {
            client.delete(id).await.context(CliError::Remote {
                operation: "deleting organization",
            })?;
            printer.line(format_args!("Deleted organization {id}"))
        }
        OrganizationCommand::List { domains, list } => {
            let filter = ListOrganizations {
                domains,
                list: list.into(),
            };
            let page = client.list(&filter).await.context(CliError::Remote {
                operation: "listing organizations",
            })?;

            let mut table = Table::new(["ID", "Name", "Domains"]);
            for organization in &page.data {
                table.row([
                    organization.id.to_string(),
                    organization.name.clone(),
                    organization.domain_names(),
                ]);
            }
            printer.table(&table)?;
            printer.cursors(&page.list_metadata)
        }
    }
}

fn ask_organization(
    prompt: &mut dyn ParameterSource,
) -> Result<(String, Option<String>, Option<DomainState>), Report<CliError>> {
    let name = prompt.text("Enter the organization name.", &prompt::required)?;
    let domain = prompt.text("Enter a domain, or leave empty for none.", &prompt::any)?;
    if domain.is_empty() {
        return Ok((name, None, None));
    }

    let states = [DomainState::Pending, DomainState::Verified];
    let labels: Vec<String> = states.iter().map(ToString::to_string).collect();
    let index = prompt.select("Select the domain state.", &labels)?;
    Ok((name, Some(domain), Some(states[index])))
}

fn domain_data(domain: Option<String>, state: Option<DomainState>) -> Vec<DomainData> {
    domain
        .filter(|d| !d.is_empty())
        .map(|domain| DomainData {
            domain,
            state: state.unwrap_or(DomainState::Pending),
        })
        .into_iter()
        .collect()
}
