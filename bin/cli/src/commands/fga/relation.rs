//! Relation assignment, removal, checks and queries.

use super::meta_cell;
use crate::cli::CheckArgs;
use crate::error::CliError;
use crate::printer::{Printer, Table, decision_marker, fail, pass};
use authctl_authz::{
    AssignmentOp, AuthorizationClient, build_assignment, build_check_request, build_query_request,
};
use authctl_core::ListOptions;
use rootcause::prelude::{Report, ResultExt};
use std::io::Write;
use tracing::debug;

/// Parses an `--assert` value.
///
/// # Errors
///
/// Returns [`CliError::InvalidOption`] for anything but the usual spellings of
/// true and false.
pub fn parse_assertion(value: &str) -> Result<bool, Report<CliError>> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CliError::InvalidOption {
            option: "--assert",
            value: value.to_string(),
        }
        .into()),
    }
}

async fn write<W: Write>(
    client: &dyn AuthorizationClient,
    op: AssignmentOp,
    (subject, relation, resource): (&str, &str, &str),
    policy: Option<&str>,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let assignment = build_assignment(op, subject, relation, resource, policy)
        .context(CliError::InvalidArguments)?;
    let (operation, verb) = match op {
        AssignmentOp::Create => ("assigning relation", "Assigned"),
        AssignmentOp::Delete => ("removing relation", "Removed"),
    };

    let receipt = client
        .write_assignment(&assignment)
        .await
        .context(CliError::Remote { operation })?;

    printer.line(format_args!("{verb} {}", assignment.tuple))?;
    printer.line(format_args!("Warrant-Token: {}", receipt.warrant_token))
}

pub(super) async fn assign<W: Write>(
    client: &dyn AuthorizationClient,
    subject: &str,
    relation: &str,
    resource: &str,
    policy: Option<&str>,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    write(
        client,
        AssignmentOp::Create,
        (subject, relation, resource),
        policy,
        printer,
    )
    .await
}

pub(super) async fn remove<W: Write>(
    client: &dyn AuthorizationClient,
    subject: &str,
    relation: &str,
    resource: &str,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    write(
        client,
        AssignmentOp::Delete,
        (subject, relation, resource),
        None,
        printer,
    )
    .await
}

/// Runs a check and prints the outcome.
///
/// With `--assert`, a differing outcome prints a failure marker and returns
/// [`CliError::AssertionMismatch`] without printing debug information.
pub(super) async fn check<W: Write>(
    client: &dyn AuthorizationClient,
    args: CheckArgs,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let expected = args.assert.as_deref().map(parse_assertion).transpose()?;
    let request = build_check_request(
        &args.subject,
        &args.relation,
        &args.resource,
        args.context.as_deref(),
        args.warrant_token.as_deref(),
        args.debug,
    )
    .context(CliError::InvalidArguments)?;

    let response = client.check(&request).await.context(CliError::Remote {
        operation: "checking relation",
    })?;
    let actual = response.authorized();
    debug!(actual, ?expected, "check evaluated");

    let tuple = &request.tuple;
    match expected {
        Some(expected) if expected != actual => {
            printer.line(format_args!("{} {tuple}", fail(&format!("assert {expected}"))))?;
            return Err(CliError::AssertionMismatch { expected, actual }.into());
        }
        Some(expected) => {
            printer.line(format_args!("{} {tuple}", pass(&format!("assert {expected}"))))?;
        }
        None if actual => printer.line(format_args!("{} {tuple}", pass(response.result.as_str())))?,
        None => printer.line(format_args!("{} {tuple}", fail(response.result.as_str())))?,
    }

    if let Some(info) = response.debug_info.as_ref().filter(|_| args.debug) {
        printer.line("")?;
        printer.line(format_args!(
            "Response Time: {}ms",
            info.processing_time / 1_000_000
        ))?;
        if let Some(tree) = &info.decision_tree {
            printer.line("")?;
            printer.line(tree.render_with(decision_marker))?;
        }
    }
    Ok(())
}

pub(super) async fn query<W: Write>(
    client: &dyn AuthorizationClient,
    query: &str,
    context: Option<&str>,
    warrant_token: Option<&str>,
    list: ListOptions,
    printer: &mut Printer<W>,
) -> Result<(), Report<CliError>> {
    let request = build_query_request(query, context, warrant_token, list)
        .context(CliError::InvalidArguments)?;
    let page = client.query(&request).await.context(CliError::Remote {
        operation: "querying relations",
    })?;

    let mut table = Table::new(["Resource Type", "Resource ID", "Relation", "Implicit", "Meta"]);
    for result in &page.data {
        table.row([
            result.resource_type.clone(),
            result.resource_id.clone(),
            result.relation.clone(),
            result.is_implicit.to_string(),
            meta_cell(result.meta.as_ref())?,
        ]);
    }
    printer.table(&table)?;
    printer.cursors(&page.list_metadata)
}
