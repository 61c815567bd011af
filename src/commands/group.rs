//! `group` command handlers.

use std::io::Write;

use crate::api::ResourceClient;
use crate::cli::{GroupCreateArgs, GroupDeleteArgs, GroupShowArgs, ListArgs};
use crate::commands::command_session;
use crate::context::ServiceContext;
use crate::error::CliError;

/// Create a resource group.
///
/// # Errors
///
/// Returns an error if no location was given, both location forms were
/// given, or the service rejects the request.
pub fn create(
    ctx: &ServiceContext,
    args: &GroupCreateArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let location = match (&args.location_arg, &args.location) {
        (Some(_), Some(_)) => {
            return Err(CliError::Invalid(
                "Specify the location either as the positional argument or with --location, not both.".to_string(),
            ))
        }
        (Some(positional), None) => positional,
        (None, Some(flag)) => flag,
        (None, None) => {
            return Err(CliError::Invalid(
                "Specify the group location with --location or the location argument.".to_string(),
            ))
        }
    };
    let session = command_session(ctx)?;
    let client = ResourceClient::new(ctx.transport.as_ref(), &session.base_url, &session.subscription_id);
    let client = attach_token(client, session.token.as_deref());
    tracing::debug!(group = %args.name, %location, "creating resource group");
    let group = client.create_group(&args.name, location)?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&group)?)?;
    } else {
        let state = group
            .properties
            .as_ref()
            .map_or("Unknown", |properties| properties.provisioning_state.as_str());
        writeln!(out, "group {} provisioned in {} ({state})", group.name, group.location)?;
    }
    Ok(())
}

/// Show one resource group.
///
/// # Errors
///
/// Returns an error if the group does not exist or the request fails.
pub fn show(
    ctx: &ServiceContext,
    args: &GroupShowArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let session = command_session(ctx)?;
    let client = ResourceClient::new(ctx.transport.as_ref(), &session.base_url, &session.subscription_id);
    let client = attach_token(client, session.token.as_deref());
    let group = client.show_group(&args.name)?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&group)?)?;
    } else {
        let state = group
            .properties
            .as_ref()
            .map_or("Unknown", |properties| properties.provisioning_state.as_str());
        writeln!(out, "group {}: {state} in {}", group.name, group.location)?;
    }
    Ok(())
}

/// List the subscription's resource groups.
///
/// # Errors
///
/// Returns an error if the request fails.
pub fn list(ctx: &ServiceContext, args: &ListArgs, out: &mut dyn Write) -> Result<(), CliError> {
    let session = command_session(ctx)?;
    let client = ResourceClient::new(ctx.transport.as_ref(), &session.base_url, &session.subscription_id);
    let client = attach_token(client, session.token.as_deref());
    let groups = client.list_groups()?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&groups)?)?;
    } else if groups.is_empty() {
        writeln!(out, "no resource groups")?;
    } else {
        for group in &groups {
            writeln!(out, "{}  {}", group.name, group.location)?;
        }
    }
    Ok(())
}

/// Delete a resource group.
///
/// # Errors
///
/// Returns an error if confirmation was not waived with `--quiet` or the
/// service rejects the request.
pub fn delete(
    ctx: &ServiceContext,
    args: &GroupDeleteArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if !args.quiet {
        return Err(CliError::Invalid(
            "confirmation required: pass --quiet (-q) to delete without prompting".to_string(),
        ));
    }
    let session = command_session(ctx)?;
    let client = ResourceClient::new(ctx.transport.as_ref(), &session.base_url, &session.subscription_id);
    let client = attach_token(client, session.token.as_deref());
    tracing::debug!(group = %args.name, "deleting resource group");
    client.delete_group(&args.name)?;
    if !args.json {
        writeln!(out, "group {} deleted", args.name)?;
    }
    Ok(())
}

fn attach_token<'a>(client: ResourceClient<'a>, token: Option<&str>) -> ResourceClient<'a> {
    match token {
        Some(token) => client.bearer(token),
        None => client,
    }
}
