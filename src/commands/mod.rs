//! Command dispatch and handlers.

pub mod deployment;
pub mod group;

use std::io::Write;

use crate::cli::{Command, DeploymentCommand, GroupCommand};
use crate::context::ServiceContext;
use crate::error::CliError;
use crate::ports::config::ApiMode;

/// Dispatch a parsed command to its handler.
///
/// Handlers write their output to `out`; failures come back as errors and
/// the caller decides how to report them.
///
/// # Errors
///
/// Returns an error if the selected command handler fails.
pub fn dispatch(
    command: &Command,
    ctx: &ServiceContext,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Group(group_command) => match group_command {
            GroupCommand::Create(args) => group::create(ctx, args, out),
            GroupCommand::Show(args) => group::show(ctx, args, out),
            GroupCommand::List(args) => group::list(ctx, args, out),
            GroupCommand::Delete(args) => group::delete(ctx, args, out),
            GroupCommand::Deployment(deployment_command) => match deployment_command {
                DeploymentCommand::Create(args) => deployment::create(ctx, args, out),
                DeploymentCommand::Show(args) => deployment::show(ctx, args, out),
                DeploymentCommand::List(args) => deployment::list(ctx, args, out),
                DeploymentCommand::Stop(args) => deployment::stop(ctx, args, out),
            },
        },
    }
}

/// Session pieces every service command resolves before talking to the
/// API: endpoint, subscription, token and polling settings.
#[derive(Debug)]
pub(crate) struct CommandSession {
    pub base_url: String,
    pub subscription_id: String,
    pub token: Option<String>,
    pub poll_interval_ms: u64,
}

/// Resolves the current session from config and profile.
pub(crate) fn command_session(ctx: &ServiceContext) -> Result<CommandSession, CliError> {
    let config = ctx
        .config
        .read()
        .map_err(|err| CliError::Config(err.to_string()))?;
    if config.api_mode != ApiMode::Resource {
        return Err(CliError::Invalid(
            "the legacy API mode does not support resource group commands".to_string(),
        ));
    }
    let profile = ctx
        .profile_store
        .load()
        .map_err(|err| CliError::Profile(err.to_string()))?;
    let subscription = profile.default_subscription().ok_or_else(|| {
        CliError::Invalid("not logged in: profile has no default subscription".to_string())
    })?;
    let environment = profile.environment(&subscription.environment_name).ok_or_else(|| {
        CliError::Invalid(format!(
            "profile names unknown environment {:?}",
            subscription.environment_name
        ))
    })?;
    Ok(CommandSession {
        base_url: environment.resource_manager_url.clone(),
        subscription_id: subscription.id.clone(),
        token: subscription.access_token.as_ref().map(|token| token.token.clone()),
        poll_interval_ms: config.poll_interval_ms,
    })
}
