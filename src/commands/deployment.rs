//! `group deployment` command handlers.

use std::io::Write;
use std::time::Duration;

use serde_json::Value;

use crate::api::models::{CreateDeploymentBody, CreateDeploymentProperties, TemplateLink};
use crate::api::{Deployment, ResourceClient};
use crate::cli::{
    DeploymentCreateArgs, DeploymentListArgs, DeploymentShowArgs, DeploymentStopArgs,
};
use crate::commands::{command_session, CommandSession};
use crate::context::ServiceContext;
use crate::error::CliError;

/// Deployment mode the CLI always requests.
const DEPLOYMENT_MODE: &str = "Incremental";

/// Status checks before giving up on a deployment reaching a terminal
/// state.
const MAX_POLLS: u32 = 120;

/// States a nameless `stop` searches for.
const STOPPABLE_STATES: &str = "Running,Accepted";

/// Create a template deployment.
///
/// # Errors
///
/// Returns an error on conflicting template or parameter sources, local
/// file problems, or service rejection.
pub fn create(
    ctx: &ServiceContext,
    args: &DeploymentCreateArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let (template, template_link) = match (&args.template_file, &args.template_uri) {
        (Some(path), None) => {
            let content = std::fs::read_to_string(path)?;
            (Some(serde_json::from_str::<Value>(&content)?), None)
        }
        (None, Some(uri)) => (None, Some(TemplateLink { uri: uri.clone() })),
        _ => {
            return Err(CliError::Invalid(
                "Specify exactly one of the --template-file or --template-uri options.".to_string(),
            ))
        }
    };
    let parameters = match (&args.parameters_file, &args.parameters) {
        (Some(_), Some(_)) => {
            return Err(CliError::Invalid(
                "Specify only one of the --parameters-file or --parameters options.".to_string(),
            ))
        }
        (Some(path), None) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        (None, Some(inline)) => serde_json::from_str(inline)?,
        (None, None) => Value::Object(serde_json::Map::new()),
    };
    let body = CreateDeploymentBody {
        properties: CreateDeploymentProperties {
            mode: DEPLOYMENT_MODE.to_string(),
            template,
            template_link,
            parameters,
        },
    };

    let session = command_session(ctx)?;
    let client = client_for(ctx, &session);
    tracing::debug!(group = %args.resource_group, deployment = %args.name, "creating deployment");
    let mut deployment = client.create_deployment(&args.resource_group, &args.name, &body)?;
    if !args.nowait {
        deployment = wait_until_terminal(&client, &args.resource_group, &args.name, session.poll_interval_ms)?;
    }
    print_deployment(&deployment, args.json, out)
}

/// Show one deployment.
///
/// # Errors
///
/// Returns an error if the deployment does not exist or the request
/// fails.
pub fn show(
    ctx: &ServiceContext,
    args: &DeploymentShowArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let session = command_session(ctx)?;
    let client = client_for(ctx, &session);
    let deployment = client.show_deployment(&args.resource_group, &args.name)?;
    print_deployment(&deployment, args.json, out)
}

/// List a group's deployments.
///
/// # Errors
///
/// Returns an error if the request fails.
pub fn list(
    ctx: &ServiceContext,
    args: &DeploymentListArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let session = command_session(ctx)?;
    let client = client_for(ctx, &session);
    let deployments = client.list_deployments(&args.resource_group, args.state.as_deref())?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&deployments)?)?;
    } else if deployments.is_empty() {
        writeln!(out, "no deployments")?;
    } else {
        for deployment in &deployments {
            writeln!(
                out,
                "{}  {}",
                deployment.name, deployment.properties.provisioning_state
            )?;
        }
    }
    Ok(())
}

/// Stop a deployment.
///
/// Without `--name`, exactly one deployment in `Running` or `Accepted`
/// state must exist; it is the one stopped.
///
/// # Errors
///
/// Returns an error if confirmation was not waived with `--quiet`, the
/// nameless form finds zero or several active deployments, or the
/// service rejects the cancel.
pub fn stop(
    ctx: &ServiceContext,
    args: &DeploymentStopArgs,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if !args.quiet {
        return Err(CliError::Invalid(
            "confirmation required: pass --quiet (-q) to stop without prompting".to_string(),
        ));
    }
    let session = command_session(ctx)?;
    let client = client_for(ctx, &session);
    let name = match &args.name {
        Some(name) => name.clone(),
        None => {
            let active = client.list_deployments(&args.resource_group, Some(STOPPABLE_STATES))?;
            match active.len() {
                0 => {
                    return Err(CliError::Invalid(
                        "There is no deployment in \"Running\" or \"Accepted\" state.".to_string(),
                    ))
                }
                1 => active[0].name.clone(),
                _ => {
                    return Err(CliError::Invalid(
                        "There are more than 1 deployment in either \"Running\" or \"Accepted\" state, please name one.".to_string(),
                    ))
                }
            }
        }
    };
    tracing::debug!(group = %args.resource_group, deployment = %name, "stopping deployment");
    client.cancel_deployment(&args.resource_group, &name)?;
    if !args.json {
        writeln!(out, "deployment {name} stopped")?;
    }
    Ok(())
}

fn client_for<'a>(ctx: &'a ServiceContext, session: &CommandSession) -> ResourceClient<'a> {
    let client = ResourceClient::new(
        ctx.transport.as_ref(),
        &session.base_url,
        &session.subscription_id,
    );
    match &session.token {
        Some(token) => client.bearer(token),
        None => client,
    }
}

fn print_deployment(
    deployment: &Deployment,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(deployment)?)?;
    } else {
        writeln!(
            out,
            "deployment {}: {}",
            deployment.name, deployment.properties.provisioning_state
        )?;
    }
    Ok(())
}

/// Polls the deployment until it leaves the active states, sleeping the
/// configured interval between checks. Mocked runs configure a zero
/// interval, so playback replays the recorded poll sequence without
/// waiting.
fn wait_until_terminal(
    client: &ResourceClient<'_>,
    group: &str,
    name: &str,
    poll_interval_ms: u64,
) -> Result<Deployment, CliError> {
    for _ in 0..MAX_POLLS {
        let deployment = client.show_deployment(group, name)?;
        if !deployment.is_active() {
            return Ok(deployment);
        }
        if poll_interval_ms > 0 {
            std::thread::sleep(Duration::from_millis(poll_interval_ms));
        }
    }
    Err(CliError::Invalid(format!(
        "deployment {name} did not reach a terminal state after {MAX_POLLS} checks"
    )))
}
