//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI parser for `strato`.
#[derive(Debug, Parser)]
#[command(name = "strato", version, about = "Manage Strato cloud resources")]
pub struct Cli {
    /// Increase diagnostic verbosity (repeatable).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage resource groups.
    #[command(subcommand)]
    Group(GroupCommand),
}

/// `strato group` subcommands.
#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// Create a resource group.
    Create(GroupCreateArgs),
    /// Show one resource group.
    Show(GroupShowArgs),
    /// List resource groups.
    List(ListArgs),
    /// Delete a resource group.
    Delete(GroupDeleteArgs),
    /// Manage template deployments within a group.
    #[command(subcommand)]
    Deployment(DeploymentCommand),
}

/// `strato group deployment` subcommands.
#[derive(Debug, Subcommand)]
pub enum DeploymentCommand {
    /// Create a template deployment.
    Create(DeploymentCreateArgs),
    /// Show one deployment.
    Show(DeploymentShowArgs),
    /// List a group's deployments.
    List(DeploymentListArgs),
    /// Stop a running deployment.
    Stop(DeploymentStopArgs),
}

/// Arguments for `group create`.
#[derive(Debug, Args)]
pub struct GroupCreateArgs {
    /// Group name.
    pub name: String,

    /// Location, positional form.
    #[arg(value_name = "LOCATION")]
    pub location_arg: Option<String>,

    /// Location, flag form.
    #[arg(short = 'l', long = "location")]
    pub location: Option<String>,

    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `group show`.
#[derive(Debug, Args)]
pub struct GroupShowArgs {
    /// Group name.
    pub name: String,

    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for plain list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `group delete`.
#[derive(Debug, Args)]
pub struct GroupDeleteArgs {
    /// Group name.
    pub name: String,

    /// Delete without prompting for confirmation.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `group deployment create`.
#[derive(Debug, Args)]
pub struct DeploymentCreateArgs {
    /// Resource group to deploy into.
    #[arg(short = 'g', long = "resource-group")]
    pub resource_group: String,

    /// Deployment name.
    #[arg(short = 'n', long = "name")]
    pub name: String,

    /// Local template file sent inline.
    #[arg(short = 'f', long = "template-file")]
    pub template_file: Option<PathBuf>,

    /// Hosted template the service fetches itself.
    #[arg(long = "template-uri")]
    pub template_uri: Option<String>,

    /// Parameters file.
    #[arg(short = 'e', long = "parameters-file")]
    pub parameters_file: Option<PathBuf>,

    /// Inline parameters JSON.
    #[arg(short = 'p', long = "parameters")]
    pub parameters: Option<String>,

    /// Return once the service accepts the deployment instead of
    /// waiting for it to finish.
    #[arg(long)]
    pub nowait: bool,

    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `group deployment show`.
#[derive(Debug, Args)]
pub struct DeploymentShowArgs {
    /// Resource group the deployment lives in.
    #[arg(short = 'g', long = "resource-group")]
    pub resource_group: String,

    /// Deployment name.
    #[arg(short = 'n', long = "name")]
    pub name: String,

    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `group deployment list`.
#[derive(Debug, Args)]
pub struct DeploymentListArgs {
    /// Resource group the deployments live in.
    #[arg(short = 'g', long = "resource-group")]
    pub resource_group: String,

    /// Comma-separated provisioning states to filter on.
    #[arg(long = "state")]
    pub state: Option<String>,

    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `group deployment stop`.
#[derive(Debug, Args)]
pub struct DeploymentStopArgs {
    /// Resource group the deployment lives in.
    #[arg(short = 'g', long = "resource-group")]
    pub resource_group: String,

    /// Deployment to stop. Without it, the single active deployment is
    /// stopped; several active deployments are an error.
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Stop without prompting for confirmation.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Emit the raw JSON response.
    #[arg(long)]
    pub json: bool,
}
