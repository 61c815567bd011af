//! Wire models for the resource service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deployment states that count as still in flight.
const ACTIVE_STATES: &[&str] = &["Running", "Accepted"];

/// A resource group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    /// Service-assigned resource id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Group name.
    pub name: String,
    /// Region the group lives in.
    pub location: String,
    /// Provisioning details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<GroupProperties>,
}

/// Provisioning details of a resource group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupProperties {
    /// Current provisioning state, e.g. `Succeeded`.
    pub provisioning_state: String,
}

/// A template deployment within a resource group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    /// Service-assigned resource id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Deployment name.
    pub name: String,
    /// Deployment state and metadata.
    pub properties: DeploymentProperties,
}

impl Deployment {
    /// Whether the deployment is still running or queued, the states a
    /// stop request can act on.
    #[must_use]
    pub fn is_active(&self) -> bool {
        ACTIVE_STATES.contains(&self.properties.provisioning_state.as_str())
    }
}

/// State and metadata of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentProperties {
    /// Current provisioning state, e.g. `Running` or `Succeeded`.
    pub provisioning_state: String,
    /// Deployment mode echoed by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Last state-change timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Generic list envelope the service wraps collections in.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResult<T> {
    /// The listed items.
    pub value: Vec<T>,
}

/// Body of a `create group` request.
#[derive(Debug, Serialize)]
pub struct CreateGroupBody<'a> {
    /// Region to create the group in.
    pub location: &'a str,
}

/// Body of a `create deployment` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentBody {
    /// Deployment definition.
    pub properties: CreateDeploymentProperties,
}

/// Definition of a deployment being created.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentProperties {
    /// Deployment mode; the CLI always sends `Incremental`.
    pub mode: String,
    /// Inline template content, from `--template-file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Value>,
    /// Reference to a hosted template, from `--template-uri`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_link: Option<TemplateLink>,
    /// Deployment parameters, `{}` when none were given.
    pub parameters: Value,
}

/// A link to a template the service fetches itself.
#[derive(Debug, Serialize)]
pub struct TemplateLink {
    /// Template URI.
    pub uri: String,
}

/// Error envelope the service wraps failures in.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    /// The error payload.
    pub error: ApiErrorBody,
}

/// The error payload inside [`ApiErrorEnvelope`].
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
