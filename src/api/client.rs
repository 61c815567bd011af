//! HTTP client for the resource service, routed through the transport
//! port.

use serde::de::DeserializeOwned;

use crate::api::models::{
    ApiErrorEnvelope, CreateDeploymentBody, CreateGroupBody, Deployment, ListResult, ResourceGroup,
};
use crate::api::API_VERSION;
use crate::error::CliError;
use crate::ports::http::{HttpRequest, HttpResponse, HttpTransport};

/// Longest error-body excerpt relayed when the service returns something
/// that is not the standard error envelope.
const ERROR_EXCERPT_LEN: usize = 200;

/// Issues resource-manager requests for one subscription.
pub struct ResourceClient<'a> {
    transport: &'a dyn HttpTransport,
    base_url: String,
    subscription_id: String,
    token: Option<String>,
}

impl<'a> ResourceClient<'a> {
    /// Creates a client for the given endpoint and subscription.
    #[must_use]
    pub fn new(
        transport: &'a dyn HttpTransport,
        base_url: impl Into<String>,
        subscription_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            subscription_id: subscription_id.into(),
            token: None,
        }
    }

    /// Attaches a bearer token sent with every request.
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Creates or updates a resource group.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub fn create_group(&self, name: &str, location: &str) -> Result<ResourceGroup, CliError> {
        let body = serde_json::to_string(&CreateGroupBody { location })?;
        let response = self.request("PUT", &self.group_path(name), Some(body))?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetches one resource group.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the group does not exist.
    pub fn show_group(&self, name: &str) -> Result<ResourceGroup, CliError> {
        let response = self.request("GET", &self.group_path(name), None)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Lists the subscription's resource groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn list_groups(&self) -> Result<Vec<ResourceGroup>, CliError> {
        let path = format!(
            "/subscriptions/{}/resourcegroups?api-version={API_VERSION}",
            self.subscription_id
        );
        self.request_list(&path)
    }

    /// Deletes a resource group. The service accepts the delete and
    /// finishes it asynchronously.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub fn delete_group(&self, name: &str) -> Result<(), CliError> {
        self.request("DELETE", &self.group_path(name), None)?;
        Ok(())
    }

    /// Creates or updates a template deployment in a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub fn create_deployment(
        &self,
        group: &str,
        name: &str,
        body: &CreateDeploymentBody,
    ) -> Result<Deployment, CliError> {
        let payload = serde_json::to_string(body)?;
        let response = self.request("PUT", &self.deployment_path(group, name), Some(payload))?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Fetches one deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the deployment does not
    /// exist.
    pub fn show_deployment(&self, group: &str, name: &str) -> Result<Deployment, CliError> {
        let response = self.request("GET", &self.deployment_path(group, name), None)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Lists a group's deployments, optionally filtered to the given
    /// comma-separated provisioning states.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub fn list_deployments(
        &self,
        group: &str,
        state: Option<&str>,
    ) -> Result<Vec<Deployment>, CliError> {
        let mut path = format!(
            "/subscriptions/{}/resourcegroups/{group}/deployments?api-version={API_VERSION}",
            self.subscription_id
        );
        if let Some(state) = state {
            path.push_str("&state=");
            path.push_str(state);
        }
        self.request_list(&path)
    }

    /// Cancels a running deployment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects it.
    pub fn cancel_deployment(&self, group: &str, name: &str) -> Result<(), CliError> {
        let path = format!(
            "/subscriptions/{}/resourcegroups/{group}/deployments/{name}/cancel?api-version={API_VERSION}",
            self.subscription_id
        );
        self.request("POST", &path, None)?;
        Ok(())
    }

    fn group_path(&self, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourcegroups/{name}?api-version={API_VERSION}",
            self.subscription_id
        )
    }

    fn deployment_path(&self, group: &str, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourcegroups/{group}/deployments/{name}?api-version={API_VERSION}",
            self.subscription_id
        )
    }

    fn request_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, CliError> {
        let response = self.request("GET", path, None)?;
        let list: ListResult<T> = serde_json::from_str(&response.body)?;
        Ok(list.value)
    }

    fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpResponse, CliError> {
        let mut request = HttpRequest::new(method, format!("{}{path}", self.base_url));
        if let Some(token) = &self.token {
            request = request.header("authorization", &format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.header("content-type", "application/json").body(body);
        }
        let response = self.transport.send(&request)?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(api_error(&response))
        }
    }
}

/// Maps a non-success response to a [`CliError::Api`], preferring the
/// service's own error message when the body carries one.
fn api_error(response: &HttpResponse) -> CliError {
    let message = match serde_json::from_str::<ApiErrorEnvelope>(&response.body) {
        Ok(envelope) => format!("{}: {}", envelope.error.code, envelope.error.message),
        Err(_) => response.body.chars().take(ERROR_EXCERPT_LEN).collect(),
    };
    CliError::Api {
        status: response.status,
        message,
    }
}
