//! Resource service API surface the CLI commands consume.

pub mod client;
pub mod models;

/// API version every request pins.
pub const API_VERSION: &str = "2024-06-01";

pub use client::ResourceClient;
pub use models::{
    CreateDeploymentBody, CreateDeploymentProperties, Deployment, DeploymentProperties,
    GroupProperties, ResourceGroup, TemplateLink,
};
