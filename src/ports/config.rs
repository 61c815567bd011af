//! Configuration port for CLI execution settings.

use serde::{Deserialize, Serialize};

/// Errors from reading configuration.
pub type ConfigError = Box<dyn std::error::Error + Send + Sync>;

/// Which API family service commands talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// The resource-manager API. Required by `group` commands.
    Resource,
    /// The legacy service-management API.
    Legacy,
}

/// Settings that shape how commands execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// API family in effect.
    pub api_mode: ApiMode,
    /// Delay between polls while waiting on a long-running operation.
    /// Mocked runs pin this to zero so replay never sleeps.
    pub poll_interval_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_mode: ApiMode::Resource,
            poll_interval_ms: 500,
        }
    }
}

/// Supplies the CLI configuration.
///
/// Abstracting config lets mocked runs force the resource API mode and a
/// zero poll interval regardless of what the developer's own config file
/// says.
pub trait ConfigSource: Send + Sync {
    /// Reads the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if stored configuration exists but cannot be read
    /// or parsed.
    fn read(&self) -> Result<CliConfig, ConfigError>;
}
