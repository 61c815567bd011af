//! Fixed configuration source for mocked runs.

use crate::ports::config::{ApiMode, CliConfig, ConfigError, ConfigSource};

/// Always returns the same configuration, regardless of whatever config
/// file the developer keeps for personal use.
pub struct FixedConfig {
    config: CliConfig,
}

impl FixedConfig {
    /// The configuration mocked suites pin: resource API mode and a zero
    /// poll interval so replay never sleeps between status checks.
    #[must_use]
    pub fn mocked() -> Self {
        Self {
            config: CliConfig {
                api_mode: ApiMode::Resource,
                poll_interval_ms: 0,
            },
        }
    }

    /// A fixed source around an arbitrary configuration.
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        Self { config }
    }
}

impl ConfigSource for FixedConfig {
    fn read(&self) -> Result<CliConfig, ConfigError> {
        Ok(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mocked_config_pins_resource_mode_and_zero_polling() {
        let config = FixedConfig::mocked().read().unwrap();
        assert_eq!(config.api_mode, ApiMode::Resource);
        assert_eq!(config.poll_interval_ms, 0);
    }
}
