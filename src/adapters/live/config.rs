//! File-backed configuration source.

use std::path::{Path, PathBuf};

use crate::ports::config::{CliConfig, ConfigError, ConfigSource};

/// Reads `config.yaml` from the CLI home directory, falling back to the
/// default configuration when no file exists.
pub struct FileConfig {
    path: PathBuf,
}

impl FileConfig {
    /// Creates a source for the given home directory.
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self {
            path: home.join("config.yaml"),
        }
    }
}

impl ConfigSource for FileConfig {
    fn read(&self) -> Result<CliConfig, ConfigError> {
        if !self.path.is_file() {
            return Ok(CliConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::config::ApiMode;

    #[test]
    fn missing_file_yields_defaults() {
        let home = std::env::temp_dir().join("strato_config_missing");
        let _ = std::fs::remove_dir_all(&home);
        let config = FileConfig::new(&home).read().unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn file_contents_override_defaults() {
        let home = std::env::temp_dir().join("strato_config_file");
        let _ = std::fs::remove_dir_all(&home);
        std::fs::create_dir_all(&home).unwrap();
        std::fs::write(
            home.join("config.yaml"),
            "api_mode: legacy\npoll_interval_ms: 50\n",
        )
        .unwrap();

        let config = FileConfig::new(&home).read().unwrap();
        assert_eq!(config.api_mode, ApiMode::Legacy);
        assert_eq!(config.poll_interval_ms, 50);

        let _ = std::fs::remove_dir_all(&home);
    }
}
