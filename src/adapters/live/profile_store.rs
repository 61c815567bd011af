//! Disk-backed profile store under the CLI home directory.

use std::path::{Path, PathBuf};

use crate::ports::profile_store::{ProfileStore, ProfileStoreError};
use crate::profile::Profile;

/// Persists the profile as `profile.json` under the CLI home directory.
pub struct DiskProfileStore {
    path: PathBuf,
    bootstrap: Profile,
}

impl DiskProfileStore {
    /// Creates a store for the given home directory, bootstrapping from
    /// the stock profile when no file exists yet.
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self::with_bootstrap(home, Profile::bootstrap())
    }

    /// Creates a store whose first load returns the given profile. Test
    /// suites use this to pre-register the environment they target.
    #[must_use]
    pub fn with_bootstrap(home: &Path, bootstrap: Profile) -> Self {
        Self {
            path: home.join("profile.json"),
            bootstrap,
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for DiskProfileStore {
    fn load(&self) -> Result<Profile, ProfileStoreError> {
        if !self.path.is_file() {
            return Ok(self.bootstrap.clone());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, profile: &Profile) -> Result<(), ProfileStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(profile)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Subscription;

    #[test]
    fn missing_file_loads_bootstrap() {
        let home = std::env::temp_dir().join("strato_profile_store_missing");
        let _ = std::fs::remove_dir_all(&home);
        let store = DiskProfileStore::new(&home);
        let profile = store.load().unwrap();
        assert_eq!(profile, Profile::bootstrap());
    }

    #[test]
    fn save_then_load_round_trips() {
        let home = std::env::temp_dir().join("strato_profile_store_roundtrip");
        let _ = std::fs::remove_dir_all(&home);
        let store = DiskProfileStore::new(&home);

        let mut profile = Profile::bootstrap();
        profile.add_subscription(Subscription {
            id: "abc".into(),
            name: "saved".into(),
            environment_name: "production".into(),
            username: "tester@strato.example".into(),
            is_default: true,
            access_token: None,
        });
        store.save(&profile).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, profile);

        let _ = std::fs::remove_dir_all(&home);
    }
}
