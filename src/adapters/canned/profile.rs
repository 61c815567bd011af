//! Canned profile data and the one-slot in-memory store.

use std::sync::Mutex;

use crate::ports::profile_store::{ProfileStore, ProfileStoreError};
use crate::profile::{Environment, Profile};

/// The profile mocked sessions start from: staging and production
/// environments, no subscriptions. All endpoints live under a reserved
/// test TLD so an escaped request can never reach a real service.
#[must_use]
pub fn canned_profile() -> Profile {
    Profile {
        environments: vec![
            Environment {
                name: "staging".to_string(),
                portal_url: "https://portal.staging.strato-cloud.test".to_string(),
                resource_manager_url: "https://api.staging.strato-cloud.test".to_string(),
                authority_url: "https://login.staging.strato-cloud.test".to_string(),
                host_name_suffix: "apps.staging.strato-cloud.test".to_string(),
            },
            Environment {
                name: "production".to_string(),
                portal_url: "https://portal.strato-cloud.test".to_string(),
                resource_manager_url: "https://api.strato-cloud.test".to_string(),
                authority_url: "https://login.strato-cloud.test".to_string(),
                host_name_suffix: "apps.strato-cloud.test".to_string(),
            },
        ],
        subscriptions: Vec::new(),
    }
}

/// One-slot in-memory store standing in for the persisted profile file.
///
/// The first load returns the seed; a save fills the slot and later loads
/// return exactly what was saved. [`MemoryProfileStore::replace`] lets
/// playback install a fixture's profile snapshot directly.
pub struct MemoryProfileStore {
    seed: Profile,
    slot: Mutex<Option<Profile>>,
}

impl MemoryProfileStore {
    /// Creates a store that serves `seed` until something is saved.
    #[must_use]
    pub fn new(seed: Profile) -> Self {
        Self {
            seed,
            slot: Mutex::new(None),
        }
    }

    /// Installs a profile as the saved state, replacing whatever was
    /// there.
    pub fn replace(&self, profile: Profile) {
        let mut guard = self.slot.lock().expect("profile slot poisoned");
        *guard = Some(profile);
    }

    /// A copy of the saved profile, or `None` when nothing was saved yet.
    #[must_use]
    pub fn saved(&self) -> Option<Profile> {
        let guard = self.slot.lock().expect("profile slot poisoned");
        guard.clone()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Profile, ProfileStoreError> {
        let guard = self.slot.lock().expect("profile slot poisoned");
        Ok(guard.clone().unwrap_or_else(|| self.seed.clone()))
    }

    fn save(&self, profile: &Profile) -> Result<(), ProfileStoreError> {
        let mut guard = self.slot.lock().expect("profile slot poisoned");
        *guard = Some(profile.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Subscription;

    #[test]
    fn canned_profile_has_staging_and_production() {
        let profile = canned_profile();
        assert!(profile.environment("staging").is_some());
        assert!(profile.environment("production").is_some());
        assert!(profile.subscriptions.is_empty());
    }

    #[test]
    fn first_load_returns_seed_then_saves_stick() {
        let store = MemoryProfileStore::new(canned_profile());
        assert!(store.saved().is_none());
        let initial = store.load().unwrap();
        assert_eq!(initial, canned_profile());

        let mut modified = initial;
        modified.add_subscription(Subscription {
            id: "sub".into(),
            name: "sub".into(),
            environment_name: "staging".into(),
            username: "u".into(),
            is_default: true,
            access_token: None,
        });
        store.save(&modified).unwrap();
        assert_eq!(store.load().unwrap(), modified);
        assert_eq!(store.saved(), Some(modified));
    }

    #[test]
    fn replace_overrides_saved_state() {
        let store = MemoryProfileStore::new(canned_profile());
        store.save(&canned_profile()).unwrap();
        store.replace(Profile::bootstrap());
        assert_eq!(store.load().unwrap(), Profile::bootstrap());
    }
}
