//! Profile persistence port.

use crate::profile::Profile;

/// Errors from profile persistence.
pub type ProfileStoreError = Box<dyn std::error::Error + Send + Sync>;

/// Loads and saves the session profile.
///
/// The live adapter keeps the profile as a JSON file under the CLI home
/// directory; mocked runs substitute a one-slot in-memory store so tests
/// never touch the developer's real session.
pub trait ProfileStore: Send + Sync {
    /// Loads the current profile, or a bootstrap profile when none was
    /// ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if stored state exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<Profile, ProfileStoreError>;

    /// Persists the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be written.
    fn save(&self, profile: &Profile) -> Result<(), ProfileStoreError>;
}
