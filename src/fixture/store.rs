//! On-disk layout and I/O for recorded fixtures.

use std::path::{Path, PathBuf};

use crate::error::FixtureError;
use crate::fixture::format::Fixture;

/// Turns a test title into a filesystem-safe stem: every run of
/// non-alphanumeric characters collapses to a single underscore.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut gap = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !stem.is_empty() {
                stem.push('_');
            }
            gap = false;
            stem.push(ch);
        } else {
            gap = true;
        }
    }
    stem
}

/// Resolves and performs fixture file I/O.
///
/// Fixtures live at `<root>/<suite>/<sanitized-title>.fixture.yaml`. The
/// default root is `tests/recordings`, so recordings are checked in next
/// to the tests that replay them.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a fixture for the given suite and test title lives at.
    #[must_use]
    pub fn path_for(&self, suite: &str, title: &str) -> PathBuf {
        self.root
            .join(suite)
            .join(format!("{}.fixture.yaml", sanitize_title(title)))
    }

    /// Whether a fixture was ever recorded for the given test.
    #[must_use]
    pub fn exists(&self, suite: &str, title: &str) -> bool {
        self.path_for(suite, title).is_file()
    }

    /// Loads the fixture for the given suite and test title.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Missing`] when no file exists, otherwise a
    /// read or parse error naming the path.
    pub fn load(&self, suite: &str, title: &str) -> Result<Fixture, FixtureError> {
        let path = self.path_for(suite, title);
        if !path.is_file() {
            return Err(FixtureError::Missing(path));
        }
        let content = std::fs::read_to_string(&path).map_err(|source| FixtureError::Read {
            path: path.clone(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| FixtureError::Parse { path, source })
    }

    /// Writes a fixture under the given suite, creating directories as
    /// needed, and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be serialized or the file
    /// cannot be written.
    pub fn write(&self, suite: &str, fixture: &Fixture) -> Result<PathBuf, FixtureError> {
        let path = self.path_for(suite, &fixture.name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| FixtureError::Write {
                path: path.clone(),
                source,
            })?;
        }
        let yaml = serde_yaml::to_string(fixture).map_err(|source| FixtureError::Serialize {
            name: fixture.name.clone(),
            source,
        })?;
        std::fs::write(&path, yaml).map_err(|source| FixtureError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
