//! Environment variable names and requirement resolution for test
//! suites.

use std::collections::BTreeMap;

use crate::error::HarnessError;
use crate::harness::RunMode;

/// Selects the suite run mode: `live`, `record` or `playback`.
pub const TEST_MODE_VAR: &str = "STRATO_TEST_MODE";
/// Names the profile environment suites log into.
pub const TEST_ENVIRONMENT_VAR: &str = "STRATO_TEST_ENVIRONMENT";
/// Account used for live and recording logins.
pub const TEST_USERNAME_VAR: &str = "STRATO_TEST_USERNAME";
/// Password for [`TEST_USERNAME_VAR`].
pub const TEST_PASSWORD_VAR: &str = "STRATO_TEST_PASSWORD";
/// Subscription id tests select after login.
pub const TEST_SUBSCRIPTION_ID_VAR: &str = "STRATO_TEST_SUBSCRIPTION_ID";
/// Region suites deploy into; captured into fixtures at recording time.
pub const TEST_LOCATION_VAR: &str = "STRATO_TEST_LOCATION";
/// Overrides the fixture store root (default `tests/recordings`).
pub const RECORDINGS_DIR_VAR: &str = "STRATO_TEST_RECORDINGS_DIR";
/// Set to `false` for the lifetime of a mocked suite and cleared at
/// teardown, so self-signed test endpoints do not trip verification.
pub const STRICT_SSL_VAR: &str = "STRATO_STRICT_SSL";

/// Playback stand-ins for the credential variables. Playback talks to
/// nothing real, so the values only need to be stable.
pub(crate) const PLAYBACK_ENVIRONMENT: &str = "staging";
pub(crate) const PLAYBACK_USERNAME: &str = "harness@strato-cloud.test";
pub(crate) const PLAYBACK_PASSWORD: &str = "canned-password";
/// Subscription id baked into checked-in fixtures.
pub const PLAYBACK_SUBSCRIPTION_ID: &str = "8f7d3a2e-9b41-4c5e-a6d0-1f2e3c4b5a69";

/// One environment variable a suite needs before its tests run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRequirement {
    /// Variable name.
    pub name: String,
    /// Value used when the variable is unset; `None` makes it required.
    pub default_value: Option<String>,
}

impl EnvRequirement {
    /// A variable that must be present.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
        }
    }

    /// A variable that falls back to `value` when unset.
    #[must_use]
    pub fn with_default(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: Some(value.into()),
        }
    }
}

/// Resolves requirements through `lookup`, falling back to defaults.
/// All missing variables are gathered so the failure names every one of
/// them, not just the first.
pub(crate) fn resolve_requirements(
    requirements: &[EnvRequirement],
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BTreeMap<String, String>, HarnessError> {
    let mut resolved = BTreeMap::new();
    let mut missing = Vec::new();
    for requirement in requirements {
        match lookup(&requirement.name).or_else(|| requirement.default_value.clone()) {
            Some(value) => {
                resolved.insert(requirement.name.clone(), value);
            }
            None => missing.push(requirement.name.clone()),
        }
    }
    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(HarnessError::MissingEnv(missing))
    }
}

/// The credential requirements a login needs: strict in live and
/// recording modes, defaulted to canned values in playback so checked-in
/// fixtures replay on machines with no credentials at all.
pub(crate) fn credential_requirements(mode: RunMode) -> Vec<EnvRequirement> {
    if mode == RunMode::Playback {
        vec![
            EnvRequirement::with_default(TEST_ENVIRONMENT_VAR, PLAYBACK_ENVIRONMENT),
            EnvRequirement::with_default(TEST_USERNAME_VAR, PLAYBACK_USERNAME),
            EnvRequirement::with_default(TEST_PASSWORD_VAR, PLAYBACK_PASSWORD),
            EnvRequirement::with_default(TEST_SUBSCRIPTION_ID_VAR, PLAYBACK_SUBSCRIPTION_ID),
        ]
    } else {
        vec![
            EnvRequirement::required(TEST_ENVIRONMENT_VAR),
            EnvRequirement::required(TEST_USERNAME_VAR),
            EnvRequirement::required(TEST_PASSWORD_VAR),
            EnvRequirement::required(TEST_SUBSCRIPTION_ID_VAR),
        ]
    }
}
