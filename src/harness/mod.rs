//! Record/replay test harness.
//!
//! The harness runs CLI scenarios in one of three modes: live against
//! real services, recording live traffic into per-test fixtures, or
//! playing fixtures back with no network at all. [`TestSuite`] owns the
//! lifecycle; the remaining modules supply named-identifier generation,
//! cleanup bookkeeping, command templating, environment resolution and
//! the scripted login.

pub mod env;
pub mod idgen;
pub mod ledger;
pub mod login;
pub mod suite;
pub mod template;

use crate::error::HarnessError;

pub use ledger::CleanupLedger;
pub use suite::{ExecutionResult, SuiteConfig, TestSuite};

/// How a suite executes its tests.
///
/// The default is [`RunMode::Playback`]: a checkout with recorded
/// fixtures passes its tests with no credentials and no network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Real services, nothing captured. Credentials required.
    Live,
    /// Real services with every in-test interaction captured to a
    /// fixture. Credentials required.
    Recording,
    /// Fixtures replayed, no network. Credentials optional.
    #[default]
    Playback,
}

impl RunMode {
    /// Parses a mode value as found in [`env::TEST_MODE_VAR`].
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidRunMode`] for anything other than
    /// `live`, `record`/`recording` or `playback`.
    pub fn parse(value: &str) -> Result<Self, HarnessError> {
        match value.to_ascii_lowercase().as_str() {
            "live" => Ok(RunMode::Live),
            "record" | "recording" => Ok(RunMode::Recording),
            "playback" => Ok(RunMode::Playback),
            _ => Err(HarnessError::InvalidRunMode(value.to_string())),
        }
    }

    /// Reads the mode from the process environment, defaulting to
    /// playback when the variable is unset.
    ///
    /// # Errors
    ///
    /// Returns an error when the variable is set to an unknown value.
    pub fn from_env() -> Result<Self, HarnessError> {
        match std::env::var(env::TEST_MODE_VAR) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok(RunMode::default()),
        }
    }

    /// Whether this mode substitutes session state (token, profile,
    /// configuration) instead of using the developer's real session.
    #[must_use]
    pub fn is_mocked(&self) -> bool {
        !matches!(self, RunMode::Live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_values_case_insensitively() {
        assert_eq!(RunMode::parse("live").unwrap(), RunMode::Live);
        assert_eq!(RunMode::parse("RECORD").unwrap(), RunMode::Recording);
        assert_eq!(RunMode::parse("recording").unwrap(), RunMode::Recording);
        assert_eq!(RunMode::parse("Playback").unwrap(), RunMode::Playback);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = RunMode::parse("offline").unwrap_err();
        assert!(matches!(err, HarnessError::InvalidRunMode(value) if value == "offline"));
    }

    #[test]
    fn default_mode_is_playback() {
        assert_eq!(RunMode::default(), RunMode::Playback);
        assert!(RunMode::Playback.is_mocked());
        assert!(RunMode::Recording.is_mocked());
        assert!(!RunMode::Live.is_mocked());
    }
}
