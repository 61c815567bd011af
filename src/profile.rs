//! Session profile: the environments the CLI knows and the subscriptions
//! the logged-in account can use.
//!
//! The profile is what `login` produces and what every service command
//! reads to find its endpoint and bearer token. In live runs it persists
//! under the CLI home directory; in mocked runs it lives in memory and is
//! snapshotted into fixtures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named service environment: the set of endpoints one cloud instance
/// exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name, unique within a profile.
    pub name: String,
    /// Management portal URL.
    pub portal_url: String,
    /// Resource manager API endpoint.
    pub resource_manager_url: String,
    /// Token authority endpoint.
    pub authority_url: String,
    /// DNS suffix for hosted applications.
    pub host_name_suffix: String,
}

/// A bearer token with its expiry instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Opaque token text, sent as `Bearer <token>`.
    pub token: String,
    /// Instant after which the token is no longer valid.
    pub expires_at: DateTime<Utc>,
}

/// One subscription visible to a logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription id as issued by the service.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Name of the [`Environment`] this subscription belongs to.
    pub environment_name: String,
    /// Account that logged in.
    pub username: String,
    /// Whether commands without an explicit subscription use this one.
    #[serde(default)]
    pub is_default: bool,
    /// Token for this subscription, absent before login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessToken>,
}

/// The whole session state the CLI keeps between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Known environments.
    #[serde(default)]
    pub environments: Vec<Environment>,
    /// Subscriptions gathered by logins.
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl Profile {
    /// The profile a fresh installation starts from: the public
    /// production environment and no subscriptions.
    #[must_use]
    pub fn bootstrap() -> Self {
        Self {
            environments: vec![Environment {
                name: "production".to_string(),
                portal_url: "https://portal.strato.example".to_string(),
                resource_manager_url: "https://api.strato.example".to_string(),
                authority_url: "https://login.strato.example".to_string(),
                host_name_suffix: "apps.strato.example".to_string(),
            }],
            subscriptions: Vec::new(),
        }
    }

    /// Looks up an environment by name, case-insensitively.
    #[must_use]
    pub fn environment(&self, name: &str) -> Option<&Environment> {
        self.environments
            .iter()
            .find(|environment| environment.name.eq_ignore_ascii_case(name))
    }

    /// Adds a subscription, replacing any existing entry with the same id
    /// (case-insensitive). When the incoming subscription is marked
    /// default, every other entry loses its default flag.
    pub fn add_subscription(&mut self, subscription: Subscription) {
        if subscription.is_default {
            for existing in &mut self.subscriptions {
                existing.is_default = false;
            }
        }
        match self
            .subscriptions
            .iter_mut()
            .find(|existing| existing.id.eq_ignore_ascii_case(&subscription.id))
        {
            Some(existing) => *existing = subscription,
            None => self.subscriptions.push(subscription),
        }
    }

    /// The subscription commands act on when none is named.
    #[must_use]
    pub fn default_subscription(&self) -> Option<&Subscription> {
        self.subscriptions
            .iter()
            .find(|subscription| subscription.is_default)
    }
}
