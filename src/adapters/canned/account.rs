//! Canned account client replacing real authentication in playback.

use chrono::{Duration, Utc};

use crate::ports::account::{AccountClient, AccountError, SubscriptionRecord};
use crate::profile::{AccessToken, Environment};

/// The token text mocked logins hand out and fixture scrubbing writes
/// over real tokens.
pub const CANNED_ACCESS_TOKEN: &str = "canned-access-token";

/// Lifetime granted to canned tokens.
const TOKEN_LIFETIME_HOURS: i64 = 4;

/// Answers every login with a fixed token and a single enabled
/// subscription, so playback needs neither credentials nor network.
pub struct CannedAccountClient {
    subscription_id: String,
    subscription_name: String,
}

impl CannedAccountClient {
    /// Creates a client whose one subscription carries the given id.
    #[must_use]
    pub fn new(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            subscription_name: "Strato Test Subscription".to_string(),
        }
    }
}

impl AccountClient for CannedAccountClient {
    fn acquire_token(
        &self,
        _environment: &Environment,
        _username: &str,
        _password: &str,
    ) -> Result<AccessToken, AccountError> {
        Ok(AccessToken {
            token: CANNED_ACCESS_TOKEN.to_string(),
            expires_at: Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS),
        })
    }

    fn list_subscriptions(
        &self,
        _environment: &Environment,
        _token: &AccessToken,
    ) -> Result<Vec<SubscriptionRecord>, AccountError> {
        Ok(vec![SubscriptionRecord {
            id: self.subscription_id.clone(),
            name: self.subscription_name.clone(),
            state: "Enabled".to_string(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    #[test]
    fn token_is_fixed_and_expires_in_four_hours() {
        let client = CannedAccountClient::new("sub-1");
        let environment = Profile::bootstrap().environments[0].clone();
        let before = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS) - Duration::minutes(1);
        let token = client.acquire_token(&environment, "u", "p").unwrap();
        let after = Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS) + Duration::minutes(1);

        assert_eq!(token.token, CANNED_ACCESS_TOKEN);
        assert!(token.expires_at > before && token.expires_at < after);
    }

    #[test]
    fn listing_yields_the_configured_subscription() {
        let client = CannedAccountClient::new("sub-42");
        let environment = Profile::bootstrap().environments[0].clone();
        let token = client.acquire_token(&environment, "u", "p").unwrap();
        let subscriptions = client.list_subscriptions(&environment, &token).unwrap();
        assert_eq!(subscriptions.len(), 1);
        assert_eq!(subscriptions[0].id, "sub-42");
        assert_eq!(subscriptions[0].state, "Enabled");
    }
}
