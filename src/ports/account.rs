//! Account port for token acquisition and subscription listing.

use crate::profile::{AccessToken, Environment};

/// Errors from account operations.
pub type AccountError = Box<dyn std::error::Error + Send + Sync>;

/// One subscription as the account service reports it, before it becomes
/// part of the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRecord {
    /// Subscription id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Service-side state, e.g. `Enabled`.
    pub state: String,
}

/// Authenticates accounts and lists what they can use.
///
/// Abstracting the account service lets mocked runs substitute a canned
/// client that hands out a fixed token, so tests never need real
/// credentials.
pub trait AccountClient: Send + Sync {
    /// Acquires a bearer token for the given account in the given
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the authority rejects the credentials or the
    /// request fails.
    fn acquire_token(
        &self,
        environment: &Environment,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, AccountError>;

    /// Lists the subscriptions the token's account can see.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing request fails.
    fn list_subscriptions(
        &self,
        environment: &Environment,
        token: &AccessToken,
    ) -> Result<Vec<SubscriptionRecord>, AccountError>;
}
