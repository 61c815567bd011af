//! The login step suites perform at setup: acquire a token, list
//! subscriptions, and persist a profile with the target subscription
//! made default.

use crate::error::HarnessError;
use crate::ports::account::AccountClient;
use crate::ports::profile_store::ProfileStore;
use crate::profile::Subscription;

/// Credentials and targets resolved from the suite's environment.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    /// Profile environment to log into.
    pub environment: String,
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Subscription id to make the default, matched case-insensitively.
    pub subscription_id: String,
}

/// Performs the login against the given ports and saves the resulting
/// profile.
///
/// Every listed subscription is added to the profile with the acquired
/// token attached; the one matching `subscription_id` becomes the
/// default. Mirrors what an interactive `strato login` would leave
/// behind.
///
/// # Errors
///
/// Returns an error if the environment is unknown, the account calls
/// fail, no subscription matches the target id, or the profile cannot be
/// persisted.
pub fn perform_login(
    account: &dyn AccountClient,
    store: &dyn ProfileStore,
    credentials: &LoginCredentials,
) -> Result<(), HarnessError> {
    let mut profile = store
        .load()
        .map_err(|err| HarnessError::ProfileStore(err.to_string()))?;
    let environment = profile
        .environment(&credentials.environment)
        .cloned()
        .ok_or_else(|| HarnessError::UnknownEnvironment(credentials.environment.clone()))?;

    let token = account
        .acquire_token(&environment, &credentials.username, &credentials.password)
        .map_err(|err| HarnessError::Login(err.to_string()))?;
    let records = account
        .list_subscriptions(&environment, &token)
        .map_err(|err| HarnessError::Login(err.to_string()))?;

    tracing::debug!(
        environment = %environment.name,
        subscriptions = records.len(),
        "login acquired token"
    );

    let mut default_found = false;
    for record in records {
        let is_default = record.id.eq_ignore_ascii_case(&credentials.subscription_id);
        default_found |= is_default;
        profile.add_subscription(Subscription {
            id: record.id,
            name: record.name,
            environment_name: environment.name.clone(),
            username: credentials.username.clone(),
            is_default,
            access_token: Some(token.clone()),
        });
    }
    if !default_found {
        return Err(HarnessError::NoMatchingSubscription(
            credentials.subscription_id.clone(),
        ));
    }

    store
        .save(&profile)
        .map_err(|err| HarnessError::ProfileStore(err.to_string()))
}
