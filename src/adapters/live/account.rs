//! Live account client calling the token authority and subscription API.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::API_VERSION;
use crate::ports::account::{AccountClient, AccountError, SubscriptionRecord};
use crate::ports::http::{HttpRequest, HttpTransport};
use crate::profile::{AccessToken, Environment};

/// Authenticates against the environment's authority endpoint and lists
/// subscriptions from its resource manager, all through the transport
/// port so recording captures this traffic too when it happens inside a
/// test body.
pub struct HttpAccountClient {
    transport: Arc<dyn HttpTransport>,
}

impl HttpAccountClient {
    /// Creates a client that sends through the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct SubscriptionList {
    value: Vec<SubscriptionEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriptionEntry {
    subscription_id: String,
    display_name: String,
    state: String,
}

impl AccountClient for HttpAccountClient {
    fn acquire_token(
        &self,
        environment: &Environment,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, AccountError> {
        let body = serde_json::to_string(&TokenRequest {
            grant_type: "password",
            username,
            password,
        })?;
        let request = HttpRequest::new("POST", format!("{}/token", environment.authority_url))
            .header("content-type", "application/json")
            .body(body);
        let response = self.transport.send(&request)?;
        if !response.is_success() {
            return Err(format!("token endpoint returned {}", response.status).into());
        }
        let parsed: TokenResponse = serde_json::from_str(&response.body)?;
        Ok(AccessToken {
            token: parsed.access_token,
            expires_at: Utc::now() + Duration::seconds(parsed.expires_in),
        })
    }

    fn list_subscriptions(
        &self,
        environment: &Environment,
        token: &AccessToken,
    ) -> Result<Vec<SubscriptionRecord>, AccountError> {
        let request = HttpRequest::new(
            "GET",
            format!(
                "{}/subscriptions?api-version={API_VERSION}",
                environment.resource_manager_url
            ),
        )
        .header("authorization", &format!("Bearer {}", token.token));
        let response = self.transport.send(&request)?;
        if !response.is_success() {
            return Err(format!("subscription listing returned {}", response.status).into());
        }
        let parsed: SubscriptionList = serde_json::from_str(&response.body)?;
        Ok(parsed
            .value
            .into_iter()
            .map(|entry| SubscriptionRecord {
                id: entry.subscription_id,
                name: entry.display_name,
                state: entry.state,
            })
            .collect())
    }
}
