//! Fixture data structures for recording and replaying HTTP traffic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// A single recorded HTTP interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpInteraction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Request method, uppercase.
    pub method: String,
    /// Path and query of the request. The host is never recorded, so a
    /// fixture replays against any endpoint.
    pub path: String,
    /// Request body, kept only when strict body matching wants it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    /// Response status code.
    pub status: u16,
    /// Response headers worth replaying (content type and the like).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub response_headers: BTreeMap<String, String>,
    /// Response body text.
    #[serde(default)]
    pub response_body: String,
}

/// One test's recorded traffic plus the session state needed to replay it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    /// The test title this fixture belongs to.
    pub name: String,
    /// When this fixture was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Requirement values captured at recording time and reapplied at
    /// playback, e.g. the test location.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Profile snapshot reconstructing the logged-in session without any
    /// network traffic. Tokens are scrubbed before the snapshot is taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    /// Ordered list of interactions.
    pub interactions: Vec<HttpInteraction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fixture() -> Fixture {
        let mut env = BTreeMap::new();
        env.insert("STRATO_TEST_LOCATION".to_string(), "westshore".to_string());
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Fixture {
            name: "creates a group".into(),
            recorded_at: Utc::now(),
            env,
            profile: Some(Profile::bootstrap()),
            interactions: vec![
                HttpInteraction {
                    seq: 0,
                    method: "PUT".into(),
                    path: "/subscriptions/abc/resourcegroups/g1?api-version=2024-06-01".into(),
                    request_body: Some("{\"location\":\"westshore\"}".into()),
                    status: 201,
                    response_headers: headers,
                    response_body: "{\"name\":\"g1\"}".into(),
                },
                HttpInteraction {
                    seq: 1,
                    method: "DELETE".into(),
                    path: "/subscriptions/abc/resourcegroups/g1?api-version=2024-06-01".into(),
                    request_body: None,
                    status: 202,
                    response_headers: BTreeMap::new(),
                    response_body: String::new(),
                },
            ],
        }
    }

    #[test]
    fn yaml_round_trip() {
        let fixture = sample_fixture();
        let yaml = serde_yaml::to_string(&fixture).expect("serialize");
        let deserialized: Fixture = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(fixture, deserialized);
    }

    #[test]
    fn omitted_fields_default_on_parse() {
        let yaml = "name: bare\nrecorded_at: 2026-01-05T00:00:00Z\ninteractions: []\n";
        let fixture: Fixture = serde_yaml::from_str(yaml).expect("deserialize");
        assert!(fixture.env.is_empty());
        assert!(fixture.profile.is_none());
        assert!(fixture.interactions.is_empty());
    }
}
