//! Records HTTP interactions into a fixture.

use std::collections::BTreeMap;

use chrono::Utc;

use super::format::{Fixture, HttpInteraction};
use crate::ports::http::HttpResponse;
use crate::profile::Profile;

/// Interesting response headers carried into fixtures. Everything else
/// (dates, request ids, connection bookkeeping) would only churn diffs.
const KEPT_RESPONSE_HEADERS: &[&str] = &["content-type", "location", "retry-after"];

/// Accumulates interactions for one test and assembles the fixture.
///
/// The recorder never touches disk; [`super::store::FixtureStore`] owns
/// file naming and writing.
#[derive(Debug)]
pub struct InteractionRecorder {
    name: String,
    interactions: Vec<HttpInteraction>,
    next_seq: u64,
}

impl InteractionRecorder {
    /// Creates a recorder for the test with the given title.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interactions: Vec::new(),
            next_seq: 0,
        }
    }

    /// Records one interaction. The `seq` field is assigned automatically
    /// and request headers are deliberately not captured, so credentials
    /// never reach disk.
    pub fn record(
        &mut self,
        method: &str,
        path: &str,
        request_body: Option<String>,
        response: &HttpResponse,
    ) {
        let mut response_headers = BTreeMap::new();
        for name in KEPT_RESPONSE_HEADERS {
            if let Some(value) = response.headers.get(*name) {
                response_headers.insert((*name).to_string(), value.clone());
            }
        }
        let interaction = HttpInteraction {
            seq: self.next_seq,
            method: method.to_string(),
            path: path.to_string(),
            request_body,
            status: response.status,
            response_headers,
            response_body: response.body.clone(),
        };
        self.next_seq += 1;
        self.interactions.push(interaction);
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing was recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Finishes recording and assembles the fixture, attaching the
    /// requirement values and profile snapshot playback will need.
    #[must_use]
    pub fn finish(self, env: BTreeMap<String, String>, profile: Option<Profile>) -> Fixture {
        Fixture {
            name: self.name,
            recorded_at: Utc::now(),
            env,
            profile,
            interactions: self.interactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("x-request-id".to_string(), "noise".to_string());
        HttpResponse {
            status,
            headers,
            body: body.to_string(),
        }
    }

    #[test]
    fn record_assigns_sequence_numbers() {
        let mut recorder = InteractionRecorder::new("creates a group");
        recorder.record("PUT", "/a?api-version=1", Some("{}".into()), &response(201, "{}"));
        recorder.record("GET", "/a?api-version=1", None, &response(200, "{}"));
        recorder.record("DELETE", "/a?api-version=1", None, &response(202, ""));
        assert_eq!(recorder.len(), 3);

        let fixture = recorder.finish(BTreeMap::new(), None);
        assert_eq!(fixture.name, "creates a group");
        assert_eq!(fixture.interactions[0].seq, 0);
        assert_eq!(fixture.interactions[1].seq, 1);
        assert_eq!(fixture.interactions[2].seq, 2);
        assert_eq!(fixture.interactions[1].method, "GET");
    }

    #[test]
    fn noisy_response_headers_are_dropped() {
        let mut recorder = InteractionRecorder::new("headers");
        recorder.record("GET", "/a", None, &response(200, "{}"));
        let fixture = recorder.finish(BTreeMap::new(), None);
        let headers = &fixture.interactions[0].response_headers;
        assert_eq!(headers.get("content-type").map(String::as_str), Some("application/json"));
        assert!(!headers.contains_key("x-request-id"));
    }

    #[test]
    fn finish_carries_env_and_profile() {
        let mut env = BTreeMap::new();
        env.insert("STRATO_TEST_LOCATION".to_string(), "westshore".to_string());
        let recorder = InteractionRecorder::new("empty");
        assert!(recorder.is_empty());
        let fixture = recorder.finish(env.clone(), Some(Profile::bootstrap()));
        assert_eq!(fixture.env, env);
        assert!(fixture.profile.is_some());
    }
}
