//! Record-replay round-trip integration test.
//!
//! Proves the record/replay harness works end-to-end:
//! 1. Record a suite against a local mock service, capturing a fixture.
//! 2. Inspect the fixture: test traffic only, credentials scrubbed.
//! 3. Replay from the fixture with no credentials and no network, and
//!    assert byte-identical command output.

use std::sync::{Mutex, MutexGuard};

use httpmock::prelude::*;
use serde_json::json;

use strato::adapters::canned::CANNED_ACCESS_TOKEN;
use strato::fixture::FixtureStore;
use strato::harness::env::{
    EnvRequirement, PLAYBACK_SUBSCRIPTION_ID, TEST_ENVIRONMENT_VAR, TEST_LOCATION_VAR,
    TEST_PASSWORD_VAR, TEST_SUBSCRIPTION_ID_VAR, TEST_USERNAME_VAR,
};
use strato::harness::CleanupLedger;
use strato::profile::Environment;
use strato::{HarnessError, RunMode, SuiteConfig, TestSuite};

const SUITE_NAME: &str = "roundtrip-suite";
const TEST_TITLE: &str = "records a full group deployment round trip";
/// Suite-specific requirement carrying the template URI into the fixture.
const TEMPLATE_URI_VAR: &str = "STRATO_TEST_TEMPLATE_URI";

/// Suites set and clear the strict-SSL override in the process
/// environment, so tests in this file serialize on one lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn mock_environment(base_url: &str) -> Environment {
    Environment {
        name: "staging".to_string(),
        portal_url: base_url.to_string(),
        resource_manager_url: base_url.to_string(),
        authority_url: base_url.to_string(),
        host_name_suffix: "localhost".to_string(),
    }
}

#[test]
fn record_then_replay_produces_identical_outputs() {
    let _guard = env_lock();
    let server = MockServer::start();
    let recordings = tempfile::tempdir().expect("recordings dir");
    let sub = PLAYBACK_SUBSCRIPTION_ID;
    let template_uri = format!("{}/templates/starter.json", server.base_url());

    // --- Phase 1: record against the mock service ---
    let config = SuiteConfig::new(SUITE_NAME)
        .with_mode(RunMode::Recording)
        .with_environment(mock_environment(&server.base_url()))
        .with_env(TEST_ENVIRONMENT_VAR, "staging")
        .with_env(TEST_USERNAME_VAR, "harness@strato-cloud.test")
        .with_env(TEST_PASSWORD_VAR, "recording-password")
        .with_env(TEST_SUBSCRIPTION_ID_VAR, sub)
        .with_env(TEST_LOCATION_VAR, "westshore")
        .with_env(TEMPLATE_URI_VAR, &template_uri)
        .with_requirement(EnvRequirement::required(TEST_LOCATION_VAR))
        .with_requirement(EnvRequirement::required(TEMPLATE_URI_VAR))
        .with_recordings_dir(recordings.path());
    let mut suite = TestSuite::new(config).expect("recording suite");
    assert!(suite.is_recording());

    let mut ledger = CleanupLedger::new();
    let group = suite.generate_id("RoundTripGroup", ledger.pool());
    let mut deployment_names = Vec::new();
    let deployment = suite.generate_id("RoundTripDeploy", &mut deployment_names);
    assert_eq!(group, "RoundTripGroup1");
    assert_eq!(deployment, "RoundTripDeploy1");

    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({
            "access_token": "live-secret-token",
            "expires_in": 14400
        }));
    });
    let subscriptions_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/subscriptions")
            .query_param("api-version", "2024-06-01");
        then.status(200).json_body(json!({
            "value": [{
                "subscriptionId": sub,
                "displayName": "Strato Test Subscription",
                "state": "Enabled"
            }]
        }));
    });
    let group_put = server.mock(|when, then| {
        when.method(PUT)
            .path(format!("/subscriptions/{sub}/resourcegroups/{group}"))
            .query_param("api-version", "2024-06-01");
        then.status(200).json_body(json!({
            "name": group,
            "location": "westshore",
            "properties": {"provisioningState": "Succeeded"}
        }));
    });
    let deployment_put = server.mock(|when, then| {
        when.method(PUT)
            .path(format!(
                "/subscriptions/{sub}/resourcegroups/{group}/deployments/{deployment}"
            ))
            .query_param("api-version", "2024-06-01");
        then.status(200).json_body(json!({
            "name": deployment,
            "properties": {"provisioningState": "Accepted", "mode": "Incremental"}
        }));
    });
    let deployment_get = server.mock(|when, then| {
        when.method(GET)
            .path(format!(
                "/subscriptions/{sub}/resourcegroups/{group}/deployments/{deployment}"
            ))
            .query_param("api-version", "2024-06-01");
        then.status(200).json_body(json!({
            "name": deployment,
            "properties": {"provisioningState": "Succeeded", "mode": "Incremental"}
        }));
    });
    let group_delete = server.mock(|when, then| {
        when.method(DELETE)
            .path(format!("/subscriptions/{sub}/resourcegroups/{group}"))
            .query_param("api-version", "2024-06-01");
        then.status(202);
    });

    suite.setup_suite().expect("recording setup");
    suite.setup_test(TEST_TITLE).expect("recording test setup");
    let location = suite.env_value(TEST_LOCATION_VAR).expect("location resolved");
    assert_eq!(location, "westshore");

    let created = suite
        .execute("group create {} --location {} --json", &[&group, &location])
        .expect("create executes");
    assert_eq!(created.exit_status, 0, "{}", created.error_text);

    let deployed = suite
        .execute(
            "group deployment create --template-uri {} -g {} -n {} --nowait --json",
            &[&template_uri, &group, &deployment],
        )
        .expect("deployment create executes");
    assert_eq!(deployed.exit_status, 0, "{}", deployed.error_text);

    let shown = suite
        .execute("group deployment show -g {} -n {} --json", &[&group, &deployment])
        .expect("show executes");
    assert_eq!(shown.exit_status, 0, "{}", shown.error_text);
    assert!(shown.text.contains(&deployment));

    let mut deletions = Vec::new();
    let drained = ledger
        .drain(|name| {
            let result = suite.execute("group delete {} --quiet", &[name])?;
            deletions.push(result);
            Ok::<(), HarnessError>(())
        })
        .expect("cleanup drain");
    assert_eq!(drained, 1);
    assert_eq!(deletions[0].exit_status, 0, "{}", deletions[0].error_text);

    suite.teardown_test().expect("recording test teardown");
    suite.teardown_suite().expect("recording suite teardown");

    // --- Phase 2: the fixture holds test traffic only, scrubbed ---
    let store = FixtureStore::new(recordings.path());
    let fixture = store.load(SUITE_NAME, TEST_TITLE).expect("fixture recorded");
    let methods: Vec<&str> = fixture
        .interactions
        .iter()
        .map(|interaction| interaction.method.as_str())
        .collect();
    assert_eq!(methods, ["PUT", "PUT", "GET", "DELETE"]);
    assert!(fixture
        .interactions
        .iter()
        .all(|interaction| !interaction.path.contains("/token")));
    assert!(fixture
        .interactions
        .iter()
        .all(|interaction| !interaction.path.starts_with("/subscriptions?")));
    assert_eq!(
        fixture.env.get(TEST_LOCATION_VAR).map(String::as_str),
        Some("westshore")
    );
    assert_eq!(
        fixture.env.get(TEMPLATE_URI_VAR).map(String::as_str),
        Some(template_uri.as_str())
    );
    let profile = fixture.profile.as_ref().expect("profile snapshot");
    let default = profile.default_subscription().expect("default subscription");
    assert_eq!(default.id, sub);
    for subscription in &profile.subscriptions {
        let token = subscription.access_token.as_ref().expect("token present");
        assert_eq!(token.token, CANNED_ACCESS_TOKEN, "token not scrubbed");
    }

    // --- Phase 3: replay with no credentials and no network ---
    let replay_config = SuiteConfig::new(SUITE_NAME)
        .with_mode(RunMode::Playback)
        .with_requirement(EnvRequirement::required(TEST_LOCATION_VAR))
        .with_requirement(EnvRequirement::required(TEMPLATE_URI_VAR))
        .with_recordings_dir(recordings.path());
    let mut replay = TestSuite::new(replay_config).expect("playback suite");
    assert!(replay.is_playback());

    let mut replay_ledger = CleanupLedger::new();
    let replay_group = replay.generate_id("RoundTripGroup", replay_ledger.pool());
    let mut replay_deployments = Vec::new();
    let replay_deployment = replay.generate_id("RoundTripDeploy", &mut replay_deployments);
    assert_eq!(replay_group, group, "mocked id generation must be reproducible");
    assert_eq!(replay_deployment, deployment);

    replay.setup_suite().expect("playback setup");
    replay.setup_test(TEST_TITLE).expect("playback test setup");
    assert_eq!(
        replay.env_value(TEMPLATE_URI_VAR).as_deref(),
        Some(template_uri.as_str()),
        "requirement values must replay from the fixture"
    );
    let replay_location = replay.env_value(TEST_LOCATION_VAR).expect("location from fixture");
    assert_eq!(replay_location, "westshore");

    let replay_created = replay
        .execute("group create {} --location {} --json", &[&replay_group, &replay_location])
        .expect("replayed create");
    let replay_deployed = replay
        .execute(
            "group deployment create --template-uri {} -g {} -n {} --nowait --json",
            &[&template_uri, &replay_group, &replay_deployment],
        )
        .expect("replayed deployment create");
    let replay_shown = replay
        .execute(
            "group deployment show -g {} -n {} --json",
            &[&replay_group, &replay_deployment],
        )
        .expect("replayed show");

    let mut replay_deletions = Vec::new();
    let replay_drained = replay_ledger
        .drain(|name| {
            let result = replay.execute("group delete {} --quiet", &[name])?;
            replay_deletions.push(result);
            Ok::<(), HarnessError>(())
        })
        .expect("replayed cleanup drain");
    assert_eq!(replay_drained, 1);

    replay.teardown_test().expect("every interaction must be consumed");
    replay.teardown_suite().expect("playback suite teardown");

    assert_eq!(replay_created.exit_status, 0, "{}", replay_created.error_text);
    assert_eq!(replay_created.text, created.text);
    assert_eq!(replay_deployed.exit_status, 0, "{}", replay_deployed.error_text);
    assert_eq!(replay_deployed.text, deployed.text);
    assert_eq!(replay_shown.exit_status, 0, "{}", replay_shown.error_text);
    assert_eq!(replay_shown.text, shown.text);
    assert_eq!(replay_deletions[0].text, deletions[0].text);

    // exactly one hit each: playback never reached the server
    token_mock.assert();
    subscriptions_mock.assert();
    group_put.assert();
    deployment_put.assert();
    deployment_get.assert();
    group_delete.assert();
}

#[test]
fn abandoned_recording_is_flushed_on_drop() {
    let _guard = env_lock();
    let server = MockServer::start();
    let recordings = tempfile::tempdir().expect("recordings dir");

    let token_mock = server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(200).json_body(json!({
            "access_token": "live-secret-token",
            "expires_in": 14400
        }));
    });
    let subscriptions_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/subscriptions")
            .query_param("api-version", "2024-06-01");
        then.status(200).json_body(json!({
            "value": [{
                "subscriptionId": PLAYBACK_SUBSCRIPTION_ID,
                "displayName": "Strato Test Subscription",
                "state": "Enabled"
            }]
        }));
    });

    let config = SuiteConfig::new("abandoned-suite")
        .with_mode(RunMode::Recording)
        .with_environment(mock_environment(&server.base_url()))
        .with_env(TEST_ENVIRONMENT_VAR, "staging")
        .with_env(TEST_USERNAME_VAR, "harness@strato-cloud.test")
        .with_env(TEST_PASSWORD_VAR, "recording-password")
        .with_env(TEST_SUBSCRIPTION_ID_VAR, PLAYBACK_SUBSCRIPTION_ID)
        .with_recordings_dir(recordings.path());
    let mut suite = TestSuite::new(config).expect("recording suite");
    suite.setup_suite().expect("recording setup");
    suite.setup_test("dies before teardown").expect("test setup");
    drop(suite);
    token_mock.assert();
    subscriptions_mock.assert();

    let fixture = FixtureStore::new(recordings.path())
        .load("abandoned-suite", "dies before teardown")
        .expect("fixture flushed on drop");
    assert!(fixture.interactions.is_empty());
    assert!(fixture.env.is_empty());
    let profile = fixture.profile.as_ref().expect("profile snapshot");
    for subscription in &profile.subscriptions {
        let token = subscription.access_token.as_ref().expect("token present");
        assert_eq!(token.token, CANNED_ACCESS_TOKEN, "token not scrubbed on the drop path");
    }
}
