//! Deployment scenarios replayed from checked-in fixtures.
//!
//! These run in playback by default, so they pass offline with no
//! credentials. Re-record against a real environment by exporting
//! `STRATO_TEST_MODE=record` and the credential variables.

use strato::harness::env::{EnvRequirement, TEST_LOCATION_VAR};
use strato::harness::CleanupLedger;
use strato::{SuiteConfig, TestSuite};

const TEMPLATE_FILE: &str = "tests/data/deployment-template.json";
const PARAMETERS_FILE: &str = "tests/data/deployment-parameters.json";

fn deployment_suite() -> TestSuite {
    TestSuite::new(
        SuiteConfig::new("deployment-tests")
            .with_requirement(EnvRequirement::with_default(TEST_LOCATION_VAR, "westshore")),
    )
    .expect("suite")
}

#[test]
fn deployment_create_show_and_list() {
    let mut suite = deployment_suite();
    suite.setup_suite().expect("suite setup");
    suite.setup_test("deployment create show and list").expect("test setup");

    let location = suite.env_value(TEST_LOCATION_VAR).expect("location");
    let mut ledger = CleanupLedger::new();
    let group = suite.generate_id("TestGroup", ledger.pool());
    let mut deployments = Vec::new();
    let deployment = suite.generate_id("Deploy", &mut deployments);

    let created = suite
        .execute("group create {} --location {} --json", &[&group, &location])
        .expect("group create");
    assert_eq!(created.exit_status, 0, "{}", created.error_text);
    assert!(created.text.contains(&group));

    let deployed = suite
        .execute(
            "group deployment create -f {} -g {} -n {} -e {} --nowait --json",
            &[TEMPLATE_FILE, &group, &deployment, PARAMETERS_FILE],
        )
        .expect("deployment create");
    assert_eq!(deployed.exit_status, 0, "{}", deployed.error_text);
    assert!(deployed.text.contains("Accepted"));

    let shown = suite
        .execute("group deployment show -g {} -n {} --json", &[&group, &deployment])
        .expect("deployment show");
    assert_eq!(shown.exit_status, 0, "{}", shown.error_text);
    assert!(shown.text.contains(&deployment));

    let listed = suite
        .execute("group deployment list -g {} --state Running", &[&group])
        .expect("deployment list");
    assert_eq!(listed.exit_status, 0, "{}", listed.error_text);
    assert!(listed.text.contains(&deployment));

    let drained = ledger
        .drain(|name| suite.execute("group delete {} --quiet", &[name]).map(drop))
        .expect("cleanup");
    assert_eq!(drained, 1);

    suite.teardown_test().expect("test teardown");
    suite.teardown_suite().expect("suite teardown");
}

#[test]
fn deployment_stop_needs_a_name_when_several_are_active() {
    let mut suite = deployment_suite();
    suite.setup_suite().expect("suite setup");
    suite
        .setup_test("deployment stop needs a name when several are active")
        .expect("test setup");

    let mut pool = Vec::new();
    let group = suite.generate_id("TestGroup", &mut pool);
    let result = suite
        .execute("group deployment stop -g {} -q", &[&group])
        .expect("stop executes");
    assert_eq!(result.exit_status, 1);
    assert_eq!(
        result.error_text.trim_end(),
        "There are more than 1 deployment in either \"Running\" or \"Accepted\" state, please name one."
    );

    suite.teardown_test().expect("test teardown");
    suite.teardown_suite().expect("suite teardown");
}

#[test]
fn deployment_stop_finds_the_only_active_deployment() {
    let mut suite = deployment_suite();
    suite.setup_suite().expect("suite setup");
    suite
        .setup_test("deployment stop finds the only active deployment")
        .expect("test setup");

    let mut pool = Vec::new();
    let group = suite.generate_id("TestGroup", &mut pool);
    let result = suite
        .execute("group deployment stop -g {} -q", &[&group])
        .expect("stop executes");
    assert_eq!(result.exit_status, 0, "{}", result.error_text);
    assert!(result.text.contains("deployment Deploy1 stopped"));

    suite.teardown_test().expect("test teardown");
    suite.teardown_suite().expect("suite teardown");
}

#[test]
fn deployment_stop_cancels_a_named_deployment() {
    let mut suite = deployment_suite();
    suite.setup_suite().expect("suite setup");
    suite
        .setup_test("deployment stop cancels a named deployment")
        .expect("test setup");

    let mut pool = Vec::new();
    let group = suite.generate_id("TestGroup", &mut pool);
    let result = suite
        .execute("group deployment stop -g {} -n {} -q", &[&group, "Deploy2"])
        .expect("stop executes");
    assert_eq!(result.exit_status, 0, "{}", result.error_text);
    assert!(result.text.contains("deployment Deploy2 stopped"));

    suite.teardown_test().expect("test teardown");
    suite.teardown_suite().expect("suite teardown");
}

#[test]
fn deployment_create_rejects_conflicting_template_sources() {
    let mut suite = deployment_suite();
    suite.setup_suite().expect("suite setup");
    suite
        .setup_test("deployment create rejects conflicting template sources")
        .expect("test setup");

    let mut pool = Vec::new();
    let group = suite.generate_id("TestGroup", &mut pool);
    // rejected before any request is issued, so the fixture is empty
    let result = suite
        .execute(
            "group deployment create -f {} --template-uri {} -g {} -n {} --nowait",
            &[
                TEMPLATE_FILE,
                "https://templates.strato-cloud.test/starter.json",
                &group,
                "Deploy1",
            ],
        )
        .expect("create executes");
    assert_eq!(result.exit_status, 1);
    assert_eq!(
        result.error_text.trim_end(),
        "Specify exactly one of the --template-file or --template-uri options."
    );

    suite.teardown_test().expect("test teardown");
    suite.teardown_suite().expect("suite teardown");
}
