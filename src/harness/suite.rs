//! Suite and test lifecycle: wires transports, credentials and fixtures
//! for the selected run mode and drives CLI invocations in-process.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use crate::adapters::canned::{
    canned_profile, CannedAccountClient, FixedConfig, MemoryProfileStore, CANNED_ACCESS_TOKEN,
};
use crate::adapters::live::{DiskProfileStore, FileConfig, HttpAccountClient, LiveTransport};
use crate::adapters::playback::PlaybackTransport;
use crate::adapters::recording::RecordingTransport;
use crate::context::ServiceContext;
use crate::error::HarnessError;
use crate::fixture::player::{BodyMatching, InteractionPlayer, MatchOrder};
use crate::fixture::recorder::InteractionRecorder;
use crate::fixture::store::FixtureStore;
use crate::harness::env::{self, EnvRequirement};
use crate::harness::login::{perform_login, LoginCredentials};
use crate::harness::{idgen, template, RunMode};
use crate::ports::http::HttpTransport;
use crate::profile::{Environment, Profile};

/// Fixture root used when neither the config nor the environment names
/// one.
const DEFAULT_RECORDINGS_DIR: &str = "tests/recordings";

/// Result of one in-process CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Process exit status the invocation would have had.
    pub exit_status: i32,
    /// Captured stdout.
    pub text: String,
    /// Captured stderr.
    pub error_text: String,
}

impl ExecutionResult {
    /// Whether the invocation reported success.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_status == 0
    }
}

/// Static description of a test suite.
///
/// Fields are public for struct-literal construction; the `with_`
/// builders cover the common cases.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Suite name; fixtures land under this directory.
    pub name: String,
    /// Environment variables the suite's tests need resolved.
    pub requirements: Vec<EnvRequirement>,
    /// Whether setup performs a login. Suites exercising only parse-level
    /// behavior can skip it.
    pub requires_token: bool,
    /// Forced run mode; `None` reads [`env::TEST_MODE_VAR`].
    pub mode: Option<RunMode>,
    /// Scoped variable overrides consulted before the process
    /// environment. Later entries win.
    pub env: Vec<(String, String)>,
    /// Extra profile environment registered before login, typically a
    /// local mock server.
    pub environment: Option<Environment>,
    /// CLI home directory; `None` uses a scratch directory that is
    /// removed at suite teardown.
    pub home_dir: Option<PathBuf>,
    /// Fixture store root; `None` consults [`env::RECORDINGS_DIR_VAR`]
    /// and then falls back to `tests/recordings`.
    pub recordings_dir: Option<PathBuf>,
    /// Playback interaction ordering.
    pub order: MatchOrder,
    /// Playback body comparison.
    pub body_matching: BodyMatching,
}

impl SuiteConfig {
    /// A suite with strict playback ordering, relaxed bodies, login
    /// enabled and mode taken from the environment.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: Vec::new(),
            requires_token: true,
            mode: None,
            env: Vec::new(),
            environment: None,
            home_dir: None,
            recordings_dir: None,
            order: MatchOrder::default(),
            body_matching: BodyMatching::default(),
        }
    }

    /// Forces the run mode instead of reading the environment.
    #[must_use]
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Adds a requirement resolved at each `setup_test`.
    #[must_use]
    pub fn with_requirement(mut self, requirement: EnvRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Adds a scoped variable override.
    #[must_use]
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((name.into(), value.into()));
        self
    }

    /// Registers an extra profile environment before login.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Pins the CLI home directory.
    #[must_use]
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Pins the fixture store root.
    #[must_use]
    pub fn with_recordings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recordings_dir = Some(dir.into());
        self
    }

    /// Compares recorded request bodies during playback.
    #[must_use]
    pub fn strict_bodies(mut self) -> Self {
        self.body_matching = BodyMatching::Strict;
        self
    }

    /// Lets playback match interactions out of order.
    #[must_use]
    pub fn relaxed_order(mut self) -> Self {
        self.order = MatchOrder::Relaxed;
        self
    }

    /// Skips the login at suite setup.
    #[must_use]
    pub fn skip_login(mut self) -> Self {
        self.requires_token = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SuitePhase {
    Created,
    SuiteActive,
    TestActive,
    Finished,
}

impl SuitePhase {
    fn name(self) -> &'static str {
        match self {
            SuitePhase::Created => "created",
            SuitePhase::SuiteActive => "between tests",
            SuitePhase::TestActive => "inside a test",
            SuitePhase::Finished => "finished",
        }
    }
}

/// Concrete transport handle kept alongside the type-erased context, so
/// the lifecycle can reach mode-specific operations.
#[derive(Clone)]
enum TransportHandle {
    Live(Arc<LiveTransport>),
    Recording(Arc<RecordingTransport>),
    Playback(Arc<PlaybackTransport>),
}

/// Drives one suite through setup, tests and teardown.
///
/// ```text
/// new -> setup_suite -> (setup_test -> execute* -> teardown_test)* -> teardown_suite
/// ```
///
/// Lifecycle methods called out of that order fail with
/// [`HarnessError::Lifecycle`] instead of corrupting state.
pub struct TestSuite {
    config: SuiteConfig,
    mode: RunMode,
    phase: SuitePhase,
    context: ServiceContext,
    transport: TransportHandle,
    memory_store: Option<Arc<MemoryProfileStore>>,
    store: FixtureStore,
    home_dir: PathBuf,
    owns_home: bool,
    current_test: Option<String>,
    resolved_env: BTreeMap<String, String>,
    fixture_env: BTreeMap<String, String>,
    strict_ssl_set: bool,
}

impl TestSuite {
    /// Builds the suite's context for the selected run mode. No network
    /// traffic happens here; login waits for [`TestSuite::setup_suite`].
    ///
    /// # Errors
    ///
    /// Returns an error on an invalid run-mode value or when the live
    /// HTTP client cannot be constructed.
    pub fn new(config: SuiteConfig) -> Result<Self, HarnessError> {
        let mode = match config.mode {
            Some(mode) => mode,
            None => match ambient_lookup(&config.env, env::TEST_MODE_VAR) {
                Some(value) => RunMode::parse(&value)?,
                None => RunMode::default(),
            },
        };
        let home_dir = config.home_dir.clone().unwrap_or_else(scratch_home);
        let owns_home = config.home_dir.is_none();
        let recordings_root = config
            .recordings_dir
            .clone()
            .or_else(|| ambient_lookup(&config.env, env::RECORDINGS_DIR_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RECORDINGS_DIR));
        let store = FixtureStore::new(recordings_root);

        let (context, transport, memory_store) = match mode {
            RunMode::Live => {
                let live = Arc::new(LiveTransport::new()?);
                let transport_dyn: Arc<dyn HttpTransport> = live.clone();
                let bootstrap = seed_profile(Profile::bootstrap(), config.environment.as_ref());
                let context = ServiceContext {
                    account: Arc::new(HttpAccountClient::new(Arc::clone(&transport_dyn))),
                    profile_store: Arc::new(DiskProfileStore::with_bootstrap(&home_dir, bootstrap)),
                    config: Arc::new(FileConfig::new(&home_dir)),
                    transport: transport_dyn,
                };
                (context, TransportHandle::Live(live), None)
            }
            RunMode::Recording => {
                let recording = Arc::new(RecordingTransport::new(LiveTransport::new()?));
                let transport_dyn: Arc<dyn HttpTransport> = recording.clone();
                let seed = seed_profile(canned_profile(), config.environment.as_ref());
                let memory = Arc::new(MemoryProfileStore::new(seed));
                let context = ServiceContext {
                    account: Arc::new(HttpAccountClient::new(Arc::clone(&transport_dyn))),
                    profile_store: memory.clone(),
                    config: Arc::new(FixedConfig::mocked()),
                    transport: transport_dyn,
                };
                (context, TransportHandle::Recording(recording), Some(memory))
            }
            RunMode::Playback => {
                let playback = Arc::new(PlaybackTransport::new());
                let transport_dyn: Arc<dyn HttpTransport> = playback.clone();
                let seed = seed_profile(canned_profile(), config.environment.as_ref());
                let memory = Arc::new(MemoryProfileStore::new(seed));
                let subscription_id = ambient_lookup(&config.env, env::TEST_SUBSCRIPTION_ID_VAR)
                    .unwrap_or_else(|| env::PLAYBACK_SUBSCRIPTION_ID.to_string());
                let context = ServiceContext {
                    account: Arc::new(CannedAccountClient::new(subscription_id)),
                    profile_store: memory.clone(),
                    config: Arc::new(FixedConfig::mocked()),
                    transport: transport_dyn,
                };
                (context, TransportHandle::Playback(playback), Some(memory))
            }
        };

        Ok(Self {
            config,
            mode,
            phase: SuitePhase::Created,
            context,
            transport,
            memory_store,
            store,
            home_dir,
            owns_home,
            current_test: None,
            resolved_env: BTreeMap::new(),
            fixture_env: BTreeMap::new(),
            strict_ssl_set: false,
        })
    }

    /// Suite name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The run mode this suite resolved to.
    #[must_use]
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Whether the suite runs against substituted session state.
    #[must_use]
    pub fn is_mocked(&self) -> bool {
        self.mode.is_mocked()
    }

    /// Whether this run captures fixtures.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.mode == RunMode::Recording
    }

    /// Whether this run replays fixtures.
    #[must_use]
    pub fn is_playback(&self) -> bool {
        self.mode == RunMode::Playback
    }

    /// The context commands run against, for tests that drive ports
    /// directly.
    #[must_use]
    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// The fixture store this suite records to and replays from.
    #[must_use]
    pub fn fixture_store(&self) -> &FixtureStore {
        &self.store
    }

    /// One-time suite setup: wipes CLI cache state, applies the
    /// strict-SSL override for mocked modes, and logs in unless the
    /// config skips it.
    ///
    /// # Errors
    ///
    /// Returns an error when called out of order, when required
    /// credential variables are missing, or when the login fails.
    pub fn setup_suite(&mut self) -> Result<(), HarnessError> {
        self.expect_phase(SuitePhase::Created, "setup_suite")?;
        tracing::debug!(suite = %self.config.name, mode = ?self.mode, "setting up suite");
        if self.mode.is_mocked() {
            // reverted in teardown_suite, with a Drop backstop
            std::env::set_var(env::STRICT_SSL_VAR, "false");
            self.strict_ssl_set = true;
        }
        self.remove_cache_files()?;
        if self.config.requires_token {
            self.do_login()?;
        }
        self.phase = SuitePhase::SuiteActive;
        Ok(())
    }

    /// Per-test setup: installs the fixture player or recorder for the
    /// titled test and resolves the suite's requirements.
    ///
    /// # Errors
    ///
    /// Returns an error when called out of order, when playback finds no
    /// fixture for the title, or when requirements are missing.
    pub fn setup_test(&mut self, title: &str) -> Result<(), HarnessError> {
        self.expect_phase(SuitePhase::SuiteActive, "setup_test")?;
        self.fixture_env.clear();
        let transport = self.transport.clone();
        match &transport {
            TransportHandle::Playback(playback) => {
                let fixture = self.store.load(&self.config.name, title)?;
                tracing::debug!(
                    suite = %self.config.name,
                    test = title,
                    interactions = fixture.interactions.len(),
                    "fixture loaded"
                );
                self.fixture_env = fixture.env.clone();
                if let (Some(profile), Some(store)) = (&fixture.profile, &self.memory_store) {
                    store.replace(profile.clone());
                }
                playback.install(InteractionPlayer::new(
                    &fixture,
                    self.config.order,
                    self.config.body_matching,
                ));
            }
            TransportHandle::Recording(recording) => {
                recording.begin_test(InteractionRecorder::new(title));
            }
            TransportHandle::Live(_) => {}
        }
        self.resolved_env =
            env::resolve_requirements(&self.config.requirements, |name| self.lookup_env(name))?;
        self.current_test = Some(title.to_string());
        self.phase = SuitePhase::TestActive;
        Ok(())
    }

    /// Runs one CLI invocation in-process with captured output. The
    /// template's `{}` slots are substituted positionally and the result
    /// is tokenized with shell quoting rules.
    ///
    /// A non-zero exit status is reported in the result, not as an
    /// error; the harness never lets a command kill the test process.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a test or when the template
    /// and arguments disagree.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<ExecutionResult, HarnessError> {
        self.expect_phase(SuitePhase::TestActive, "execute")?;
        let mut argv = vec!["strato".to_string()];
        argv.extend(template::build_argv(command, args)?);
        tracing::debug!(suite = %self.config.name, command = %argv[1..].join(" "), "executing");
        Ok(crate::run_captured(&argv, &self.context))
    }

    /// Generates a resource name, deterministic in mocked modes. See
    /// [`idgen::generate_id`].
    pub fn generate_id(&self, placeholder: &str, existing: &mut Vec<String>) -> String {
        idgen::generate_id(placeholder, existing, self.is_mocked())
    }

    /// Resolves a variable through the harness layers: values resolved at
    /// `setup_test`, then the replaying fixture's captured values, then
    /// the config's scoped overrides, then the process environment.
    #[must_use]
    pub fn env_value(&self, name: &str) -> Option<String> {
        self.resolved_env
            .get(name)
            .cloned()
            .or_else(|| self.lookup_env(name))
    }

    /// Per-test teardown: closes the recording window and writes the
    /// fixture, or closes the player and fails on latched mismatches and
    /// leftover interactions.
    ///
    /// # Errors
    ///
    /// Returns an error when called out of order, when the fixture cannot
    /// be written, or when playback left a mismatch or unconsumed
    /// interactions behind.
    pub fn teardown_test(&mut self) -> Result<(), HarnessError> {
        self.expect_phase(SuitePhase::TestActive, "teardown_test")?;
        self.current_test.take();
        // reset phase first so a failure here still allows suite teardown
        self.phase = SuitePhase::SuiteActive;
        let transport = self.transport.clone();
        match &transport {
            TransportHandle::Recording(recording) => {
                if let Some(recorder) = recording.take_recorder() {
                    let profile = self
                        .memory_store
                        .as_ref()
                        .and_then(|store| store.saved())
                        .map(scrub_profile);
                    let fixture = recorder.finish(self.resolved_env.clone(), profile);
                    let path = self.store.write(&self.config.name, &fixture)?;
                    tracing::debug!(
                        path = %path.display(),
                        interactions = fixture.interactions.len(),
                        "fixture recorded"
                    );
                }
            }
            TransportHandle::Playback(playback) => {
                if let Some(player) = playback.take_player() {
                    player.finish()?;
                }
            }
            TransportHandle::Live(_) => {}
        }
        Ok(())
    }

    /// One-time suite teardown: clears the strict-SSL override and
    /// removes the scratch home directory.
    ///
    /// # Errors
    ///
    /// Returns an error when called out of order, including while a test
    /// is still active.
    pub fn teardown_suite(&mut self) -> Result<(), HarnessError> {
        self.expect_phase(SuitePhase::SuiteActive, "teardown_suite")?;
        self.clear_strict_ssl();
        if self.owns_home {
            if let Err(e) = std::fs::remove_dir_all(&self.home_dir) {
                tracing::warn!(home = %self.home_dir.display(), error = %e, "scratch home not removed");
            }
        }
        self.phase = SuitePhase::Finished;
        Ok(())
    }

    fn expect_phase(&self, expected: SuitePhase, operation: &'static str) -> Result<(), HarnessError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(HarnessError::Lifecycle {
                suite: self.config.name.clone(),
                operation,
                phase: self.phase.name(),
            })
        }
    }

    fn lookup_env(&self, name: &str) -> Option<String> {
        if let Some(value) = self.fixture_env.get(name) {
            return Some(value.clone());
        }
        ambient_lookup(&self.config.env, name)
    }

    fn remove_cache_files(&self) -> Result<(), HarnessError> {
        if self.home_dir.exists() {
            std::fs::remove_dir_all(&self.home_dir)?;
        }
        std::fs::create_dir_all(&self.home_dir)?;
        Ok(())
    }

    fn do_login(&self) -> Result<(), HarnessError> {
        let requirements = env::credential_requirements(self.mode);
        let resolved = env::resolve_requirements(&requirements, |name| self.lookup_env(name))?;
        let credentials = LoginCredentials {
            environment: resolved_value(&resolved, env::TEST_ENVIRONMENT_VAR),
            username: resolved_value(&resolved, env::TEST_USERNAME_VAR),
            password: resolved_value(&resolved, env::TEST_PASSWORD_VAR),
            subscription_id: resolved_value(&resolved, env::TEST_SUBSCRIPTION_ID_VAR),
        };
        perform_login(
            self.context.account.as_ref(),
            self.context.profile_store.as_ref(),
            &credentials,
        )
    }

    fn clear_strict_ssl(&mut self) {
        if self.strict_ssl_set {
            std::env::remove_var(env::STRICT_SSL_VAR);
            self.strict_ssl_set = false;
        }
    }
}

impl std::fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.config.name)
            .field("mode", &self.mode)
            .field("phase", &self.phase)
            .field("current_test", &self.current_test)
            .finish_non_exhaustive()
    }
}

impl Drop for TestSuite {
    /// Backstop for suites abandoned mid-run: clears the strict-SSL
    /// override and flushes any recording window still open.
    fn drop(&mut self) {
        self.clear_strict_ssl();
        if let TransportHandle::Recording(recording) = &self.transport {
            if let Some(recorder) = recording.take_recorder() {
                let profile = self
                    .memory_store
                    .as_ref()
                    .and_then(|store| store.saved())
                    .map(scrub_profile);
                let fixture = recorder.finish(self.resolved_env.clone(), profile);
                if let Err(e) = self.store.write(&self.config.name, &fixture) {
                    eprintln!("Warning: failed to write fixture: {e}");
                }
            }
        }
    }
}

/// Looks a name up in scoped overrides (last entry wins), then the
/// process environment.
fn ambient_lookup(overrides: &[(String, String)], name: &str) -> Option<String> {
    overrides
        .iter()
        .rev()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
        .or_else(|| std::env::var(name).ok())
}

fn resolved_value(resolved: &BTreeMap<String, String>, name: &str) -> String {
    resolved.get(name).cloned().unwrap_or_default()
}

fn scratch_home() -> PathBuf {
    std::env::temp_dir().join(format!("strato-suite-{}", Uuid::new_v4().simple()))
}

/// Registers the override environment in a base profile, replacing any
/// same-named entry.
fn seed_profile(mut base: Profile, environment: Option<&Environment>) -> Profile {
    if let Some(environment) = environment {
        base.environments
            .retain(|existing| !existing.name.eq_ignore_ascii_case(&environment.name));
        base.environments.push(environment.clone());
    }
    base
}

/// Replaces every subscription token with the canned placeholder before
/// a profile snapshot reaches disk.
fn scrub_profile(mut profile: Profile) -> Profile {
    for subscription in &mut profile.subscriptions {
        if let Some(token) = &mut subscription.access_token {
            token.token = CANNED_ACCESS_TOKEN.to_string();
        }
    }
    profile
}
