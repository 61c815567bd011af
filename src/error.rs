//! Error types shared across the CLI and the test harness.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the record/replay harness itself.
///
/// CLI-level failures are not errors at this layer: a command that exits
/// non-zero still yields an [`crate::harness::ExecutionResult`]. A
/// `HarnessError` means the harness could not do its own job, for example
/// a missing fixture or a lifecycle call out of order.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// One or more required environment variables are absent.
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    /// Login succeeded but no listed subscription matched the target id.
    #[error("no subscription found matching id {0:?}")]
    NoMatchingSubscription(String),

    /// The configured environment name is not in the profile.
    #[error("unknown environment {0:?} in profile")]
    UnknownEnvironment(String),

    /// The run-mode selector holds an unrecognized value.
    #[error("invalid run mode {0:?}, expected live, record or playback")]
    InvalidRunMode(String),

    /// A lifecycle method was called in the wrong phase.
    #[error("suite {suite:?}: {operation} called while {phase}")]
    Lifecycle {
        /// Suite name.
        suite: String,
        /// The lifecycle method that was misused.
        operation: &'static str,
        /// The phase the suite was actually in.
        phase: &'static str,
    },

    /// Token acquisition or subscription listing failed.
    #[error("login failed: {0}")]
    Login(String),

    /// The profile store could not load or save session state.
    #[error("profile store: {0}")]
    ProfileStore(String),

    /// A command template and its argument list disagree.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Fixture recording or playback failed.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The HTTP transport could not be constructed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Filesystem trouble outside the fixture store.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors from recording fixtures to disk or replaying them.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// No fixture file exists where playback expected one.
    #[error("no fixture recorded at {}", .0.display())]
    Missing(PathBuf),

    /// The fixture file could not be read.
    #[error("failed to read fixture {}: {source}", path.display())]
    Read {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The fixture file is not valid YAML for the fixture schema.
    #[error("failed to parse fixture {}: {source}", path.display())]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The fixture could not be serialized for writing.
    #[error("failed to serialize fixture {name:?}: {source}")]
    Serialize {
        /// Fixture name.
        name: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The fixture file could not be written.
    #[error("failed to write fixture {}: {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Strict-order playback saw a request that differs from the next
    /// recorded interaction.
    #[error(
        "unmatched interaction: {method} {path} requested, next recorded is \
         {expected_method} {expected_path} (seq {expected_seq})"
    )]
    UnmatchedInteraction {
        /// Method of the live request.
        method: String,
        /// Path of the live request.
        path: String,
        /// Method of the next unconsumed recording.
        expected_method: String,
        /// Path of the next unconsumed recording.
        expected_path: String,
        /// Sequence number of the next unconsumed recording.
        expected_seq: u64,
    },

    /// Relaxed-order playback found no unconsumed recording for a request.
    #[error("no recorded interaction matches {method} {path}, {remaining} still unconsumed")]
    NoMatchingInteraction {
        /// Method of the live request.
        method: String,
        /// Path of the live request.
        path: String,
        /// Interactions left unconsumed.
        remaining: usize,
    },

    /// A request arrived after every recorded interaction was consumed.
    #[error("recording exhausted: {method} {path} requested after all {recorded} interactions were consumed")]
    RecordingExhausted {
        /// Method of the live request.
        method: String,
        /// Path of the live request.
        path: String,
        /// Total interactions in the fixture.
        recorded: usize,
    },

    /// Strict body matching found a request body that differs from the
    /// recorded one.
    #[error("request body mismatch for {method} {path} (seq {seq})")]
    BodyMismatch {
        /// Request method.
        method: String,
        /// Request path.
        path: String,
        /// Sequence number of the matched recording.
        seq: u64,
    },

    /// The test finished with recorded interactions never requested.
    #[error("{remaining} recorded interaction(s) left unconsumed, next is {method} {path}")]
    LeftoverInteractions {
        /// Interactions never consumed.
        remaining: usize,
        /// Method of the first unconsumed recording.
        method: String,
        /// Path of the first unconsumed recording.
        path: String,
    },

    /// The playback transport received a request before a fixture was
    /// installed for the current test.
    #[error("playback transport has no fixture installed")]
    NoPlayerInstalled,
}

/// Errors surfaced by the HTTP transport port.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Playback could not serve the request from the fixture.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The live request failed at the network layer.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request itself was malformed before it could be sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Errors in positional command-line templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template has a different number of `{}` slots than arguments
    /// were supplied.
    #[error("template expects {placeholders} argument(s) but {supplied} were supplied")]
    ArgumentCount {
        /// `{}` slots in the template.
        placeholders: usize,
        /// Arguments supplied by the caller.
        supplied: usize,
    },

    /// The formatted command line could not be split into tokens.
    #[error("unbalanced quoting in command line {0:?}")]
    Tokenize(String),
}

/// Failures reported by CLI commands.
///
/// The CLI relays these on stderr and exits non-zero; it never aborts the
/// process any harder than that.
#[derive(Debug, Error)]
pub enum CliError {
    /// The invocation violated a usage or business rule. The message is
    /// printed to stderr verbatim.
    #[error("{0}")]
    Invalid(String),

    /// The service answered with a non-success status.
    #[error("the service returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Service error message, or a body excerpt when none was parsed.
        message: String,
    },

    /// The request never produced a usable response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A response or input payload was not the JSON the command expected.
    #[error("invalid JSON payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The profile store failed.
    #[error("profile store: {0}")]
    Profile(String),

    /// The config source failed.
    #[error("config: {0}")]
    Config(String),

    /// Local file or stream I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
