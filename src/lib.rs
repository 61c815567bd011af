//! Core library entry for the `strato` CLI and its record/replay test
//! harness.
//!
//! The CLI manages cloud resource groups and template deployments; every
//! outbound concern (HTTP, authentication, profile persistence,
//! configuration) goes through a port in [`ports`], which is what lets
//! the harness in [`harness`] swap in recording and playback adapters
//! without patching any command code.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod ports;
pub mod profile;

use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use clap::Parser;

pub use context::ServiceContext;
pub use error::{CliError, FixtureError, HarnessError, TransportError};
pub use harness::{ExecutionResult, RunMode, SuiteConfig, TestSuite};

/// Runs the CLI with the provided arguments against the given context,
/// writing output to the supplied streams, and returns the process exit
/// status.
///
/// Parse failures, `--help` and `--version` are rendered the way clap
/// would render them to a terminal; command failures print the error to
/// `err` and yield a non-zero status. Nothing here terminates the
/// process, which is what lets the harness run the CLI in-process.
pub fn run<I, T>(args: I, ctx: &ServiceContext, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(parse_err) => {
            let rendered = parse_err.render();
            return match parse_err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = write!(out, "{rendered}");
                    0
                }
                _ => {
                    let _ = write!(err, "{rendered}");
                    1
                }
            };
        }
    };
    match commands::dispatch(&cli.command, ctx, out) {
        Ok(()) => 0,
        Err(command_err) => {
            let _ = writeln!(err, "{command_err}");
            1
        }
    }
}

/// Runs the CLI with captured output, for in-process test execution.
#[must_use]
pub fn run_captured(args: &[String], ctx: &ServiceContext) -> ExecutionResult {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let exit_status = run(args.iter().cloned(), ctx, &mut out, &mut err);
    ExecutionResult {
        exit_status,
        text: String::from_utf8_lossy(&out).into_owned(),
        error_text: String::from_utf8_lossy(&err).into_owned(),
    }
}
