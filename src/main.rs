//! Binary entrypoint for the `strato` CLI.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use strato::ServiceContext;

/// CLI home directory: `STRATO_HOME`, else `~/.strato`, else `.strato`
/// relative to the working directory.
fn home_dir() -> PathBuf {
    if let Ok(home) = std::env::var("STRATO_HOME") {
        return PathBuf::from(home);
    }
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".strato"),
        Err(_) => PathBuf::from(".strato"),
    }
}

/// Counts `-v` occurrences (including packed forms like `-vv`) without
/// fully parsing the command line, so the log filter can be installed
/// before clap runs.
fn verbosity(args: impl Iterator<Item = String>) -> usize {
    args.map(|arg| {
        if arg == "--verbose" {
            1
        } else if arg.len() > 1
            && arg.starts_with('-')
            && !arg.starts_with("--")
            && arg[1..].chars().all(|ch| ch == 'v')
        {
            arg.len() - 1
        } else {
            0
        }
    })
    .sum()
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let default_level = match verbosity(std::env::args().skip(1)) {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = match ServiceContext::live(&home_dir()) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("failed to initialize HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    if strato::run(std::env::args(), &ctx, &mut out, &mut err) == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
