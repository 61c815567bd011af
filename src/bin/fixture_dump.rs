//! Prints a human-readable summary of a recorded fixture file.
//!
//! Usage: `fixture_dump <fixture.yaml>`

use std::fmt::Write as _;
use std::path::PathBuf;
use std::{env, fs, process};

use strato::fixture::format::Fixture;

fn summarize(input: &str) -> Result<String, String> {
    let input_path = PathBuf::from(input);
    let content = fs::read_to_string(&input_path)
        .map_err(|e| format!("Failed to read {}: {e}", input_path.display()))?;
    let fixture: Fixture = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse {}: {e}", input_path.display()))?;

    let mut summary = String::new();
    let _ = writeln!(
        summary,
        "fixture {} recorded {}",
        fixture.name,
        fixture.recorded_at.to_rfc3339()
    );
    if let Some(profile) = &fixture.profile {
        let _ = writeln!(
            summary,
            "profile: {} subscription(s), {} environment(s)",
            profile.subscriptions.len(),
            profile.environments.len()
        );
    }
    for (name, value) in &fixture.env {
        let _ = writeln!(summary, "env {name}={value}");
    }
    for interaction in &fixture.interactions {
        let _ = writeln!(
            summary,
            "{:>3}  {:<6} {}  -> {} ({} bytes)",
            interaction.seq,
            interaction.method,
            interaction.path,
            interaction.status,
            interaction.response_body.len()
        );
    }
    Ok(summary)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: fixture_dump <fixture.yaml>");
        process::exit(1);
    }

    match summarize(&args[1]) {
        Ok(summary) => print!("{summary}"),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
