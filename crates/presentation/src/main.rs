//! # Presentation scenario runner
//!
//! Replays a scenario file against a simulated platform: a primary window
//! with "show" and "close" triggers, a secondary display reached through a
//! media route, and the overlay permission flow.
//!
//! ## Usage
//!
//! ```text
//! presentation --config scenarios/demo.yaml [--json]
//! ```
//!
//! `--json` prints the run report to stdout.

use anyhow::Context;
use presentation::{Scenario, Shell};

const DEFAULT_SCENARIO: &str = "scenarios/demo.yaml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
        .unwrap_or(DEFAULT_SCENARIO);
    let json_report = args.iter().any(|arg| arg == "--json");

    let scenario =
        Scenario::from_file(path).with_context(|| format!("failed to load scenario {path}"))?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&scenario.config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "Presentation runner v{} starting: scenario={}, {} step(s)",
        env!("CARGO_PKG_VERSION"),
        path,
        scenario.steps.len()
    );

    let shell = Shell::new(&scenario)?;
    let report = shell.run(scenario.steps.clone()).await;

    let failed = report.steps.iter().filter(|step| !step.ok).count();
    tracing::info!(
        "Scenario finished: {} step(s), {} failed, {} notice(s), {} dialog(s)",
        report.steps.len(),
        failed,
        report.notices.len(),
        report.dialogs.len()
    );

    if json_report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
