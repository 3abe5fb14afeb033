//! Maintenance entry point. Runs outside the request path, with the
//! operator responsible for ensuring at most one in-flight invocation.

use std::env;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use api::config::Config;
use api::db::create_pool;
use api::reconcile::{reconcile_match_keys, repair_assignment_progress};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("match-keys") => run_match_keys().await?,
        Some("todo-shape") => run_todo_shape().await?,
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}\nUsage: reconcile <match-keys|todo-shape>");
            std::process::exit(1);
        }
        None => {
            eprintln!("Usage: reconcile <match-keys|todo-shape>");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Heals a match table that predates the (job, candidate, repo) unique key.
/// Safe to re-run; a compliant table is a no-op.
async fn run_match_keys() -> Result<()> {
    let config = Config::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let report = reconcile_match_keys(&pool).await?;
    println!(
        "Reconciled match keys: {} backfilled, {} placeholders synthesized, {} duplicates removed.",
        report.backfilled, report.placeholders, report.duplicates_removed
    );
    Ok(())
}

/// Resets candidate assignment progress objects that fail the shape check.
async fn run_todo_shape() -> Result<()> {
    let config = Config::from_env()?;
    let pool = create_pool(&config.database_url).await?;

    let repaired = repair_assignment_progress(&pool).await?;
    println!("Repaired {repaired} candidate assignment progress rows.");
    Ok(())
}
