//! Settlement plan binary
//!
//! Usage: `settle-plan <SNAPSHOT> [--actor <USER_ID>] [--config <FILE>] [--analytics]`
//!
//! Prints the optimized settlement plan of the group as JSON, or the group's
//! spending analytics with `--analytics`.

use anyhow::Context;
use clap::Parser;
use ledger_core::UserId;
use settlement::{snapshot, Config, SettlementPlanner};
use std::path::PathBuf;

/// Compute the minimum set of payments that settles a group
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON snapshot of the group ledger
    snapshot: PathBuf,

    /// Member requesting the plan; non-members are refused
    #[arg(long, value_name = "USER_ID")]
    actor: Option<i64>,

    /// TOML configuration file (overrides SETTLEMENT_CONFIG)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print spending analytics instead of the plan
    #[arg(long, requires = "actor")]
    analytics: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let json = std::env::var("SETTLEMENT_LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    // Logs go to stderr; stdout carries the plan
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => Config::from_env().context("failed to load configuration")?,
    };
    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        "Starting settlement planner"
    );

    let ledger = snapshot::load_snapshot(&args.snapshot, &config.ledger)
        .with_context(|| format!("failed to load snapshot {}", args.snapshot.display()))?;

    let actor = args.actor.map(UserId::new);
    let output = match actor {
        Some(actor) if args.analytics => render(&ledger.analytics(actor)?, config.pretty_output)?,
        Some(actor) => {
            let plan = SettlementPlanner::new(&config).plan_for(&ledger, actor)?;
            render(&plan, config.pretty_output)?
        }
        None => render(&SettlementPlanner::new(&config).plan(&ledger), config.pretty_output)?,
    };
    println!("{}", output);

    Ok(())
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
