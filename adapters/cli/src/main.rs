#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays the line defence strategy on a recorded board.

mod game_config;
mod replay;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use line_defence_core::UnitCatalog;
use line_defence_system_orchestrator::{StrategyConfig, Strategist};
use line_defence_world::Scenario;
use tracing_subscriber::prelude::*;

/// Command-line arguments accepted by the replay binary.
#[derive(Debug, Parser)]
#[command(name = "line-defence", about = "Replays the line defence strategy on a board scenario")]
struct CliArgs {
    /// JSON board scenario to start from.
    #[arg(long, value_name = "PATH")]
    scenario: PathBuf,
    /// TOML file overriding strategy thresholds.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Game configuration JSON supplying unit statistics.
    #[arg(long = "game-config", value_name = "PATH")]
    game_config: Option<PathBuf>,
    /// Number of turns to replay.
    #[arg(long, default_value_t = 1)]
    turns: u32,
}

/// Entry point for the Line Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    if args.turns == 0 {
        bail!("--turns must be at least 1");
    }

    let config = match &args.config {
        Some(path) => load_strategy_config(path)?,
        None => StrategyConfig::default(),
    };
    let catalog = match &args.game_config {
        Some(path) => game_config::load_catalog(path)?,
        None => UnitCatalog::default(),
    };

    let payload = fs::read_to_string(&args.scenario)
        .with_context(|| format!("failed to read scenario {}", args.scenario.display()))?;
    let mut world = Scenario::from_json(&payload)
        .and_then(|scenario| scenario.into_world(catalog))
        .with_context(|| format!("invalid scenario {}", args.scenario.display()))?;

    let mut strategist = Strategist::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay::run(&mut world, &mut strategist, args.turns, &mut out)
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_strategy_config(path: &Path) -> Result<StrategyConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read strategy config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid strategy config {}", path.display()))
}
