//! Headless skirmish simulator.
//!
//! Composition root: loads content, plugs the reference collaborators into a
//! [`BattleSession`], lets two AI teams fight, and logs the battle.
//!
//! ```bash
//! RUST_LOG=sim=debug cargo run -p battle-sim -- --seed 42 --rounds 20
//! ```
mod planner;
mod report;
mod world;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use battle_content::{ConfigLoader, ContentFactory, RosterLoader};
use battle_core::TeamId;
use battle_runtime::{BattleSession, PlannerController, RuntimeConfig};

use planner::NearestEnemyPlanner;
use world::{BfsPathfinder, PacedMover, RadiusTargeting};

/// Run a headless battle between two AI teams.
#[derive(Parser, Debug)]
#[command(name = "battle-sim")]
#[command(about = "Headless hex-grid battle simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Seed for combat rolls
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Round limit (overrides BATTLE_MAX_ROUNDS)
    #[arg(long)]
    rounds: Option<u32>,

    /// Content directory with config.toml, statuses.ron, abilities.ron and
    /// units.ron; embedded content is used when omitted
    #[arg(long)]
    data: Option<PathBuf>,

    /// Simulated travel time per cell, in milliseconds
    #[arg(long, default_value_t = 0)]
    step_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (battle_config, catalog, roster) = match &cli.data {
        Some(dir) => {
            let factory = ContentFactory::new(dir.clone());
            tracing::info!("Loading content from {}", factory.data_dir().display());
            (
                factory.load_config()?,
                factory.load_catalog()?,
                factory.load_roster()?,
            )
        }
        None => (
            ConfigLoader::embedded()?,
            ContentFactory::embedded_catalog()?,
            RosterLoader::embedded()?,
        ),
    };

    let mut config = RuntimeConfig::from_env().with_battle(battle_config);
    if let Some(rounds) = cli.rounds {
        config = config.with_max_rounds(rounds);
    }

    let ai = Arc::new(NearestEnemyPlanner);
    let controller = Arc::new(PlannerController::new(ai).with_intent_delay(config.intent_delay));

    tracing::info!(
        seed = cli.seed,
        units = roster.len(),
        max_rounds = config.max_rounds,
        "Starting battle"
    );

    let mover = PacedMover::new(Duration::from_millis(cli.step_ms));
    let mut session = BattleSession::builder()
        .config(config)
        .catalog(catalog)
        .units(roster.iter().map(|template| template.spawn()))
        .mover(Arc::new(mover))
        .pathfinder(Arc::new(BfsPathfinder))
        .targeting(Arc::new(RadiusTargeting))
        .controller(TeamId(0), controller.clone())
        .controller(TeamId(1), controller)
        .seed(cli.seed)
        .build()?;

    let log = report::spawn_battle_log(session.subscribe());
    let outcome = session.run().await?;
    let rounds = session.round();

    let survivors: Vec<String> = session
        .context()
        .roster()
        .iter()
        .filter(|handle| handle.is_alive())
        .map(|handle| {
            handle.read(|unit| format!("{} {} ({} hp)", unit.id, unit.name, unit.core.health))
        })
        .collect();

    drop(session);
    let events = log.await?;

    println!("Outcome: {outcome} after {rounds} rounds ({events} events)");
    for survivor in survivors {
        println!("  {survivor}");
    }

    Ok(())
}
