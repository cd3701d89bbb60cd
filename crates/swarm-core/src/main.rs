//! City Swarm Simulation Engine
//!
//! Headless runner: builds a navigation mesh from map data, spawns the
//! blue/red population and advances fixed-size ticks, printing progress
//! and writing stats JSON at the end.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use oracle::{OracleClient, StaticOracle};
use swarm_core::config::SimulationConfig;
use swarm_core::output::write_stats;
use swarm_core::world::SimulationWorld;
use swarm_core::{setup, stepper};
use tracing_subscriber::EnvFilter;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "city_swarm")]
#[command(about = "A spatial navigation and multi-agent behavior simulator")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate (defaults to the config value)
    #[arg(long)]
    ticks: Option<u64>,

    /// Fixed step size in milliseconds (defaults to the config value)
    #[arg(long)]
    tick_ms: Option<f32>,

    /// Normalized map JSON file; the built-in street grid is used if omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Tuning file path (defaults to city-swarm.toml next to the binary)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write run statistics
    #[arg(long, default_value = "output/stats.json")]
    stats_out: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match SimulationConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: could not load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::load_or_default(),
    };

    let map = match &args.map {
        Some(path) => match setup::load_map_file(path) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("Error: could not load map {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => setup::demo_map(config.world.size_x, config.world.size_z),
    };

    let ticks = args.ticks.unwrap_or(config.simulation.default_ticks);
    let tick_ms = args.tick_ms.unwrap_or(config.simulation.tick_ms);
    let dt = tick_ms / 1000.0;

    println!("City Swarm Simulation");
    println!("=====================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {} ({} ms each)", ticks, tick_ms);
    println!(
        "World: {}x{} m at {} m/cell",
        config.world.size_x, config.world.size_z, config.world.grid_size
    );
    println!();

    // The engine treats the oracle as opaque; wire a provider SDK in by
    // implementing oracle::DecisionOracle. The static stand-in keeps
    // headless runs self-contained.
    let client = Arc::new(OracleClient::new(Box::new(StaticOracle::with_confidence(
        0.85,
    ))));

    println!("Building navigation mesh...");
    let mut world = SimulationWorld::new(config, &map, client, args.seed);
    println!(
        "  {} walkable cells ({} roads, {} buildings)",
        world.mesh().grid().walkable_count(),
        map.roads.len(),
        map.buildings.len()
    );

    let (blue, red) = world.registry().faction_counts();
    println!("Spawned {} agents ({} blue, {} red)", blue + red, blue, red);
    println!();
    println!("Starting simulation...");
    println!();

    for tick in 0..ticks {
        let events = stepper::step(&mut world, dt).await;

        if !events.is_empty() && tick % 10 == 0 {
            println!(
                "[Tick {:>4}] {} interactions resolved",
                tick,
                events.len()
            );
        }

        if tick > 0 && tick % 100 == 0 {
            println!("Tick {} / {}", tick, ticks);
        }
    }

    let summary = world.stats().summary(ticks);
    if let Some(last) = &summary.final_tick {
        println!();
        println!(
            "Simulation complete. {} interaction events, average trust {:.3}.",
            summary.total_events, last.average_trust
        );
        println!(
            "Blue success: {}, red success: {}, known-agent links: {}",
            last.blue_success, last.red_success, last.total_interactions
        );
    }

    if let Err(e) = write_stats(&args.stats_out, &summary) {
        eprintln!(
            "Warning: could not write stats to {}: {}",
            args.stats_out.display(),
            e
        );
    } else {
        println!("Wrote {}", args.stats_out.display());
    }
}
