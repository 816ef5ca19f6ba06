//! Demo binary: builds a floor, drops a body onto it, and looks down.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p strata-demo -- --ticks 120 --log-level debug`.

mod scenario;

use std::path::PathBuf;

use clap::Parser;
use strata_config::{CliArgs, Config};
use strata_voxel::{ChunkStore, world_to_chunk_coord};
use tracing::{error, info, warn};

use crate::scenario::{Block, build_floor, look_down, place_against, simulate_fall};

fn config_dir(args: &CliArgs) -> PathBuf {
    args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("strata")
    })
}

fn main() {
    let args = CliArgs::parse();
    let config_dir = config_dir(&args);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(2);
    }

    let mut store = ChunkStore::new();
    build_floor(&mut store, &config.world);

    let outcome = simulate_fall(&store, &config.world, &config.physics);
    match outcome.landed_at {
        Some(tick) => info!(tick, position = %outcome.position, "body at rest"),
        None => warn!(position = %outcome.position, "body never landed"),
    }

    let Some(hit) = look_down(&store, outcome.position, config.physics.reach_steps) else {
        info!(reach = config.physics.reach_steps, "nothing within reach");
        return;
    };
    info!(
        face = hit.face.key(),
        voxel = %hit.voxel_pos,
        chunk = %world_to_chunk_coord(hit.voxel_pos.as_vec3()),
        distance = hit.distance,
        "reach ray hit"
    );

    match place_against(&mut store, &hit, Block::Marker) {
        Some(placed) => info!(%placed, chunks = store.len(), "placed marker"),
        None => warn!("placement target is occupied"),
    }
}
