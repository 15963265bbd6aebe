//! Command-line world generator.
//!
//! Configuration is loaded from `worldgen.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p nebula-worldgen -- --seed 42 --regions 8` to generate
//! an 8 x 8 square of regions around the origin.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use glam::IVec3;
use nebula_config::{CliArgs, Config};
use nebula_facet::{RegionGenerator, default_thread_count};
use nebula_worldgen::{WorldGenError, WorldGenerator};
use tracing::{error, info, warn};

const RESULT_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<(), WorldGenError> {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(&args);

    nebula_log::init_logging(
        Some(&config_dir.join("logs")),
        cfg!(debug_assertions),
        Some(&config),
    );
    info!(config_dir = %config_dir.display(), "configuration loaded");

    let world = Arc::new(WorldGenerator::from_config(&config)?);
    let threads = match config.pipeline.worker_threads {
        0 => default_thread_count(),
        n => n,
    };
    let capacity = config.pipeline.queue_capacity;
    let generator = {
        let world = Arc::clone(&world);
        RegionGenerator::new(threads, capacity, capacity, move |region| {
            world.generate_region(region)
        })?
    };

    let half = args.regions as i32 / 2;
    let mut pending: Vec<_> = (-half..args.regions as i32 - half)
        .flat_map(|z| (-half..args.regions as i32 - half).map(move |x| IVec3::new(x, 0, z)))
        .map(|cell| world.region_at(cell))
        .collect();
    let total = pending.len();
    info!(regions = total, threads, "generating");

    let (mut done, mut failed, mut blocks, mut trees) = (0usize, 0usize, 0usize, 0usize);
    while done + failed < total {
        while let Some(region) = pending.last().copied() {
            if generator.submit(region).is_err() {
                break;
            }
            pending.pop();
        }

        let results = generator.collect(1, RESULT_TIMEOUT);
        if results.is_empty() {
            warn!(
                in_flight = generator.in_flight_count(),
                "no region finished within {:?}", RESULT_TIMEOUT
            );
            continue;
        }
        for result in results {
            match result.output {
                Ok(output) => {
                    done += 1;
                    blocks += output.blocks.non_air_count();
                    trees += output.trees.len();
                    info!(
                        region = ?output.region.min,
                        solid = output.blocks.non_air_count(),
                        trees = output.trees.len(),
                        skipped = output.skipped,
                        time_us = result.generation_time_us,
                        "region done"
                    );
                }
                Err(err) => {
                    failed += 1;
                    error!(region = ?result.region.min, %err, "region failed");
                }
            }
        }
    }

    let stats = world.cache_stats();
    info!(
        done,
        failed,
        blocks,
        trees,
        cache_hits = stats.hits,
        cache_misses = stats.misses,
        "generation finished"
    );
    Ok(())
}
