//! Command-line argument parsing for the world generator.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, SymmetryMode};

/// World generator command-line arguments.
///
/// CLI values override settings loaded from `worldgen.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "nebula-worldgen", about = "Generate world regions")]
pub struct CliArgs {
    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// World mirror symmetry.
    #[arg(long, value_enum)]
    pub symmetry: Option<SymmetryMode>,

    /// Generate a square of N x N regions around the origin.
    #[arg(long, default_value_t = 4)]
    pub regions: u32,

    /// Generation worker threads (0 = one per CPU core).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(symmetry) = args.symmetry {
            self.world.symmetry = symmetry;
        }
        if let Some(threads) = args.threads {
            self.pipeline.worker_threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
