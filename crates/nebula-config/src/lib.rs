//! Configuration for the world generator.
//!
//! Settings persist to disk as a RON file, accept CLI overrides via clap,
//! support hot-reload detection and tolerate missing or unknown fields.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, PipelineConfig, RoadConfig, SettlementConfig, SymmetryMode,
    TerrainConfig, VegetationConfig, WorldConfig,
};
pub use error::ConfigError;
