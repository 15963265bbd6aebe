//! World generation front end.
//!
//! Assembles the terrain and structure facet providers into one pipeline
//! from a [`Config`](nebula_config::Config) and rasterizes generated regions
//! into blocks.

mod error;
mod generator;
mod rasterizer;

pub use error::WorldGenError;
pub use generator::{RegionOutput, WorldGenerator, symmetry_of};
pub use rasterizer::{StructureRasterizer, TerrainRasterizer, WorldRasterizer};
