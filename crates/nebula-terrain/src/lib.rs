//! Terrain layers: fBm heightmap noise, mirror symmetry, the infinite height
//! field, per-region height slices and the terrain facet providers.

mod height_field;
mod height_slice;
mod heightmap;
mod providers;
mod symmetry;

pub mod seed;

pub use height_field::{HeightFunction, InfiniteHeightField};
pub use height_slice::HeightSlice;
pub use heightmap::{HeightmapParams, HeightmapSampler, fold_seed};
pub use providers::{SEA_LEVEL, SURFACE_HEIGHT, SeaLevelProvider, SurfaceHeightProvider};
pub use symmetry::Symmetry;
