//! Settlements, roads, buildings and trees on top of the terrain facets,
//! plus the shape descriptors and rasterizers that turn them into blocks.

mod block;
mod brush;
mod building;
mod geometry;
mod settlement;

pub mod filter;
pub mod providers;
pub mod raster;
pub mod shape;

pub use block::BlockType;
pub use brush::{BlockSink, Brush, RecordingSink, RegionBlockBuffer};
pub use building::{Building, BuildingParams, layout_buildings};
pub use geometry::{disc_touches_rect, distance_to_rect, distance_to_segment, segment_bounds};
pub use providers::{
    BLOCKED_AREA, BUILDINGS, BlockedAreaProvider, BuildingProvider, ROADS, RoadParams,
    RoadProvider, SETTLEMENTS, SettlementFlattener, SettlementProvider, TREES, TreeKind,
    TreeParams, TreeProvider, TreeSpawn,
};
pub use raster::{Rasterizer, ShapeRasterizer};
pub use settlement::{Settlement, SettlementLayout, SettlementParams};
pub use shape::ShapeDescriptor;
