//! World rasterizers: turn a region's facets into blocks.
//!
//! Rasterizers run in registration order over the same [`Brush`], so later
//! ones overwrite earlier ones: terrain first, structures on top.

use nebula_facet::{PipelineError, RegionFacets};
use nebula_structures::{
    BUILDINGS, BlockType, Brush, ROADS, Rasterizer, ShapeDescriptor, ShapeRasterizer,
};
use nebula_terrain::{SEA_LEVEL, SURFACE_HEIGHT};

/// Layers of dirt between the stone and the top block.
const DIRT_DEPTH: i32 = 3;

/// Writes one aspect of a generated region.
pub trait WorldRasterizer: Send + Sync {
    fn name(&self) -> &str;

    fn rasterize(&self, facets: &RegionFacets, brush: &mut Brush<'_>) -> Result<(), PipelineError>;
}

/// Stone, dirt and a grass or sand top from the surface height, then water
/// up to sea level.
pub struct TerrainRasterizer;

impl WorldRasterizer for TerrainRasterizer {
    fn name(&self) -> &str {
        "terrain"
    }

    fn rasterize(&self, facets: &RegionFacets, brush: &mut Brush<'_>) -> Result<(), PipelineError> {
        let surface = facets.get(SURFACE_HEIGHT)?;
        let sea_level = *facets.get(SEA_LEVEL)?;
        let region = brush.region();
        let bottom = region.min_y();

        for p in region.rect().iter() {
            let top = surface.surface_y(p);
            let cover = if top <= sea_level {
                BlockType::Sand
            } else {
                BlockType::Grass
            };
            brush.fill_column(p, bottom, top - DIRT_DEPTH, BlockType::Stone);
            brush.fill_column(p, (top - DIRT_DEPTH).max(bottom), top, BlockType::Dirt);
            brush.fill_column(p, top, top + 1, cover);
            if top < sea_level {
                brush.fill_column(p, top + 1, sea_level + 1, BlockType::Water);
            }
        }
        Ok(())
    }
}

/// Roads draped over the terrain, then buildings.
pub struct StructureRasterizer;

impl WorldRasterizer for StructureRasterizer {
    fn name(&self) -> &str {
        "structures"
    }

    fn rasterize(&self, facets: &RegionFacets, brush: &mut Brush<'_>) -> Result<(), PipelineError> {
        let shapes = ShapeRasterizer::new(facets.get(SURFACE_HEIGHT)?);
        for road in facets.get(ROADS)? {
            shapes.raster(brush, &ShapeDescriptor::from(*road));
        }
        shapes.raster_all(brush, facets.get(BUILDINGS)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec2, IVec3};
    use nebula_facet::{FieldPipeline, Region3};
    use nebula_structures::RegionBlockBuffer;
    use nebula_terrain::{HeightmapParams, SeaLevelProvider, SurfaceHeightProvider};

    fn flat(amplitude: f64, base: f32, sea: i32) -> FieldPipeline {
        let params = HeightmapParams {
            amplitude,
            ..HeightmapParams::default()
        };
        FieldPipeline::builder(3)
            .with_provider(SurfaceHeightProvider::new(params, base, None))
            .with_provider(SeaLevelProvider::new(sea))
            .build()
            .unwrap()
    }

    fn terrain(pipeline: &FieldPipeline, region: Region3) -> RegionBlockBuffer {
        let facets = pipeline.generate(region).unwrap();
        let mut buffer = RegionBlockBuffer::new(region);
        let mut brush = Brush::new(&mut buffer);
        TerrainRasterizer.rasterize(&facets, &mut brush).unwrap();
        buffer
    }

    #[test]
    fn test_terrain_layers() {
        let region = Region3::new(IVec3::ZERO, IVec3::new(4, 32, 4));
        let buffer = terrain(&flat(0.0, 20.0, 5), region);
        let p = IVec3::new(1, 0, 2);
        assert_eq!(buffer.get(p.with_y(16)), Some(BlockType::Stone));
        assert_eq!(buffer.get(p.with_y(17)), Some(BlockType::Dirt));
        assert_eq!(buffer.get(p.with_y(19)), Some(BlockType::Dirt));
        assert_eq!(buffer.get(p.with_y(20)), Some(BlockType::Grass));
        assert_eq!(buffer.get(p.with_y(21)), Some(BlockType::Air));
        assert_eq!(buffer.count(BlockType::Water), 0);
        assert_eq!(buffer.count(BlockType::Grass), 16);
    }

    #[test]
    fn test_water_fills_to_sea_level() {
        let region = Region3::new(IVec3::ZERO, IVec3::new(4, 32, 4));
        let buffer = terrain(&flat(0.0, 10.0, 14), region);
        let p = IVec3::new(3, 0, 3);
        assert_eq!(buffer.get(p.with_y(10)), Some(BlockType::Sand));
        assert_eq!(buffer.get(p.with_y(11)), Some(BlockType::Water));
        assert_eq!(buffer.get(p.with_y(14)), Some(BlockType::Water));
        assert_eq!(buffer.get(p.with_y(15)), Some(BlockType::Air));
        assert_eq!(buffer.count(BlockType::Water), 16 * 4);
    }

    #[test]
    fn test_surface_above_region_fills_region() {
        let region = Region3::new(IVec3::ZERO, IVec3::new(2, 8, 2));
        let buffer = terrain(&flat(0.0, 40.0, 5), region);
        assert_eq!(buffer.count(BlockType::Stone), 4 * 8);
        assert_eq!(buffer.top_y(IVec2::new(0, 0)), Some(7));
    }
}
