use glam::IVec3;
use nebula_terrain::HeightSlice;

use super::Rasterizer;
use crate::brush::Brush;
use crate::geometry::distance_to_segment;
use crate::shape::RoadSegment;

/// Paves the terrain surface under a road.
///
/// A column is paved when its distance to the centerline is at most half
/// the road width.
pub struct RoadRasterizer<'a> {
    surface: &'a HeightSlice,
}

impl<'a> RoadRasterizer<'a> {
    pub fn new(surface: &'a HeightSlice) -> Self {
        Self { surface }
    }
}

impl Rasterizer<RoadSegment> for RoadRasterizer<'_> {
    fn raster(&self, brush: &mut Brush<'_>, road: &RoadSegment) {
        let Some(area) = brush.intersection(road.footprint()) else {
            return;
        };
        let half_width = road.half_width();
        for p in area.iter() {
            if distance_to_segment(p.as_vec2(), road.start, road.end) > half_width {
                continue;
            }
            let Some(height) = self.surface.try_height(p) else {
                continue;
            };
            let y = height.floor() as i32;
            brush.set_block(IVec3::new(p.x, y, p.y), road.material);
        }
    }
}
