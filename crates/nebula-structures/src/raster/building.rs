use super::{Rasterizer, ShapeRasterizer};
use crate::block::BlockType;
use crate::brush::Brush;
use crate::building::Building;

impl Rasterizer<Building> for ShapeRasterizer<'_> {
    /// Floor, walls and hollow interior first, then the roof, then the
    /// openings cut into the walls.
    fn raster(&self, brush: &mut Brush<'_>, building: &Building) {
        let Some(area) = brush.intersection(building.footprint) else {
            return;
        };
        let wall_bottom = building.floor_y + 1;
        let wall_top = building.roof_base();

        brush.fill_rect(area, building.floor_y, building.wall_material);
        for p in area.iter() {
            let block = if building.is_wall(p) {
                building.wall_material
            } else {
                BlockType::Air
            };
            brush.fill_column(p, wall_bottom, wall_top, block);
        }

        self.raster(brush, &building.roof);
        for opening in &building.openings {
            self.raster(brush, opening);
        }
    }
}

impl ShapeRasterizer<'_> {
    /// Rasterizes every building in order.
    pub fn raster_all(&self, brush: &mut Brush<'_>, buildings: &[Building]) {
        for building in buildings {
            self.raster(brush, building);
        }
    }
}
