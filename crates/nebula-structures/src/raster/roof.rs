use glam::{IVec2, IVec3};
use nebula_facet::Rect2;

use super::Rasterizer;
use crate::brush::Brush;
use crate::shape::{DomeRoof, FlatRoof, HipRoof, Orientation, PentRoof, RidgeAxis, SaddleRoof};

/// Rasterizes every roof variant. Sloped roofs write one layer per column.
pub struct RoofRasterizer;

/// Footprint-relative position of world column `p`.
fn local(area: Rect2, p: IVec2) -> IVec2 {
    p - area.min
}

/// Distances from a local column to the near and far edge along X and Z.
fn edge_distances(area: Rect2, rel: IVec2) -> (i32, i32) {
    let dx = rel.x.min(area.width() - 1 - rel.x);
    let dz = rel.y.min(area.height() - 1 - rel.y);
    (dx, dz)
}

fn slope(base_height: i32, dist: i32, pitch: f32, max_height: i32) -> i32 {
    let rise = (dist as f32 / pitch).floor() as i32;
    (base_height + rise).min(max_height)
}

impl FlatRoof {
    /// Top layer at local column `rel`.
    pub fn height_at(&self, rel: IVec2) -> i32 {
        let (dx, dz) = edge_distances(self.area, rel);
        if dx.min(dz) < self.border {
            self.base_height + self.border_height
        } else {
            self.base_height
        }
    }
}

impl HipRoof {
    /// Roof layer at local column `rel`: rises `1 / pitch` per column from
    /// the nearest edge, clamped to `max_height`.
    pub fn height_at(&self, rel: IVec2) -> i32 {
        let (dx, dz) = edge_distances(self.area, rel);
        slope(self.base_height, dx.min(dz), self.pitch, self.max_height)
    }
}

impl SaddleRoof {
    pub fn ridge_axis(&self) -> RidgeAxis {
        self.ridge.unwrap_or_else(|| RidgeAxis::for_area(self.area))
    }

    /// Roof layer at local column `rel`, rising from the two eaves parallel
    /// to the ridge.
    pub fn height_at(&self, rel: IVec2) -> i32 {
        let (dx, dz) = edge_distances(self.area, rel);
        let dist = match self.ridge_axis() {
            RidgeAxis::X => dz,
            RidgeAxis::Z => dx,
        };
        slope(self.base_height, dist, self.pitch, self.max_height)
    }
}

impl PentRoof {
    pub fn height_at(&self, rel: IVec2) -> i32 {
        let dist = match self.low_edge {
            Orientation::North => rel.y,
            Orientation::South => self.area.height() - 1 - rel.y,
            Orientation::West => rel.x,
            Orientation::East => self.area.width() - 1 - rel.x,
        };
        slope(self.base_height, dist, self.pitch, self.max_height)
    }
}

impl DomeRoof {
    /// Cap layer at local column `rel`, `None` outside the inscribed ellipse.
    pub fn height_at(&self, rel: IVec2) -> Option<i32> {
        // Column centers, normalized to [-1, 1]; odd numerators keep the
        // two halves of the cap exact mirror images.
        let n = (rel * 2 + 1 - self.area.size).as_vec2() / self.area.size.as_vec2();
        let r2 = n.length_squared();
        if r2 > 1.0 {
            return None;
        }
        Some(self.base_height + (self.height as f32 * (1.0 - r2).sqrt()).floor() as i32)
    }
}

impl Rasterizer<FlatRoof> for RoofRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, roof: &FlatRoof) {
        let Some(area) = brush.intersection(roof.area) else {
            return;
        };
        for p in area.iter() {
            let top = roof.height_at(local(roof.area, p));
            brush.fill_column(p, roof.base_height, top + 1, roof.material);
        }
    }
}

impl Rasterizer<HipRoof> for RoofRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, roof: &HipRoof) {
        let Some(area) = brush.intersection(roof.area) else {
            return;
        };
        for p in area.iter() {
            let y = roof.height_at(local(roof.area, p));
            brush.set_block(IVec3::new(p.x, y, p.y), roof.material);
        }
    }
}

impl Rasterizer<SaddleRoof> for RoofRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, roof: &SaddleRoof) {
        let Some(area) = brush.intersection(roof.area) else {
            return;
        };
        for p in area.iter() {
            let y = roof.height_at(local(roof.area, p));
            brush.set_block(IVec3::new(p.x, y, p.y), roof.material);
        }
    }
}

impl Rasterizer<PentRoof> for RoofRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, roof: &PentRoof) {
        let Some(area) = brush.intersection(roof.area) else {
            return;
        };
        for p in area.iter() {
            let y = roof.height_at(local(roof.area, p));
            brush.set_block(IVec3::new(p.x, y, p.y), roof.material);
        }
    }
}

impl Rasterizer<DomeRoof> for RoofRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, roof: &DomeRoof) {
        let Some(area) = brush.intersection(roof.area) else {
            return;
        };
        for p in area.iter() {
            if let Some(y) = roof.height_at(local(roof.area, p)) {
                brush.fill_column(p, roof.base_height, y + 1, roof.material);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::brush::{RecordingSink, RegionBlockBuffer};
    use nebula_facet::Region3;

    fn region() -> Region3 {
        Region3::new(IVec3::new(0, 0, 0), IVec3::new(32, 128, 32))
    }

    fn hip(area: Rect2) -> HipRoof {
        HipRoof {
            area,
            base_height: 50,
            pitch: 1.0,
            max_height: 55,
            material: BlockType::RoofTile,
        }
    }

    #[test]
    fn test_hip_roof_center_and_corner() {
        let roof = hip(Rect2::new(IVec2::new(4, 4), IVec2::new(10, 10)));
        assert_eq!(roof.height_at(IVec2::new(4, 4)), 54, "Center: min(50 + 4, 55)");
        assert_eq!(roof.height_at(IVec2::new(5, 5)), 54);
        assert_eq!(roof.height_at(IVec2::new(0, 0)), 50, "Corner sits at base height");
        assert_eq!(roof.height_at(IVec2::new(9, 0)), 50);
        assert_eq!(roof.height_at(IVec2::new(2, 7)), 52);
    }

    #[test]
    fn test_hip_roof_clamps_to_max_height() {
        let roof = HipRoof {
            max_height: 52,
            ..hip(Rect2::new(IVec2::ZERO, IVec2::new(20, 20)))
        };
        assert_eq!(roof.height_at(IVec2::new(10, 10)), 52);
        assert_eq!(roof.height_at(IVec2::new(1, 10)), 51);
    }

    #[test]
    fn test_hip_roof_shallow_pitch() {
        let roof = HipRoof {
            pitch: 2.0,
            max_height: 100,
            ..hip(Rect2::new(IVec2::ZERO, IVec2::new(10, 10)))
        };
        assert_eq!(roof.height_at(IVec2::new(3, 4)), 51, "3 / 2 floors to 1");
        assert_eq!(roof.height_at(IVec2::new(4, 4)), 52);
    }

    #[test]
    fn test_hip_roof_raster_writes_world_columns() {
        let roof = hip(Rect2::new(IVec2::new(4, 4), IVec2::new(10, 10)));
        let mut buffer = RegionBlockBuffer::new(region());
        let mut brush = Brush::new(&mut buffer);
        RoofRasterizer.raster(&mut brush, &roof);
        assert_eq!(brush.writes(), 100);
        assert_eq!(buffer.top_y(IVec2::new(8, 8)), Some(54));
        assert_eq!(buffer.top_y(IVec2::new(4, 4)), Some(50));
        assert_eq!(buffer.top_y(IVec2::new(13, 13)), Some(50));
        assert_eq!(buffer.top_y(IVec2::new(3, 3)), None);
    }

    #[test]
    fn test_roof_clipped_by_region_edge() {
        let roof = hip(Rect2::new(IVec2::new(28, -4), IVec2::new(10, 10)));
        let mut sink = RecordingSink::new(region());
        let mut brush = Brush::new(&mut sink);
        RoofRasterizer.raster(&mut brush, &roof);
        assert_eq!(brush.writes(), 4 * 6);
        // World column (28, 0) is local (0, 4): nearest edge is X at 0.
        assert!(sink.writes().contains(&(IVec3::new(28, 50, 0), BlockType::RoofTile)));
        // World column (31, 1) is local (3, 5): min(3, 4) = 3.
        assert!(sink.writes().contains(&(IVec3::new(31, 53, 1), BlockType::RoofTile)));
    }

    #[test]
    fn test_roof_outside_region_is_a_no_op() {
        let roof = hip(Rect2::new(IVec2::new(-20, -20), IVec2::new(10, 10)));
        let mut sink = RecordingSink::new(region());
        let mut brush = Brush::new(&mut sink);
        RoofRasterizer.raster(&mut brush, &roof);
        assert_eq!(brush.writes(), 0);
        assert_eq!(brush.skipped(), 0);
    }

    #[test]
    fn test_flat_roof_parapet() {
        let roof = FlatRoof {
            area: Rect2::new(IVec2::new(0, 0), IVec2::new(6, 6)),
            base_height: 20,
            border: 1,
            border_height: 1,
            material: BlockType::Cobblestone,
        };
        assert_eq!(roof.height_at(IVec2::new(0, 3)), 21);
        assert_eq!(roof.height_at(IVec2::new(3, 3)), 20);

        let mut buffer = RegionBlockBuffer::new(region());
        let mut brush = Brush::new(&mut buffer);
        RoofRasterizer.raster(&mut brush, &roof);
        // 20 ring columns of two blocks, 16 interior columns of one.
        assert_eq!(brush.writes(), 20 * 2 + 16);
        assert_eq!(buffer.top_y(IVec2::new(5, 5)), Some(21));
        assert_eq!(buffer.top_y(IVec2::new(2, 2)), Some(20));
    }

    #[test]
    fn test_saddle_roof_ridge_along_longer_side() {
        let roof = SaddleRoof {
            area: Rect2::new(IVec2::ZERO, IVec2::new(12, 7)),
            base_height: 10,
            pitch: 1.0,
            max_height: 30,
            ridge: None,
            material: BlockType::Thatch,
        };
        assert_eq!(roof.ridge_axis(), RidgeAxis::X);
        // Constant along the ridge, rising across it.
        assert_eq!(roof.height_at(IVec2::new(0, 3)), 13);
        assert_eq!(roof.height_at(IVec2::new(11, 3)), 13);
        assert_eq!(roof.height_at(IVec2::new(5, 0)), 10);
        assert_eq!(roof.height_at(IVec2::new(5, 6)), 10);

        let forced = SaddleRoof {
            ridge: Some(RidgeAxis::Z),
            ..roof
        };
        assert_eq!(forced.height_at(IVec2::new(0, 3)), 10);
        assert_eq!(forced.height_at(IVec2::new(5, 3)), 15);
    }

    #[test]
    fn test_pent_roof_rises_from_low_edge() {
        let area = Rect2::new(IVec2::ZERO, IVec2::new(5, 8));
        let roof = PentRoof {
            area,
            base_height: 0,
            pitch: 1.0,
            max_height: 100,
            low_edge: Orientation::North,
            material: BlockType::Planks,
        };
        assert_eq!(roof.height_at(IVec2::new(2, 0)), 0);
        assert_eq!(roof.height_at(IVec2::new(2, 7)), 7);

        let east = PentRoof {
            low_edge: Orientation::East,
            ..roof
        };
        assert_eq!(east.height_at(IVec2::new(4, 3)), 0);
        assert_eq!(east.height_at(IVec2::new(0, 3)), 4);
    }

    #[test]
    fn test_dome_roof_is_highest_in_the_middle() {
        let roof = DomeRoof {
            area: Rect2::new(IVec2::ZERO, IVec2::new(9, 9)),
            base_height: 40,
            height: 4,
            material: BlockType::Glass,
        };
        // Local (4, 4) is the exact center: n = 0.
        assert_eq!(roof.height_at(IVec2::new(4, 4)), Some(44));
        assert_eq!(roof.height_at(IVec2::new(0, 0)), None);
        let edge = roof.height_at(IVec2::new(0, 4)).unwrap();
        assert!(edge < 44, "Rim {edge} must be below the apex");
        assert_eq!(roof.height_at(IVec2::new(1, 4)), roof.height_at(IVec2::new(7, 4)));
    }
}
