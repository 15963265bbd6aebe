use super::Rasterizer;
use crate::block::BlockType;
use crate::brush::Brush;
use crate::shape::{RectWindow, SimpleDoor, SimpleWindow};

/// Windows and doors cut into already rasterized walls.
pub struct OpeningRasterizer;

impl Rasterizer<SimpleWindow> for OpeningRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, window: &SimpleWindow) {
        brush.set_block(window.position, window.material);
    }
}

impl Rasterizer<RectWindow> for OpeningRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, window: &RectWindow) {
        let Some(area) = brush.intersection(window.wall) else {
            return;
        };
        for p in area.iter() {
            brush.fill_column(p, window.base, window.top, window.material);
        }
    }
}

impl Rasterizer<SimpleDoor> for OpeningRasterizer {
    fn raster(&self, brush: &mut Brush<'_>, door: &SimpleDoor) {
        let Some(area) = brush.intersection(door.wall) else {
            return;
        };
        for p in area.iter() {
            brush.fill_column(p, door.base, door.top, BlockType::Air);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::RegionBlockBuffer;
    use glam::{IVec2, IVec3};
    use nebula_facet::{Rect2, Region3};

    fn walled_buffer() -> RegionBlockBuffer {
        let mut buffer = RegionBlockBuffer::new(Region3::new(IVec3::ZERO, IVec3::splat(16)));
        let mut brush = Brush::new(&mut buffer);
        for x in 0..16 {
            brush.fill_column(IVec2::new(x, 4), 1, 6, BlockType::Planks);
        }
        buffer
    }

    #[test]
    fn test_rect_window_replaces_wall_span() {
        let mut buffer = walled_buffer();
        let mut brush = Brush::new(&mut buffer);
        let window = RectWindow {
            wall: Rect2::new(IVec2::new(3, 4), IVec2::new(3, 1)),
            base: 2,
            top: 4,
            material: BlockType::Glass,
        };
        OpeningRasterizer.raster(&mut brush, &window);
        assert_eq!(brush.writes(), 6);
        assert_eq!(buffer.count(BlockType::Glass), 6);
        assert_eq!(buffer.get(IVec3::new(4, 3, 4)), Some(BlockType::Glass));
        assert_eq!(buffer.get(IVec3::new(4, 4, 4)), Some(BlockType::Planks));
        assert_eq!(buffer.get(IVec3::new(6, 3, 4)), Some(BlockType::Planks));
    }

    #[test]
    fn test_door_clears_to_air() {
        let mut buffer = walled_buffer();
        let mut brush = Brush::new(&mut buffer);
        let door = SimpleDoor {
            wall: Rect2::new(IVec2::new(8, 4), IVec2::ONE),
            base: 1,
            top: 3,
        };
        OpeningRasterizer.raster(&mut brush, &door);
        assert_eq!(buffer.get(IVec3::new(8, 1, 4)), Some(BlockType::Air));
        assert_eq!(buffer.get(IVec3::new(8, 2, 4)), Some(BlockType::Air));
        assert_eq!(buffer.get(IVec3::new(8, 3, 4)), Some(BlockType::Planks));
    }

    #[test]
    fn test_simple_window_single_block() {
        let mut buffer = walled_buffer();
        let mut brush = Brush::new(&mut buffer);
        OpeningRasterizer.raster(
            &mut brush,
            &SimpleWindow {
                position: IVec3::new(12, 3, 4),
                material: BlockType::Glass,
            },
        );
        OpeningRasterizer.raster(
            &mut brush,
            &SimpleWindow {
                position: IVec3::new(12, 30, 4),
                material: BlockType::Glass,
            },
        );
        assert_eq!(brush.writes(), 1);
        assert_eq!(brush.skipped(), 1);
        assert_eq!(buffer.count(BlockType::Glass), 1);
    }
}
