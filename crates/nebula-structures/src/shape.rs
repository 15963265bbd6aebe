//! Shape descriptors: immutable descriptions of architectural features.
//!
//! Every shape carries its world-space footprint, its height parameters and
//! a material. Rasterization lives in [`crate::raster`].

use glam::{IVec2, IVec3, Vec2};
use nebula_facet::Rect2;
use nebula_terrain::Symmetry;

use crate::block::BlockType;
use crate::geometry::segment_bounds;

/// Horizontal compass direction. North is `-Z`, east is `+X`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    pub fn direction(&self) -> IVec2 {
        match self {
            Orientation::North => IVec2::new(0, -1),
            Orientation::East => IVec2::new(1, 0),
            Orientation::South => IVec2::new(0, 1),
            Orientation::West => IVec2::new(-1, 0),
        }
    }

    pub fn from_direction(dir: IVec2) -> Option<Orientation> {
        Orientation::ALL.into_iter().find(|o| o.direction() == dir)
    }

    pub fn opposite(&self) -> Orientation {
        match self {
            Orientation::North => Orientation::South,
            Orientation::East => Orientation::West,
            Orientation::South => Orientation::North,
            Orientation::West => Orientation::East,
        }
    }

    /// The direction this orientation points in after reflection.
    pub fn mirrored(&self, symmetry: Symmetry) -> Orientation {
        let d = self.direction();
        let reflected = match symmetry {
            Symmetry::AxisX => IVec2::new(d.x, -d.y),
            Symmetry::AxisZ => IVec2::new(-d.x, d.y),
            Symmetry::PositiveDiagonal => IVec2::new(d.y, d.x),
            Symmetry::NegativeDiagonal => IVec2::new(-d.y, -d.x),
        };
        Orientation::from_direction(reflected).unwrap_or(*self)
    }
}

/// Axis the ridge of a saddle roof runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RidgeAxis {
    X,
    Z,
}

impl RidgeAxis {
    /// Ridge along the longer side of `area`, X on ties.
    pub fn for_area(area: Rect2) -> RidgeAxis {
        if area.width() >= area.height() {
            RidgeAxis::X
        } else {
            RidgeAxis::Z
        }
    }

    fn swapped(self) -> RidgeAxis {
        match self {
            RidgeAxis::X => RidgeAxis::Z,
            RidgeAxis::Z => RidgeAxis::X,
        }
    }
}

/// Flat slab with a raised parapet around its outer ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatRoof {
    pub area: Rect2,
    pub base_height: i32,
    /// Width of the parapet ring, in columns.
    pub border: i32,
    /// How far the parapet rises above the slab.
    pub border_height: i32,
    pub material: BlockType,
}

/// Roof sloping up from all four edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HipRoof {
    pub area: Rect2,
    pub base_height: i32,
    /// Columns per layer of rise.
    pub pitch: f32,
    pub max_height: i32,
    pub material: BlockType,
}

/// Two slopes meeting at a ridge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaddleRoof {
    pub area: Rect2,
    pub base_height: i32,
    pub pitch: f32,
    pub max_height: i32,
    /// `None` runs the ridge along the longer side.
    pub ridge: Option<RidgeAxis>,
    pub material: BlockType,
}

/// A single slope rising away from its low edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PentRoof {
    pub area: Rect2,
    pub base_height: i32,
    pub pitch: f32,
    pub max_height: i32,
    pub low_edge: Orientation,
    pub material: BlockType,
}

/// Ellipsoid cap over the footprint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomeRoof {
    pub area: Rect2,
    pub base_height: i32,
    pub height: i32,
    pub material: BlockType,
}

/// A single glass block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleWindow {
    pub position: IVec3,
    pub material: BlockType,
}

/// A vertical rectangle in a wall, filled over layers `[base, top)`.
///
/// `wall` is the one-column-thick footprint of the opening.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectWindow {
    pub wall: Rect2,
    pub base: i32,
    pub top: i32,
    pub material: BlockType,
}

/// A doorway cleared to air over layers `[base, top)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleDoor {
    pub wall: Rect2,
    pub base: i32,
    pub top: i32,
}

/// A straight road between two points, following the terrain surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
    pub material: BlockType,
}

impl RoadSegment {
    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Columns the road surface may cover.
    pub fn footprint(&self) -> Rect2 {
        segment_bounds(self.start, self.end, self.half_width())
    }
}

/// Every supported shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeDescriptor {
    FlatRoof(FlatRoof),
    HipRoof(HipRoof),
    SaddleRoof(SaddleRoof),
    PentRoof(PentRoof),
    DomeRoof(DomeRoof),
    SimpleWindow(SimpleWindow),
    RectWindow(RectWindow),
    SimpleDoor(SimpleDoor),
    RoadSegment(RoadSegment),
}

impl ShapeDescriptor {
    /// World-space columns the shape may write.
    pub fn footprint(&self) -> Rect2 {
        match self {
            ShapeDescriptor::FlatRoof(s) => s.area,
            ShapeDescriptor::HipRoof(s) => s.area,
            ShapeDescriptor::SaddleRoof(s) => s.area,
            ShapeDescriptor::PentRoof(s) => s.area,
            ShapeDescriptor::DomeRoof(s) => s.area,
            ShapeDescriptor::SimpleWindow(s) => {
                Rect2::new(IVec2::new(s.position.x, s.position.z), IVec2::ONE)
            }
            ShapeDescriptor::RectWindow(s) => s.wall,
            ShapeDescriptor::SimpleDoor(s) => s.wall,
            ShapeDescriptor::RoadSegment(s) => s.footprint(),
        }
    }

    pub fn material(&self) -> BlockType {
        match self {
            ShapeDescriptor::FlatRoof(s) => s.material,
            ShapeDescriptor::HipRoof(s) => s.material,
            ShapeDescriptor::SaddleRoof(s) => s.material,
            ShapeDescriptor::PentRoof(s) => s.material,
            ShapeDescriptor::DomeRoof(s) => s.material,
            ShapeDescriptor::SimpleWindow(s) => s.material,
            ShapeDescriptor::RectWindow(s) => s.material,
            ShapeDescriptor::SimpleDoor(_) => BlockType::Air,
            ShapeDescriptor::RoadSegment(s) => s.material,
        }
    }

    /// The shape reflected across `symmetry`'s axis.
    pub fn mirrored(&self, symmetry: Symmetry) -> ShapeDescriptor {
        let rect = |r: Rect2| symmetry.mirror_rect(r);
        match *self {
            ShapeDescriptor::FlatRoof(s) => ShapeDescriptor::FlatRoof(FlatRoof {
                area: rect(s.area),
                ..s
            }),
            ShapeDescriptor::HipRoof(s) => ShapeDescriptor::HipRoof(HipRoof {
                area: rect(s.area),
                ..s
            }),
            ShapeDescriptor::SaddleRoof(s) => ShapeDescriptor::SaddleRoof(SaddleRoof {
                area: rect(s.area),
                ridge: match s.ridge {
                    Some(axis) if symmetry.swaps_axes() => Some(axis.swapped()),
                    other => other,
                },
                ..s
            }),
            ShapeDescriptor::PentRoof(s) => ShapeDescriptor::PentRoof(PentRoof {
                area: rect(s.area),
                low_edge: s.low_edge.mirrored(symmetry),
                ..s
            }),
            ShapeDescriptor::DomeRoof(s) => ShapeDescriptor::DomeRoof(DomeRoof {
                area: rect(s.area),
                ..s
            }),
            ShapeDescriptor::SimpleWindow(s) => {
                let column = symmetry.mirror(IVec2::new(s.position.x, s.position.z));
                ShapeDescriptor::SimpleWindow(SimpleWindow {
                    position: IVec3::new(column.x, s.position.y, column.y),
                    ..s
                })
            }
            ShapeDescriptor::RectWindow(s) => ShapeDescriptor::RectWindow(RectWindow {
                wall: rect(s.wall),
                ..s
            }),
            ShapeDescriptor::SimpleDoor(s) => ShapeDescriptor::SimpleDoor(SimpleDoor {
                wall: rect(s.wall),
                ..s
            }),
            ShapeDescriptor::RoadSegment(s) => ShapeDescriptor::RoadSegment(RoadSegment {
                start: symmetry.mirror_point(s.start),
                end: symmetry.mirror_point(s.end),
                ..s
            }),
        }
    }
}

impl From<RoadSegment> for ShapeDescriptor {
    fn from(road: RoadSegment) -> Self {
        ShapeDescriptor::RoadSegment(road)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_mirroring() {
        assert_eq!(
            Orientation::North.mirrored(Symmetry::AxisX),
            Orientation::South
        );
        assert_eq!(Orientation::North.mirrored(Symmetry::AxisZ), Orientation::North);
        assert_eq!(
            Orientation::North.mirrored(Symmetry::PositiveDiagonal),
            Orientation::West
        );
        assert_eq!(
            Orientation::North.mirrored(Symmetry::NegativeDiagonal),
            Orientation::East
        );
        for symmetry in Symmetry::ALL {
            for o in Orientation::ALL {
                assert_eq!(o.mirrored(symmetry).mirrored(symmetry), o);
            }
        }
    }

    #[test]
    fn test_ridge_axis_follows_longer_side() {
        let wide = Rect2::new(IVec2::ZERO, IVec2::new(9, 5));
        let deep = Rect2::new(IVec2::ZERO, IVec2::new(5, 9));
        assert_eq!(RidgeAxis::for_area(wide), RidgeAxis::X);
        assert_eq!(RidgeAxis::for_area(deep), RidgeAxis::Z);
    }

    #[test]
    fn test_mirrored_shape_footprint_is_mirrored_rect() {
        let roof = ShapeDescriptor::HipRoof(HipRoof {
            area: Rect2::new(IVec2::new(3, -9), IVec2::new(6, 4)),
            base_height: 10,
            pitch: 1.0,
            max_height: 14,
            material: BlockType::RoofTile,
        });
        for symmetry in Symmetry::ALL {
            let mirrored = roof.mirrored(symmetry);
            assert_eq!(mirrored.footprint(), symmetry.mirror_rect(roof.footprint()));
            assert_eq!(mirrored.mirrored(symmetry), roof);
        }
    }

    #[test]
    fn test_saddle_ridge_swaps_on_diagonal() {
        let roof = ShapeDescriptor::SaddleRoof(SaddleRoof {
            area: Rect2::new(IVec2::new(0, 4), IVec2::new(8, 4)),
            base_height: 0,
            pitch: 1.0,
            max_height: 4,
            ridge: Some(RidgeAxis::X),
            material: BlockType::Thatch,
        });
        let ShapeDescriptor::SaddleRoof(mirrored) = roof.mirrored(Symmetry::PositiveDiagonal) else {
            panic!("variant must be preserved");
        };
        assert_eq!(mirrored.ridge, Some(RidgeAxis::Z));
        assert_eq!(mirrored.area.size, IVec2::new(4, 8));
    }

    #[test]
    fn test_road_footprint_covers_half_width() {
        let road = RoadSegment {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(10.0, 0.0),
            width: 4.0,
            material: BlockType::Gravel,
        };
        let footprint = ShapeDescriptor::from(road).footprint();
        assert_eq!(footprint.min, IVec2::new(-2, -2));
        assert_eq!(footprint.max(), IVec2::new(12, 2));
        assert_eq!(road.length(), 10.0);
    }
}
