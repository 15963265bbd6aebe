//! Buildings: a walled footprint with a roof and openings.

use glam::{IVec2, IVec3};
use nebula_facet::{ProviderError, Rect2};
use nebula_terrain::Symmetry;
use nebula_terrain::seed::cell_rng;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::block::BlockType;
use crate::geometry::distance_to_segment;
use crate::settlement::Settlement;
use crate::shape::{
    DomeRoof, FlatRoof, HipRoof, Orientation, PentRoof, RectWindow, RidgeAxis, RoadSegment,
    SaddleRoof, ShapeDescriptor, SimpleDoor, SimpleWindow,
};

const BUILDING_SALT: u64 = 0xb011_d000_0000_0002;

/// A house on a settlement site.
///
/// The floor occupies layer `floor_y`, walls the `wall_height` layers above
/// it and the roof starts right on top of the walls.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    pub footprint: Rect2,
    pub floor_y: i32,
    pub wall_height: i32,
    pub wall_material: BlockType,
    pub roof: ShapeDescriptor,
    pub openings: Vec<ShapeDescriptor>,
}

impl Building {
    pub fn roof_base(&self) -> i32 {
        self.floor_y + self.wall_height + 1
    }

    /// Whether column `p` is part of the outer wall ring.
    pub fn is_wall(&self, p: IVec2) -> bool {
        let max = self.footprint.max();
        self.footprint.contains(p)
            && (p.x == self.footprint.min.x
                || p.x == max.x
                || p.y == self.footprint.min.y
                || p.y == max.y)
    }

    pub fn mirrored(&self, symmetry: Symmetry) -> Building {
        Building {
            footprint: symmetry.mirror_rect(self.footprint),
            roof: self.roof.mirrored(symmetry),
            openings: self.openings.iter().map(|o| o.mirrored(symmetry)).collect(),
            ..self.clone()
        }
    }

    /// Whether any footprint column comes within `clearance` of a road's edge.
    pub fn conflicts_with(&self, road: &RoadSegment, clearance: f32) -> bool {
        let reach = road.half_width() + clearance;
        self.footprint
            .iter()
            .any(|p| distance_to_segment(p.as_vec2(), road.start, road.end) <= reach)
    }
}

/// Building generation tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildingParams {
    pub max_buildings: u32,
    /// Smallest footprint side, in columns.
    pub min_size: i32,
    pub max_size: i32,
    /// Free columns kept between a footprint and a road edge.
    pub road_clearance: f32,
}

impl Default for BuildingParams {
    fn default() -> Self {
        Self {
            max_buildings: 8,
            min_size: 5,
            max_size: 9,
            road_clearance: 1.0,
        }
    }
}

impl BuildingParams {
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.min_size < 3 || self.min_size > self.max_size {
            return Err(ProviderError::InvalidParameter(format!(
                "building size range {}..={} must start at 3 or more",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }
}

/// Lays out the buildings of one settlement.
///
/// Deterministic per `(seed, settlement center)`. Road conflicts are not
/// checked here.
pub fn layout_buildings(seed: u64, settlement: &Settlement, params: &BuildingParams) -> Vec<Building> {
    let mut rng = cell_rng(seed, BUILDING_SALT, settlement.center);
    let mut buildings: Vec<Building> = Vec::new();
    let reach = settlement.radius - 1;

    for _ in 0..params.max_buildings * 4 {
        if buildings.len() >= params.max_buildings as usize {
            break;
        }
        let size = IVec2::new(
            rng.random_range(params.min_size..=params.max_size),
            rng.random_range(params.min_size..=params.max_size),
        );
        let span = 2 * reach + 1 - size;
        if span.x < 1 || span.y < 1 {
            continue;
        }
        let min = settlement.center - IVec2::splat(reach)
            + IVec2::new(rng.random_range(0..span.x), rng.random_range(0..span.y));
        let footprint = Rect2::new(min, size);

        let max = footprint.max();
        let corners = [min, max, IVec2::new(min.x, max.y), IVec2::new(max.x, min.y)];
        if !corners.iter().all(|c| settlement.contains(c.as_vec2())) {
            continue;
        }
        if buildings
            .iter()
            .any(|b| b.footprint.expand(1).intersects(&footprint))
        {
            continue;
        }
        buildings.push(furnish(&mut rng, footprint, settlement.ground_height));
    }
    buildings
}

fn furnish(rng: &mut ChaCha8Rng, footprint: Rect2, floor_y: i32) -> Building {
    const WALLS: [BlockType; 3] = [BlockType::Planks, BlockType::Cobblestone, BlockType::Log];

    let wall_height = rng.random_range(3..=5);
    let wall_material = WALLS[rng.random_range(0..WALLS.len())];
    let roof_base = floor_y + wall_height + 1;
    let half = footprint.width().min(footprint.height()) / 2;

    let roof = match rng.random_range(0..5) {
        0 => ShapeDescriptor::FlatRoof(FlatRoof {
            area: footprint,
            base_height: roof_base,
            border: 1,
            border_height: 1,
            material: BlockType::Cobblestone,
        }),
        1 => ShapeDescriptor::HipRoof(HipRoof {
            area: footprint,
            base_height: roof_base,
            pitch: 1.0,
            max_height: roof_base + half,
            material: BlockType::RoofTile,
        }),
        2 => ShapeDescriptor::SaddleRoof(SaddleRoof {
            area: footprint,
            base_height: roof_base,
            pitch: 1.0,
            max_height: roof_base + half,
            ridge: Some(RidgeAxis::for_area(footprint)),
            material: BlockType::Thatch,
        }),
        3 => ShapeDescriptor::PentRoof(PentRoof {
            area: footprint,
            base_height: roof_base,
            pitch: 2.0,
            max_height: roof_base + 3,
            low_edge: Orientation::ALL[rng.random_range(0..4)],
            material: BlockType::Planks,
        }),
        _ => ShapeDescriptor::DomeRoof(DomeRoof {
            area: footprint,
            base_height: roof_base,
            height: half.max(1),
            material: BlockType::Cobblestone,
        }),
    };

    let door_side = Orientation::ALL[rng.random_range(0..4)];
    let mut openings = vec![ShapeDescriptor::SimpleDoor(SimpleDoor {
        wall: wall_span(footprint, door_side, 1),
        base: floor_y + 1,
        top: floor_y + 3,
    })];

    let back = door_side.opposite();
    let back_len = wall_length(footprint, back);
    openings.push(ShapeDescriptor::RectWindow(RectWindow {
        wall: wall_span(footprint, back, (back_len - 4).max(1)),
        base: floor_y + 2,
        top: floor_y + 3,
        material: BlockType::Glass,
    }));

    for side in Orientation::ALL
        .into_iter()
        .filter(|o| *o != door_side && *o != back)
    {
        let column = wall_span(footprint, side, 1).min;
        openings.push(ShapeDescriptor::SimpleWindow(SimpleWindow {
            position: IVec3::new(column.x, floor_y + 2, column.y),
            material: BlockType::Glass,
        }));
    }

    Building {
        footprint,
        floor_y,
        wall_height,
        wall_material,
        roof,
        openings,
    }
}

fn wall_length(footprint: Rect2, side: Orientation) -> i32 {
    match side {
        Orientation::North | Orientation::South => footprint.width(),
        Orientation::East | Orientation::West => footprint.height(),
    }
}

/// A centered, one-column-thick stretch of `len` columns on wall `side`.
fn wall_span(footprint: Rect2, side: Orientation, len: i32) -> Rect2 {
    let min = footprint.min;
    let max = footprint.max();
    let offset = (wall_length(footprint, side) - len) / 2;
    match side {
        Orientation::North => Rect2::new(IVec2::new(min.x + offset, min.y), IVec2::new(len, 1)),
        Orientation::South => Rect2::new(IVec2::new(min.x + offset, max.y), IVec2::new(len, 1)),
        Orientation::West => Rect2::new(IVec2::new(min.x, min.y + offset), IVec2::new(1, len)),
        Orientation::East => Rect2::new(IVec2::new(max.x, min.y + offset), IVec2::new(1, len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn site() -> Settlement {
        Settlement {
            center: IVec2::new(100, -40),
            radius: 20,
            ground_height: 48,
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let params = BuildingParams::default();
        assert_eq!(
            layout_buildings(7, &site(), &params),
            layout_buildings(7, &site(), &params)
        );
        assert_ne!(
            layout_buildings(7, &site(), &params),
            layout_buildings(8, &site(), &params)
        );
    }

    #[test]
    fn test_buildings_fit_site_and_do_not_touch() {
        let params = BuildingParams {
            max_buildings: 12,
            ..Default::default()
        };
        for seed in 0..20 {
            let buildings = layout_buildings(seed, &site(), &params);
            assert!(buildings.len() <= 12);
            for (i, b) in buildings.iter().enumerate() {
                for p in b.footprint.iter() {
                    assert!(site().contains(p.as_vec2()), "seed {seed}: {p} off site");
                }
                for other in &buildings[i + 1..] {
                    assert!(!b.footprint.expand(1).intersects(&other.footprint));
                }
                assert_eq!(b.floor_y, 48);
                assert_eq!(b.roof.footprint(), b.footprint);
            }
        }
    }

    #[test]
    fn test_openings_sit_on_walls() {
        for seed in 0..10 {
            for b in layout_buildings(seed, &site(), &BuildingParams::default()) {
                for opening in &b.openings {
                    for p in opening.footprint().iter() {
                        assert!(b.is_wall(p), "Opening column {p} is not on a wall");
                    }
                }
                assert!(b.openings.iter().any(|o| matches!(o, ShapeDescriptor::SimpleDoor(_))));
            }
        }
    }

    #[test]
    fn test_road_conflict() {
        let building = Building {
            footprint: Rect2::new(IVec2::new(0, 0), IVec2::new(5, 5)),
            floor_y: 10,
            wall_height: 3,
            wall_material: BlockType::Planks,
            roof: ShapeDescriptor::FlatRoof(FlatRoof {
                area: Rect2::new(IVec2::new(0, 0), IVec2::new(5, 5)),
                base_height: 14,
                border: 1,
                border_height: 1,
                material: BlockType::Cobblestone,
            }),
            openings: Vec::new(),
        };
        let road = |z: f32| RoadSegment {
            start: Vec2::new(-10.0, z),
            end: Vec2::new(10.0, z),
            width: 2.0,
            material: BlockType::Gravel,
        };
        assert!(building.conflicts_with(&road(6.0), 1.0), "Road edge one column from the footprint");
        assert!(!building.conflicts_with(&road(6.5), 1.0));
        assert_eq!(building.roof_base(), 14);
    }

    #[test]
    fn test_mirrored_building_keeps_openings_on_walls() {
        let b = layout_buildings(2, &site(), &BuildingParams::default())
            .into_iter()
            .next()
            .expect("site should hold at least one building");
        for symmetry in Symmetry::ALL {
            let m = b.mirrored(symmetry);
            assert_eq!(m.footprint.area(), b.footprint.area());
            for opening in &m.openings {
                for p in opening.footprint().iter() {
                    assert!(m.is_wall(p), "{symmetry:?}: {p}");
                }
            }
        }
    }
}
