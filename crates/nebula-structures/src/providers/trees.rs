use std::fmt;

use glam::{IVec2, IVec3};
use nebula_facet::{
    Border3, FacetProvider, GeneratingRegion, ProviderDecl, ProviderError, Rect2,
};
use nebula_terrain::seed::{cell_rng, cells_covering};
use nebula_terrain::{SEA_LEVEL, SURFACE_HEIGHT, Symmetry};
use rand::Rng;

use super::{BLOCKED_AREA, ROADS, SETTLEMENTS, TREES};
use crate::filter::{BlockedMask, PlacementFilter, RoadProximity, SettlementArea, Underwater};

const TREE_SALT: u64 = 0x7733_0000_0000_0005;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeKind {
    Oak,
    Birch,
    Spruce,
}

impl TreeKind {
    pub const ALL: [TreeKind; 3] = [TreeKind::Oak, TreeKind::Birch, TreeKind::Spruce];

    pub fn name(&self) -> &'static str {
        match self {
            TreeKind::Oak => "oak",
            TreeKind::Birch => "birch",
            TreeKind::Spruce => "spruce",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request to grow a tree whose trunk starts at `position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeSpawn {
    pub position: IVec3,
    pub kind: TreeKind,
}

/// Vegetation tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeParams {
    /// Side of the jitter grid; each cell holds at most one tree.
    pub cell_size: i32,
    /// Probability that a cell holds a tree candidate.
    pub chance: f64,
    /// Free columns kept between a trunk and a road edge.
    pub road_margin: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            cell_size: 7,
            chance: 0.45,
            road_margin: 2.0,
        }
    }
}

impl TreeParams {
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.cell_size < 1 || !(0.0..=1.0).contains(&self.chance) || self.road_margin < 0.0 {
            return Err(ProviderError::InvalidParameter(format!(
                "tree cell size {} must be positive, chance {} within [0, 1] and road margin {} non-negative",
                self.cell_size, self.chance, self.road_margin
            )));
        }
        Ok(())
    }
}

/// Produces [`TREES`] on open ground: off roads, settlements, blocked
/// columns and water.
pub struct TreeProvider {
    params: TreeParams,
    symmetry: Option<Symmetry>,
}

impl TreeProvider {
    pub fn new(params: TreeParams, symmetry: Option<Symmetry>) -> Self {
        Self { params, symmetry }
    }

    fn candidate(&self, seed: u64, cell: IVec2) -> Option<(IVec2, TreeKind)> {
        let mut rng = cell_rng(seed, TREE_SALT, cell);
        if rng.random::<f64>() >= self.params.chance {
            return None;
        }
        let size = self.params.cell_size;
        let p = cell * size + IVec2::new(rng.random_range(0..size), rng.random_range(0..size));
        let kind = TreeKind::ALL[rng.random_range(0..TreeKind::ALL.len())];
        Some((p, kind))
    }

    /// Candidate columns inside `rect`, ordered by column.
    fn candidates(&self, seed: u64, rect: Rect2) -> Vec<(IVec2, TreeKind)> {
        let size = self.params.cell_size;
        let mut found = Vec::new();
        match self.symmetry {
            None => {
                found.extend(
                    cells_covering(rect.min, rect.max(), size)
                        .filter_map(|cell| self.candidate(seed, cell)),
                );
            }
            Some(symmetry) => {
                let mirrored = symmetry.mirror_rect(rect);
                let cells = cells_covering(rect.min, rect.max(), size)
                    .chain(cells_covering(mirrored.min, mirrored.max(), size));
                for (p, kind) in cells.filter_map(|cell| self.candidate(seed, cell)) {
                    if symmetry.is_mirrored(p) {
                        continue;
                    }
                    found.push((p, kind));
                    found.push((symmetry.mirror(p), kind));
                }
            }
        }
        found.retain(|(p, _)| rect.contains(*p));
        found.sort_by_key(|(p, _)| (p.y, p.x));
        found.dedup();
        found
    }
}

impl FacetProvider for TreeProvider {
    fn name(&self) -> &str {
        "trees"
    }

    fn declare(&self) -> ProviderDecl {
        ProviderDecl::new()
            .produces(TREES)
            .requires(BLOCKED_AREA, Border3::ZERO)
            .requires(ROADS, Border3::sides(self.params.road_margin.ceil() as u32))
            .requires(SETTLEMENTS, Border3::ZERO)
            .requires(SURFACE_HEIGHT, Border3::ZERO)
            .requires(SEA_LEVEL, Border3::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        self.params.validate()?;
        let rect = region.facet_rect(TREES);
        let candidates = self.candidates(region.seed(), rect);

        let trees: Vec<TreeSpawn> = {
            let surface = region.facet(SURFACE_HEIGHT)?;
            let filter = PlacementFilter::new()
                .with(BlockedMask(region.facet(BLOCKED_AREA)?))
                .with(RoadProximity {
                    roads: region.facet(ROADS)?,
                    margin: self.params.road_margin,
                })
                .with(SettlementArea(region.facet(SETTLEMENTS)?))
                .with(Underwater {
                    surface,
                    sea_level: *region.facet(SEA_LEVEL)?,
                });
            candidates
                .into_iter()
                .filter(|(p, _)| filter.allows(*p))
                .map(|(p, kind)| TreeSpawn {
                    position: IVec3::new(p.x, surface.surface_y(p) + 1, p.y),
                    kind,
                })
                .collect()
        };

        tracing::trace!(count = trees.len(), "trees planted");
        region.set_facet(TREES, trees);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::filter::road_excludes;
    use crate::settlement::Settlement;
    use crate::shape::RoadSegment;
    use glam::Vec2;
    use nebula_facet::{FacetGrid, FieldPipeline, Region3};
    use nebula_terrain::{HeightSlice, InfiniteHeightField};

    /// Flat ground at height 20 with one road and one settlement.
    struct Scene {
        sea_level: i32,
        roads: Vec<RoadSegment>,
        sites: Vec<Settlement>,
    }

    impl FacetProvider for Scene {
        fn name(&self) -> &str {
            "scene"
        }

        fn declare(&self) -> ProviderDecl {
            ProviderDecl::new()
                .produces(SURFACE_HEIGHT)
                .produces(SEA_LEVEL)
                .produces(ROADS)
                .produces(SETTLEMENTS)
                .produces(BLOCKED_AREA)
        }

        fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
            let field = InfiniteHeightField::new(|_x: f64, _z: f64| 0.0, 20.0, None);
            let surface = HeightSlice::materialize(
                &field,
                region.region().rect(),
                region.border_for(SURFACE_HEIGHT).sides,
            );
            let mut blocked = FacetGrid::new(
                region.region().rect(),
                region.border_for(BLOCKED_AREA).sides,
                false,
            );
            if blocked.contains_world(IVec2::new(3, 3)) {
                blocked.set_world(IVec2::new(3, 3), true);
            }
            region.set_facet(SURFACE_HEIGHT, surface);
            region.set_facet(SEA_LEVEL, self.sea_level);
            region.set_facet(ROADS, self.roads.clone());
            region.set_facet(SETTLEMENTS, self.sites.clone());
            region.set_facet(BLOCKED_AREA, blocked);
            Ok(())
        }
    }

    fn road() -> RoadSegment {
        RoadSegment {
            start: Vec2::new(-40.0, 10.0),
            end: Vec2::new(40.0, 10.0),
            width: 3.0,
            material: BlockType::Gravel,
        }
    }

    fn site() -> Settlement {
        Settlement {
            center: IVec2::new(-16, -16),
            radius: 8,
            ground_height: 20,
        }
    }

    fn dense() -> TreeParams {
        TreeParams {
            cell_size: 3,
            chance: 1.0,
            road_margin: 2.0,
        }
    }

    fn trees_in(
        scene: Scene,
        params: TreeParams,
        symmetry: Option<Symmetry>,
        region: Region3,
    ) -> Vec<TreeSpawn> {
        let pipeline = FieldPipeline::builder(21)
            .with_provider(scene)
            .with_provider(TreeProvider::new(params, symmetry))
            .build()
            .unwrap();
        pipeline.generate(region).unwrap().get(TREES).unwrap().clone()
    }

    fn region() -> Region3 {
        Region3::new(IVec3::new(-32, 0, -32), IVec3::new(64, 48, 64))
    }

    fn scene(sea_level: i32) -> Scene {
        Scene {
            sea_level,
            roads: vec![road()],
            sites: vec![site()],
        }
    }

    #[test]
    fn test_trees_stay_on_open_ground() {
        let trees = trees_in(scene(4), dense(), None, region());
        assert!(!trees.is_empty());
        for tree in &trees {
            let p = IVec2::new(tree.position.x, tree.position.z);
            assert!(!road_excludes(&road(), 2.0, p), "{p} too close to the road");
            assert!(!site().contains(p.as_vec2()), "{p} inside the settlement");
            assert_ne!(p, IVec2::new(3, 3), "blocked column");
            assert_eq!(tree.position.y, 21, "Trunk starts on top of the surface");
        }
    }

    #[test]
    fn test_no_trees_under_water() {
        assert!(trees_in(scene(30), dense(), None, region()).is_empty());
    }

    #[test]
    fn test_split_regions_agree_with_whole() {
        let empty = || Scene {
            sea_level: 4,
            roads: Vec::new(),
            sites: Vec::new(),
        };
        let whole = trees_in(empty(), TreeParams::default(), None, region());
        let size = IVec3::new(32, 48, 64);
        let mut halves = trees_in(
            empty(),
            TreeParams::default(),
            None,
            Region3::new(IVec3::new(-32, 0, -32), size),
        );
        halves.extend(trees_in(
            empty(),
            TreeParams::default(),
            None,
            Region3::new(IVec3::new(0, 0, -32), size),
        ));
        halves.sort_by_key(|t| (t.position.z, t.position.x));
        assert_eq!(whole, halves);
    }

    #[test]
    fn test_symmetric_trees_have_mirror_twins() {
        let symmetry = Symmetry::AxisX;
        let empty = Scene {
            sea_level: 4,
            roads: Vec::new(),
            sites: Vec::new(),
        };
        let trees = trees_in(empty, TreeParams::default(), Some(symmetry), region());
        assert!(!trees.is_empty());
        for tree in &trees {
            let p = IVec2::new(tree.position.x, tree.position.z);
            let m = symmetry.mirror(p);
            assert!(
                trees
                    .iter()
                    .any(|t| t.position.x == m.x && t.position.z == m.y && t.kind == tree.kind),
                "No mirror twin for {p}"
            );
        }
    }

    #[test]
    fn test_invalid_chance_rejected() {
        let params = TreeParams {
            chance: 1.5,
            ..TreeParams::default()
        };
        assert!(params.validate().is_err());
    }
}
