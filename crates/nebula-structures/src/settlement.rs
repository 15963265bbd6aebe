//! Settlement placement on a coarse cell grid.
//!
//! Every cell decides on its own, from a cell-seeded RNG, whether it holds a
//! settlement. Any region can therefore enumerate the settlements near it
//! without coordinating with its neighbours. Settlement discs stay inside
//! their cell, so two settlements never overlap.

use glam::{IVec2, Vec2};
use nebula_facet::{ProviderError, Rect2};
use nebula_terrain::seed::{cell_rng, cells_covering};
use nebula_terrain::{HeightmapParams, InfiniteHeightField, Symmetry};
use rand::Rng;

use crate::geometry::disc_touches_rect;

const SETTLEMENT_SALT: u64 = 0x5e77_1e3e_0000_0001;

/// A flat, circular building site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Settlement {
    pub center: IVec2,
    pub radius: i32,
    /// Terrain layer the site is levelled to.
    pub ground_height: i32,
}

impl Settlement {
    /// Whether column `p` lies on the site (boundary included).
    pub fn contains(&self, p: Vec2) -> bool {
        p.distance(self.center.as_vec2()) <= self.radius as f32
    }

    /// Bounding rectangle of the disc.
    pub fn bounds(&self) -> Rect2 {
        Rect2::from_min_max(
            self.center - IVec2::splat(self.radius),
            self.center + IVec2::splat(self.radius),
        )
    }

    pub fn mirrored(&self, symmetry: Symmetry) -> Settlement {
        Settlement {
            center: symmetry.mirror(self.center),
            ..*self
        }
    }
}

/// Placement tuning.
#[derive(Clone, Debug, PartialEq)]
pub struct SettlementParams {
    /// Side of a placement cell, in columns.
    pub cell_size: i32,
    /// Probability that a cell holds a settlement.
    pub spawn_chance: f64,
    pub min_radius: i32,
    pub max_radius: i32,
}

impl Default for SettlementParams {
    fn default() -> Self {
        Self {
            cell_size: 128,
            spawn_chance: 0.35,
            min_radius: 12,
            max_radius: 24,
        }
    }
}

impl SettlementParams {
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.min_radius < 1 || self.min_radius > self.max_radius {
            return Err(ProviderError::InvalidParameter(format!(
                "settlement radius range {}..={} is empty or non-positive",
                self.min_radius, self.max_radius
            )));
        }
        if self.cell_size <= 2 * self.max_radius {
            return Err(ProviderError::InvalidParameter(format!(
                "settlement cell size {} must exceed twice the max radius {}",
                self.cell_size, self.max_radius
            )));
        }
        if !(0.0..=1.0).contains(&self.spawn_chance) {
            return Err(ProviderError::InvalidParameter(format!(
                "settlement spawn chance {} is not a probability",
                self.spawn_chance
            )));
        }
        Ok(())
    }
}

/// Deterministic settlement placement for one world.
///
/// Owns its own copy of the terrain height field so ground heights can be
/// read for settlements centered outside the current region.
#[derive(Clone, Debug)]
pub struct SettlementLayout {
    params: SettlementParams,
    terrain: HeightmapParams,
    base_height: f32,
    symmetry: Option<Symmetry>,
    field: InfiniteHeightField,
    seed: u64,
}

impl SettlementLayout {
    pub fn new(
        params: SettlementParams,
        terrain: HeightmapParams,
        base_height: f32,
        symmetry: Option<Symmetry>,
    ) -> Self {
        let field = InfiniteHeightField::from_params(terrain.clone(), base_height, symmetry);
        Self {
            seed: terrain.seed,
            params,
            terrain,
            base_height,
            symmetry,
            field,
        }
    }

    /// Rebuilds the height field for a new world seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.terrain.seed = seed;
        self.field =
            InfiniteHeightField::from_params(self.terrain.clone(), self.base_height, self.symmetry);
    }

    pub fn params(&self) -> &SettlementParams {
        &self.params
    }

    pub fn symmetry(&self) -> Option<Symmetry> {
        self.symmetry
    }

    /// The settlement cell `cell` holds, if any, ignoring symmetry.
    pub fn candidate(&self, cell: IVec2, sea_level: i32) -> Option<Settlement> {
        let p = &self.params;
        let mut rng = cell_rng(self.seed, SETTLEMENT_SALT, cell);
        if rng.random::<f64>() >= p.spawn_chance {
            return None;
        }
        let radius = rng.random_range(p.min_radius..=p.max_radius);
        let origin = cell * p.cell_size;
        let center = origin
            + IVec2::new(
                rng.random_range(radius..p.cell_size - radius),
                rng.random_range(radius..p.cell_size - radius),
            );
        let ground_height = self.field.sample(center).floor() as i32;
        (ground_height > sea_level).then_some(Settlement {
            center,
            radius,
            ground_height,
        })
    }

    /// Every settlement whose disc reaches `rect`, ordered by center.
    ///
    /// With a symmetry, only settlements generated on the canonical side
    /// and clear of the axis are kept, together with their mirror images.
    pub fn settlements_touching(&self, rect: Rect2, sea_level: i32) -> Vec<Settlement> {
        let query = rect.expand(self.params.max_radius);
        let mut cells: Vec<IVec2> =
            cells_covering(query.min, query.max(), self.params.cell_size).collect();
        if let Some(symmetry) = self.symmetry {
            let mirrored = symmetry.mirror_rect(query);
            cells.extend(cells_covering(
                mirrored.min,
                mirrored.max(),
                self.params.cell_size,
            ));
            cells.sort_by_key(|c| (c.y, c.x));
            cells.dedup();
        }

        let mut found = Vec::new();
        for cell in cells {
            let Some(settlement) = self.candidate(cell, sea_level) else {
                continue;
            };
            match self.symmetry {
                None => found.push(settlement),
                Some(symmetry) => {
                    if symmetry.is_mirrored(settlement.center)
                        || symmetry.distance_to_axis(settlement.center.as_vec2())
                            <= settlement.radius as f32
                    {
                        continue;
                    }
                    found.push(settlement);
                    found.push(settlement.mirrored(symmetry));
                }
            }
        }

        found.retain(|s| disc_touches_rect(s.center, s.radius as f32, rect));
        found.sort_by_key(|s| (s.center.y, s.center.x));
        found.dedup();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(seed: u64, symmetry: Option<Symmetry>) -> SettlementLayout {
        let mut layout = SettlementLayout::new(
            SettlementParams {
                cell_size: 64,
                spawn_chance: 0.8,
                min_radius: 6,
                max_radius: 12,
            },
            HeightmapParams::default(),
            40.0,
            symmetry,
        );
        layout.reseed(seed);
        layout
    }

    #[test]
    fn test_candidate_is_deterministic_and_inside_cell() {
        let layout = layout(3, None);
        for x in -5..5 {
            for z in -5..5 {
                let cell = IVec2::new(x, z);
                let a = layout.candidate(cell, 0);
                assert_eq!(a, layout.candidate(cell, 0));
                if let Some(s) = a {
                    let cell_rect = Rect2::new(cell * 64, IVec2::splat(64));
                    assert!(
                        cell_rect.contains_rect(&s.bounds()),
                        "Disc {s:?} leaks out of cell {cell}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_settlements_below_sea_level() {
        let layout = layout(3, None);
        let all = layout.settlements_touching(Rect2::new(IVec2::splat(-512), IVec2::splat(1024)), 1000);
        assert!(all.is_empty());
    }

    #[test]
    fn test_overlapping_queries_agree() {
        let layout = layout(11, None);
        let big = Rect2::new(IVec2::splat(-256), IVec2::splat(512));
        let all = layout.settlements_touching(big, 0);
        assert!(!all.is_empty(), "Expected some settlements with spawn chance 0.8");

        let small = Rect2::new(IVec2::new(-40, 10), IVec2::new(100, 60));
        let part = layout.settlements_touching(small, 0);
        for s in &part {
            assert!(all.contains(s), "{s:?} missing from the larger query");
        }
        let expected: Vec<_> = all
            .iter()
            .filter(|s| disc_touches_rect(s.center, s.radius as f32, small))
            .copied()
            .collect();
        assert_eq!(part, expected);
    }

    #[test]
    fn test_symmetric_layout_is_closed_under_mirror() {
        for symmetry in Symmetry::ALL {
            let layout = layout(21, Some(symmetry));
            let area = Rect2::new(IVec2::splat(-300), IVec2::splat(600));
            let all = layout.settlements_touching(area.expand(64), 0);
            for s in all.iter().filter(|s| area.contains(s.center)) {
                let image = s.mirrored(symmetry);
                assert!(all.contains(&image), "{symmetry:?}: mirror of {s:?} missing");
                assert!(
                    symmetry.distance_to_axis(s.center.as_vec2()) > s.radius as f32,
                    "{symmetry:?}: {s:?} crosses the axis"
                );
            }
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(SettlementParams::default().validate().is_ok());
        let crowded = SettlementParams {
            cell_size: 40,
            max_radius: 20,
            ..Default::default()
        };
        assert!(crowded.validate().is_err());
        let inverted = SettlementParams {
            min_radius: 30,
            max_radius: 20,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
    }
}
