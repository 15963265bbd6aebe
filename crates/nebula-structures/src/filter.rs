//! Exclusion predicates for placement gating.
//!
//! Each [`Exclusion`] is a pure test of a candidate column. A
//! [`PlacementFilter`] admits a column only when no exclusion rejects it.

use glam::IVec2;
use nebula_facet::FacetGrid;
use nebula_terrain::HeightSlice;

use crate::geometry::distance_to_segment;
use crate::settlement::Settlement;
use crate::shape::RoadSegment;

/// A reason to keep something off a column.
pub trait Exclusion {
    fn excludes(&self, p: IVec2) -> bool;
}

/// Columns marked in a blocked-area mask. Columns outside the mask are not
/// excluded.
pub struct BlockedMask<'a>(pub &'a FacetGrid<bool>);

impl Exclusion for BlockedMask<'_> {
    fn excludes(&self, p: IVec2) -> bool {
        self.0.try_get_world(p).unwrap_or(false)
    }
}

/// Whether `p` lies strictly closer than `width / 2 + margin` to the road's
/// centerline. A column exactly at that distance is not excluded.
pub fn road_excludes(road: &RoadSegment, margin: f32, p: IVec2) -> bool {
    distance_to_segment(p.as_vec2(), road.start, road.end) < road.half_width() + margin
}

/// Whether `p` lies on the settlement disc, boundary included.
pub fn settlement_excludes(settlement: &Settlement, p: IVec2) -> bool {
    settlement.contains(p.as_vec2())
}

/// Columns near any road.
pub struct RoadProximity<'a> {
    pub roads: &'a [RoadSegment],
    pub margin: f32,
}

impl Exclusion for RoadProximity<'_> {
    fn excludes(&self, p: IVec2) -> bool {
        self.roads.iter().any(|r| road_excludes(r, self.margin, p))
    }
}

/// Columns on any settlement site.
pub struct SettlementArea<'a>(pub &'a [Settlement]);

impl Exclusion for SettlementArea<'_> {
    fn excludes(&self, p: IVec2) -> bool {
        self.0.iter().any(|s| settlement_excludes(s, p))
    }
}

/// Columns whose surface lies at or below the water level.
pub struct Underwater<'a> {
    pub surface: &'a HeightSlice,
    pub sea_level: i32,
}

impl Exclusion for Underwater<'_> {
    fn excludes(&self, p: IVec2) -> bool {
        self.surface
            .try_height(p)
            .is_none_or(|h| h.floor() as i32 <= self.sea_level)
    }
}

/// Logical AND of "not excluded" over a set of exclusions.
#[derive(Default)]
pub struct PlacementFilter<'a> {
    exclusions: Vec<Box<dyn Exclusion + 'a>>,
}

impl<'a> PlacementFilter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, exclusion: impl Exclusion + 'a) -> Self {
        self.exclusions.push(Box::new(exclusion));
        self
    }

    pub fn allows(&self, p: IVec2) -> bool {
        !self.exclusions.iter().any(|e| e.excludes(p))
    }

    pub fn len(&self) -> usize {
        self.exclusions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty()
    }
}
