use nebula_facet::{
    Border3, FacetGrid, FacetProvider, GeneratingRegion, ProviderDecl, ProviderError,
};

use super::{BLOCKED_AREA, BUILDINGS, ROADS};
use crate::geometry::distance_to_segment;

/// Produces [`BLOCKED_AREA`]: `true` on every column under a building
/// footprint or a road surface.
#[derive(Default)]
pub struct BlockedAreaProvider;

impl BlockedAreaProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FacetProvider for BlockedAreaProvider {
    fn name(&self) -> &str {
        "blocked_area"
    }

    fn declare(&self) -> ProviderDecl {
        ProviderDecl::new()
            .produces(BLOCKED_AREA)
            .requires(BUILDINGS, Border3::ZERO)
            .requires(ROADS, Border3::ZERO)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        let border = region.border_for(BLOCKED_AREA).sides;
        let mut mask = FacetGrid::new(region.region().rect(), border, false);
        let area = mask.world_rect();

        for building in region.facet(BUILDINGS)? {
            if let Some(covered) = area.intersect(&building.footprint) {
                for p in covered.iter() {
                    mask.set_world(p, true);
                }
            }
        }

        for road in region.facet(ROADS)? {
            let Some(covered) = area.intersect(&road.footprint()) else {
                continue;
            };
            for p in covered.iter() {
                if distance_to_segment(p.as_vec2(), road.start, road.end) <= road.half_width() {
                    mask.set_world(p, true);
                }
            }
        }

        region.set_facet(BLOCKED_AREA, mask);
        Ok(())
    }
}
