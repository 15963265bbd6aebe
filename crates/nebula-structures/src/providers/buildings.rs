use nebula_facet::{Border3, FacetProvider, GeneratingRegion, ProviderDecl, ProviderError};
use nebula_terrain::Symmetry;

use super::{BUILDINGS, ROADS, SETTLEMENTS};
use crate::building::{Building, BuildingParams, layout_buildings};

/// Produces [`BUILDINGS`] on settlement sites, clear of roads.
///
/// With a symmetry, buildings of mirrored settlements are the mirror images
/// of their canonical twin's buildings.
pub struct BuildingProvider {
    params: BuildingParams,
    max_settlement_radius: i32,
    symmetry: Option<Symmetry>,
}

impl BuildingProvider {
    pub fn new(
        params: BuildingParams,
        max_settlement_radius: i32,
        symmetry: Option<Symmetry>,
    ) -> Self {
        Self {
            params,
            max_settlement_radius,
            symmetry,
        }
    }
}

impl FacetProvider for BuildingProvider {
    fn name(&self) -> &str {
        "buildings"
    }

    fn declare(&self) -> ProviderDecl {
        // Roads anywhere near a settlement touching the area can block one
        // of its buildings.
        let road_border = self
            .max_settlement_radius
            .saturating_mul(2)
            .saturating_add(self.params.road_clearance.ceil() as i32)
            .saturating_add(1);
        ProviderDecl::new()
            .produces(BUILDINGS)
            .requires(SETTLEMENTS, Border3::ZERO)
            .requires(ROADS, Border3::sides(road_border.max(0) as u32))
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        self.params.validate()?;
        let rect = region.facet_rect(BUILDINGS);
        let seed = region.seed();
        let settlements = region.facet(SETTLEMENTS)?;
        let roads = region.facet(ROADS)?;

        let mut buildings = Vec::new();
        for settlement in settlements {
            let placed: Vec<Building> = match self.symmetry {
                Some(symmetry) if symmetry.is_mirrored(settlement.center) => {
                    let canonical = settlement.mirrored(symmetry);
                    layout_buildings(seed, &canonical, &self.params)
                        .into_iter()
                        .map(|b| b.mirrored(symmetry))
                        .collect()
                }
                _ => layout_buildings(seed, settlement, &self.params),
            };
            buildings.extend(placed.into_iter().filter(|b| {
                b.footprint.intersects(&rect)
                    && !roads
                        .iter()
                        .any(|road| b.conflicts_with(road, self.params.road_clearance))
            }));
        }

        tracing::trace!(count = buildings.len(), "buildings placed");
        region.set_facet(BUILDINGS, buildings);
        Ok(())
    }
}
