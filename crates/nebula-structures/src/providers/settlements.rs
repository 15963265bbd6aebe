use nebula_facet::{Border3, FacetProvider, GeneratingRegion, ProviderDecl, ProviderError};
use nebula_terrain::{SEA_LEVEL, SURFACE_HEIGHT};

use super::SETTLEMENTS;
use crate::settlement::SettlementLayout;

/// Produces [`SETTLEMENTS`].
pub struct SettlementProvider {
    layout: SettlementLayout,
}

impl SettlementProvider {
    pub fn new(layout: SettlementLayout) -> Self {
        Self { layout }
    }
}

impl FacetProvider for SettlementProvider {
    fn name(&self) -> &str {
        "settlements"
    }

    fn declare(&self) -> ProviderDecl {
        ProviderDecl::new()
            .produces(SETTLEMENTS)
            .requires(SEA_LEVEL, Border3::ZERO)
    }

    fn initialize(&mut self, seed: u64) {
        self.layout.reseed(seed);
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        self.layout.params().validate()?;
        let sea_level = *region.facet(SEA_LEVEL)?;
        let rect = region.facet_rect(SETTLEMENTS);
        let settlements = self.layout.settlements_touching(rect, sea_level);
        tracing::trace!(count = settlements.len(), ?rect, "settlements placed");
        region.set_facet(SETTLEMENTS, settlements);
        Ok(())
    }
}

/// Levels the terrain under every settlement to its ground height.
///
/// Updates [`SURFACE_HEIGHT`] over its whole bordered area, so it places
/// settlements itself instead of reading [`SETTLEMENTS`], whose border may
/// be smaller.
pub struct SettlementFlattener {
    layout: SettlementLayout,
}

impl SettlementFlattener {
    pub fn new(layout: SettlementLayout) -> Self {
        Self { layout }
    }
}

impl FacetProvider for SettlementFlattener {
    fn name(&self) -> &str {
        "settlement_flattener"
    }

    fn declare(&self) -> ProviderDecl {
        ProviderDecl::new()
            .updates(SURFACE_HEIGHT)
            .requires(SEA_LEVEL, Border3::ZERO)
    }

    fn initialize(&mut self, seed: u64) {
        self.layout.reseed(seed);
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        self.layout.params().validate()?;
        let sea_level = *region.facet(SEA_LEVEL)?;
        let surface = region.facet_mut(SURFACE_HEIGHT)?;
        let area = surface.world_rect();

        for settlement in self.layout.settlements_touching(area, sea_level) {
            let Some(bounds) = area.intersect(&settlement.bounds()) else {
                continue;
            };
            for p in bounds.iter() {
                if settlement.contains(p.as_vec2()) {
                    surface.set_height(p, settlement.ground_height as f32);
                }
            }
        }
        Ok(())
    }
}
