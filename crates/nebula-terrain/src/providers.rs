//! Terrain facet providers.

use nebula_facet::{FacetKey, FacetProvider, GeneratingRegion, ProviderDecl, ProviderError};

use crate::height_field::InfiniteHeightField;
use crate::height_slice::HeightSlice;
use crate::heightmap::HeightmapParams;
use crate::symmetry::Symmetry;

/// Surface height per column, materialized with the propagated border.
pub const SURFACE_HEIGHT: FacetKey<HeightSlice> = FacetKey::new("surface_height");

/// World water level in voxels.
pub const SEA_LEVEL: FacetKey<i32> = FacetKey::new("sea_level");

/// Produces [`SURFACE_HEIGHT`] from an fBm height field.
///
/// The noise seed comes from the pipeline at assembly time; whatever seed
/// `params` carries is replaced.
pub struct SurfaceHeightProvider {
    params: HeightmapParams,
    base_height: f32,
    symmetry: Option<Symmetry>,
    field: InfiniteHeightField,
}

impl SurfaceHeightProvider {
    pub fn new(params: HeightmapParams, base_height: f32, symmetry: Option<Symmetry>) -> Self {
        let field = InfiniteHeightField::from_params(params.clone(), base_height, symmetry);
        Self {
            params,
            base_height,
            symmetry,
            field,
        }
    }

    pub fn field(&self) -> &InfiniteHeightField {
        &self.field
    }
}

impl FacetProvider for SurfaceHeightProvider {
    fn name(&self) -> &str {
        "surface_height"
    }

    fn declare(&self) -> ProviderDecl {
        ProviderDecl::new().produces(SURFACE_HEIGHT)
    }

    fn initialize(&mut self, seed: u64) {
        self.params.seed = seed;
        self.field =
            InfiniteHeightField::from_params(self.params.clone(), self.base_height, self.symmetry);
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        let border = region.border_for(SURFACE_HEIGHT).sides;
        let slice = HeightSlice::materialize(&self.field, region.region().rect(), border);
        tracing::trace!(
            region = ?region.region(),
            border,
            columns = slice.world_rect().area(),
            "materialized height slice"
        );
        region.set_facet(SURFACE_HEIGHT, slice);
        Ok(())
    }
}

/// Produces the constant [`SEA_LEVEL`].
pub struct SeaLevelProvider {
    level: i32,
}

impl SeaLevelProvider {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl FacetProvider for SeaLevelProvider {
    fn name(&self) -> &str {
        "sea_level"
    }

    fn declare(&self) -> ProviderDecl {
        ProviderDecl::new().produces(SEA_LEVEL)
    }

    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError> {
        region.set_facet(SEA_LEVEL, self.level);
        Ok(())
    }
}
