//! Per-region facet storage.
//!
//! A [`GeneratingRegion`] is owned by one pipeline run and collects every
//! facet the providers write; once the run completes it is frozen into a
//! read-only [`RegionFacets`].

use std::any::Any;

use rustc_hash::FxHashMap;

use crate::border::Border3;
use crate::error::PipelineError;
use crate::provider::{FacetKey, FieldId, ProviderError};
use crate::region::{Rect2, Region3};

type FacetBox = Box<dyn Any + Send + Sync>;

/// Mutable facet store for one in-progress region.
pub struct GeneratingRegion {
    region: Region3,
    seed: u64,
    borders: FxHashMap<FieldId, Border3>,
    facets: FxHashMap<FieldId, FacetBox>,
}

impl GeneratingRegion {
    pub(crate) fn new(region: Region3, seed: u64, borders: FxHashMap<FieldId, Border3>) -> Self {
        Self {
            region,
            seed,
            borders,
            facets: FxHashMap::default(),
        }
    }

    pub fn region(&self) -> Region3 {
        self.region
    }

    /// World seed of the pipeline running this region.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Border the given facet must be computed with for this run.
    pub fn border_for<T>(&self, key: FacetKey<T>) -> Border3 {
        self.borders.get(&key.id()).copied().unwrap_or_default()
    }

    /// Horizontal area the given facet must cover: region plus border.
    pub fn facet_rect<T>(&self, key: FacetKey<T>) -> Rect2 {
        self.border_for(key).expand_rect(self.region.rect())
    }

    /// Reads an input facet.
    pub fn facet<T: Any>(&self, key: FacetKey<T>) -> Result<&T, ProviderError> {
        let boxed = self
            .facets
            .get(&key.id())
            .ok_or(ProviderError::MissingInput(key.id()))?;
        boxed
            .downcast_ref::<T>()
            .ok_or(ProviderError::TypeMismatch(key.id()))
    }

    /// Mutable access to a facet produced upstream, for updating providers.
    pub fn facet_mut<T: Any>(&mut self, key: FacetKey<T>) -> Result<&mut T, ProviderError> {
        let boxed = self
            .facets
            .get_mut(&key.id())
            .ok_or(ProviderError::MissingInput(key.id()))?;
        boxed
            .downcast_mut::<T>()
            .ok_or(ProviderError::TypeMismatch(key.id()))
    }

    /// Stores a produced facet, replacing any earlier value.
    pub fn set_facet<T: Any + Send + Sync>(&mut self, key: FacetKey<T>, value: T) {
        self.facets.insert(key.id(), Box::new(value));
    }

    pub fn has_facet(&self, field: FieldId) -> bool {
        self.facets.contains_key(&field)
    }

    pub(crate) fn freeze(self) -> RegionFacets {
        RegionFacets {
            region: self.region,
            seed: self.seed,
            borders: self.borders,
            facets: self.facets,
        }
    }
}

/// Completed, immutable facets of one region.
pub struct RegionFacets {
    region: Region3,
    seed: u64,
    borders: FxHashMap<FieldId, Border3>,
    facets: FxHashMap<FieldId, FacetBox>,
}

impl RegionFacets {
    pub fn region(&self) -> Region3 {
        self.region
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reads a facet by key.
    pub fn get<T: Any>(&self, key: FacetKey<T>) -> Result<&T, PipelineError> {
        let boxed = self
            .facets
            .get(&key.id())
            .ok_or(PipelineError::MissingFacet { field: key.id() })?;
        boxed
            .downcast_ref::<T>()
            .ok_or(PipelineError::FacetTypeMismatch { field: key.id() })
    }

    /// Border the facet was computed with.
    pub fn border_of(&self, field: FieldId) -> Border3 {
        self.borders.get(&field).copied().unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.facets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

impl std::fmt::Debug for RegionFacets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<_> = self.fields().collect();
        fields.sort();
        f.debug_struct("RegionFacets")
            .field("region", &self.region)
            .field("seed", &self.seed)
            .field("fields", &fields)
            .finish()
    }
}
