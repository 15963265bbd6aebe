//! Facet pipeline: regions, bordered grids, dependency-ordered providers,
//! per-region facet caching and parallel region generation.

mod async_generation;
mod border;
mod cache;
mod error;
mod facets;
mod grid;
mod pipeline;
mod provider;
mod region;

pub use async_generation::{GeneratedRegion, RegionGenerator, default_thread_count};
pub use border::Border3;
pub use cache::{CacheKey, CacheStats, FacetCache};
pub use error::PipelineError;
pub use facets::{GeneratingRegion, RegionFacets};
pub use grid::{BorderedGrid, FacetGrid};
pub use pipeline::{FieldPipeline, FieldPipelineBuilder};
pub use provider::{FacetKey, FacetProvider, FieldId, ProviderDecl, ProviderError, Requirement};
pub use region::{Rect2, Region3};
