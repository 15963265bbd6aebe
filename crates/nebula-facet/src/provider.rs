//! Facet identifiers, provider declarations and the [`FacetProvider`] trait.

use std::fmt;
use std::marker::PhantomData;

use crate::border::Border3;
use crate::facets::GeneratingRegion;

/// Name of a facet layer. Each facet is produced by exactly one provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(&'static str);

impl FieldId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A [`FieldId`] tagged with the Rust type stored under it.
pub struct FacetKey<T> {
    id: FieldId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FacetKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            id: FieldId::new(name),
            _marker: PhantomData,
        }
    }

    pub const fn id(&self) -> FieldId {
        self.id
    }
}

impl<T> Clone for FacetKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FacetKey<T> {}

impl<T> fmt::Debug for FacetKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FacetKey({})", self.id)
    }
}

/// A facet a provider reads, and the border it must be valid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub field: FieldId,
    pub border: Border3,
}

impl Requirement {
    pub fn new(field: FieldId, border: Border3) -> Self {
        Self { field, border }
    }
}

/// What a provider produces, reads and updates.
///
/// Evaluated once, when the pipeline is assembled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderDecl {
    pub produces: Vec<FieldId>,
    pub requires: Vec<Requirement>,
    pub updates: Vec<FieldId>,
}

impl ProviderDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn produces<T>(mut self, key: FacetKey<T>) -> Self {
        self.produces.push(key.id());
        self
    }

    pub fn requires<T>(mut self, key: FacetKey<T>, border: Border3) -> Self {
        self.requires.push(Requirement::new(key.id(), border));
        self
    }

    pub fn updates<T>(mut self, key: FacetKey<T>) -> Self {
        self.updates.push(key.id());
        self
    }

    /// Fields this provider writes, produced or updated.
    pub fn outputs(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.produces.iter().chain(self.updates.iter()).copied()
    }
}

/// Errors raised by a provider while processing a region.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// An input facet was not present in the generating region.
    #[error("missing input facet `{0}`")]
    MissingInput(FieldId),

    /// A facet exists but holds a different type than requested.
    #[error("facet `{0}` holds an unexpected type")]
    TypeMismatch(FieldId),

    /// The provider was configured with unusable parameters.
    #[error("invalid provider parameter: {0}")]
    InvalidParameter(String),
}

/// A stage of the facet pipeline.
///
/// Providers are registered explicitly with a
/// [`FieldPipelineBuilder`](crate::FieldPipelineBuilder); their
/// [`declare`](FacetProvider::declare) output is validated at assembly time.
pub trait FacetProvider: Send + Sync {
    /// Human-readable name used in logs and errors.
    fn name(&self) -> &str;

    /// Produced, required and updated facets.
    fn declare(&self) -> ProviderDecl;

    /// Called once at pipeline assembly with the world seed.
    fn initialize(&mut self, _seed: u64) {}

    /// Computes this provider's outputs for one region.
    ///
    /// Produced facets must cover the region plus
    /// [`GeneratingRegion::border_for`] of that facet.
    fn process(&self, region: &mut GeneratingRegion) -> Result<(), ProviderError>;
}
