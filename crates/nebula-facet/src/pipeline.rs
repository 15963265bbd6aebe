//! Dependency-ordered facet pipeline.
//!
//! Providers are registered explicitly, validated once at assembly, and
//! then run sequentially per region in a topological order of the
//! produces/updates/requires graph. Borders are propagated backwards along
//! that order so every provider computes its outputs with at least the
//! border any (transitive) consumer needs.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::border::Border3;
use crate::cache::{CacheStats, FacetCache};
use crate::error::PipelineError;
use crate::facets::{GeneratingRegion, RegionFacets};
use crate::provider::{FacetProvider, FieldId, ProviderDecl, Requirement};
use crate::region::Region3;

struct ProviderNode {
    provider: Box<dyn FacetProvider>,
    decl: ProviderDecl,
}

/// Collects providers and assembles a [`FieldPipeline`].
pub struct FieldPipelineBuilder {
    seed: u64,
    cache_enabled: bool,
    providers: Vec<Box<dyn FacetProvider>>,
}

impl FieldPipelineBuilder {
    /// Starts a pipeline for the given world seed. Caching is enabled by default.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            cache_enabled: true,
            providers: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: impl FacetProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn add_provider(&mut self, provider: Box<dyn FacetProvider>) -> &mut Self {
        self.providers.push(provider);
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Initializes every provider with the seed and resolves the execution order.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::DuplicateProducer`] if two providers produce one facet.
    /// - [`PipelineError::MissingProducer`] if a required or updated facet has no producer.
    /// - [`PipelineError::Cycle`] if the dependency graph is cyclic.
    pub fn build(self) -> Result<FieldPipeline, PipelineError> {
        let seed = self.seed;
        let nodes: Vec<ProviderNode> = self
            .providers
            .into_iter()
            .map(|mut provider| {
                provider.initialize(seed);
                let decl = provider.declare();
                ProviderNode { provider, decl }
            })
            .collect();

        let producers = index_producers(&nodes)?;
        check_inputs(&nodes, &producers)?;
        let order = resolve_order(&nodes, &producers)?;

        let mut slots: Vec<Option<ProviderNode>> = nodes.into_iter().map(Some).collect();
        let nodes: Vec<ProviderNode> = order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();

        let default_borders = propagate_borders(&nodes, &[]);

        tracing::debug!(
            seed,
            order = ?nodes.iter().map(|n| n.provider.name()).collect::<Vec<_>>(),
            "facet pipeline assembled"
        );

        Ok(FieldPipeline {
            seed,
            nodes,
            default_borders,
            cache: self.cache_enabled.then(FacetCache::new),
        })
    }
}

/// An assembled, validated pipeline. Shareable across worker threads.
pub struct FieldPipeline {
    seed: u64,
    nodes: Vec<ProviderNode>,
    default_borders: FxHashMap<FieldId, Border3>,
    cache: Option<FacetCache>,
}

impl FieldPipeline {
    pub fn builder(seed: u64) -> FieldPipelineBuilder {
        FieldPipelineBuilder::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Provider names in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.provider.name()).collect()
    }

    /// Border a facet is computed with when no extra border is requested.
    pub fn border_of(&self, field: FieldId) -> Border3 {
        self.default_borders.get(&field).copied().unwrap_or_default()
    }

    /// Computes (or fetches from cache) every facet for `region`.
    pub fn generate(&self, region: Region3) -> Result<Arc<RegionFacets>, PipelineError> {
        if let Some(cache) = &self.cache
            && let Some(hit) = cache.get(region, self.seed)
        {
            tracing::trace!(?region, "facet cache hit");
            return Ok(hit);
        }

        let facets = Arc::new(self.run(region, self.default_borders.clone())?);
        Ok(match &self.cache {
            Some(cache) => cache.insert(facets),
            None => facets,
        })
    }

    /// Computes every facet for `region`, bypassing the cache, with
    /// additional host-side border requests.
    ///
    /// Requested borders propagate upstream like any provider requirement.
    pub fn generate_uncached(
        &self,
        region: Region3,
        requests: &[Requirement],
    ) -> Result<RegionFacets, PipelineError> {
        for request in requests {
            if !self.default_borders.contains_key(&request.field) {
                return Err(PipelineError::MissingFacet {
                    field: request.field,
                });
            }
        }
        let borders = propagate_borders(&self.nodes, requests);
        self.run(region, borders)
    }

    /// Drops all cached regions. Called by the host on world reset.
    pub fn purge(&self) {
        if let Some(cache) = &self.cache {
            cache.purge();
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.as_ref().map(FacetCache::stats).unwrap_or_default()
    }

    fn run(
        &self,
        region: Region3,
        borders: FxHashMap<FieldId, Border3>,
    ) -> Result<RegionFacets, PipelineError> {
        let _span = tracing::trace_span!("generate_region", ?region).entered();
        let mut generating = GeneratingRegion::new(region, self.seed, borders);

        for node in &self.nodes {
            let name = node.provider.name();
            tracing::trace!(provider = name, "processing");
            node.provider
                .process(&mut generating)
                .map_err(|source| PipelineError::Provider {
                    provider: name.to_string(),
                    source,
                })?;

            if let Some(field) = node
                .decl
                .produces
                .iter()
                .find(|field| !generating.has_facet(**field))
            {
                return Err(PipelineError::MissingOutput {
                    provider: name.to_string(),
                    field: *field,
                });
            }
        }

        Ok(generating.freeze())
    }
}

fn index_producers(nodes: &[ProviderNode]) -> Result<FxHashMap<FieldId, usize>, PipelineError> {
    let mut producers = FxHashMap::default();
    for (index, node) in nodes.iter().enumerate() {
        for field in &node.decl.produces {
            if let Some(&first) = producers.get(field) {
                return Err(PipelineError::DuplicateProducer {
                    field: *field,
                    first: provider_name(nodes, first),
                    second: node.provider.name().to_string(),
                });
            }
            producers.insert(*field, index);
        }
    }
    Ok(producers)
}

fn check_inputs(
    nodes: &[ProviderNode],
    producers: &FxHashMap<FieldId, usize>,
) -> Result<(), PipelineError> {
    for node in nodes {
        let inputs = node
            .decl
            .requires
            .iter()
            .map(|r| r.field)
            .chain(node.decl.updates.iter().copied());
        for field in inputs {
            if !producers.contains_key(&field) {
                return Err(PipelineError::MissingProducer {
                    provider: node.provider.name().to_string(),
                    field,
                });
            }
        }
    }
    Ok(())
}

/// Kahn's algorithm over provider indices, ties broken by registration order.
fn resolve_order(
    nodes: &[ProviderNode],
    producers: &FxHashMap<FieldId, usize>,
) -> Result<Vec<usize>, PipelineError> {
    let mut updaters: FxHashMap<FieldId, Vec<usize>> = FxHashMap::default();
    for (index, node) in nodes.iter().enumerate() {
        for field in &node.decl.updates {
            updaters.entry(*field).or_default().push(index);
        }
    }

    let mut edges: FxHashSet<(usize, usize)> = FxHashSet::default();

    // producer(F) -> updater_1(F) -> updater_2(F) -> ...
    for (field, chain) in &updaters {
        let mut previous = producers[field];
        for &updater in chain {
            edges.insert((previous, updater));
            previous = updater;
        }
    }

    // Every writer of F precedes each reader of F. An updater reading the
    // field it updates only waits for the writers before it in the chain.
    for (index, node) in nodes.iter().enumerate() {
        for requirement in &node.decl.requires {
            let field = requirement.field;
            let chain = updaters.get(&field).map(Vec::as_slice).unwrap_or(&[]);
            let writers: &[usize] = match chain.iter().position(|&u| u == index) {
                Some(position) => &chain[..position],
                None => chain,
            };
            edges.insert((producers[&field], index));
            for &writer in writers {
                edges.insert((writer, index));
            }
        }
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut in_degree = vec![0usize; nodes.len()];
    for &(from, to) in &edges {
        successors[from].push(to);
        in_degree[to] += 1;
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(index, _)| Reverse(index))
        .collect();
    let mut order = Vec::with_capacity(nodes.len());

    while let Some(Reverse(index)) = ready.pop() {
        order.push(index);
        for &next in &successors[index] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < nodes.len() {
        let providers = (0..nodes.len())
            .filter(|index| in_degree[*index] > 0)
            .map(|index| provider_name(nodes, index))
            .collect();
        return Err(PipelineError::Cycle { providers });
    }

    Ok(order)
}

/// Walks providers in reverse execution order, so each provider's output
/// border is final before its requirements are propagated upstream.
fn propagate_borders(
    nodes: &[ProviderNode],
    requests: &[Requirement],
) -> FxHashMap<FieldId, Border3> {
    let mut borders: FxHashMap<FieldId, Border3> = nodes
        .iter()
        .flat_map(|n| n.decl.produces.iter().map(|f| (*f, Border3::ZERO)))
        .collect();

    for request in requests {
        let entry = borders.entry(request.field).or_default();
        *entry = entry.max(&request.border);
    }

    for node in nodes.iter().rev() {
        let output = node
            .decl
            .outputs()
            .map(|field| borders.get(&field).copied().unwrap_or_default())
            .fold(Border3::ZERO, |acc, b| acc.max(&b));

        for requirement in &node.decl.requires {
            let needed = output.extend(&requirement.border);
            let entry = borders.entry(requirement.field).or_default();
            *entry = entry.max(&needed);
        }
    }

    borders
}

fn provider_name(nodes: &[ProviderNode], index: usize) -> String {
    nodes[index].provider.name().to_string()
}
