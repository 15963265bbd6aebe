//! Concurrent cache of completed region facets.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::facets::RegionFacets;
use crate::region::Region3;

/// Cache key: facets are a pure function of region and seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub region: Region3,
    pub seed: u64,
}

/// Hit/miss counters and current size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Region facet cache shared by every worker of one pipeline.
///
/// Entries are never evicted individually; [`FacetCache::purge`] drops
/// everything at once.
#[derive(Default)]
pub struct FacetCache {
    entries: DashMap<CacheKey, Arc<RegionFacets>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FacetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a region, counting the hit or miss.
    pub fn get(&self, region: Region3, seed: u64) -> Option<Arc<RegionFacets>> {
        let found = self
            .entries
            .get(&CacheKey { region, seed })
            .map(|entry| Arc::clone(entry.value()));
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Inserts a completed region. If another worker raced us, the first
    /// entry wins and is returned.
    pub fn insert(&self, facets: Arc<RegionFacets>) -> Arc<RegionFacets> {
        let key = CacheKey {
            region: facets.region(),
            seed: facets.seed(),
        };
        Arc::clone(self.entries.entry(key).or_insert(facets).value())
    }

    /// Drops every cached region.
    pub fn purge(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        tracing::debug!(dropped, "facet cache purged");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
