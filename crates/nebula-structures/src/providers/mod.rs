//! Facet providers for settlements, roads, buildings, blocked areas and trees.

mod blocked;
mod buildings;
mod roads;
mod settlements;
mod trees;

use nebula_facet::{FacetGrid, FacetKey};

use crate::building::Building;
use crate::settlement::Settlement;
use crate::shape::RoadSegment;

pub use blocked::BlockedAreaProvider;
pub use buildings::BuildingProvider;
pub use roads::{RoadParams, RoadProvider};
pub use settlements::{SettlementFlattener, SettlementProvider};
pub use trees::{TreeKind, TreeParams, TreeProvider, TreeSpawn};

/// Settlements whose disc reaches the facet's rectangle, ordered by center.
pub const SETTLEMENTS: FacetKey<Vec<Settlement>> = FacetKey::new("settlements");

/// Roads whose surface reaches the facet's rectangle.
pub const ROADS: FacetKey<Vec<RoadSegment>> = FacetKey::new("roads");

/// Buildings whose footprint overlaps the facet's rectangle.
pub const BUILDINGS: FacetKey<Vec<Building>> = FacetKey::new("buildings");

/// Columns covered by a building footprint or a road surface.
pub const BLOCKED_AREA: FacetKey<FacetGrid<bool>> = FacetKey::new("blocked_area");

/// Tree spawn requests inside the facet's rectangle.
pub const TREES: FacetKey<Vec<TreeSpawn>> = FacetKey::new("trees");
