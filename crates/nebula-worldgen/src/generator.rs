//! Pipeline assembly from configuration and per-region block output.

use std::sync::Arc;

use glam::IVec3;
use nebula_config::{Config, SymmetryMode};
use nebula_facet::{CacheStats, FieldPipeline, Region3, RegionFacets};
use nebula_structures::{
    BlockedAreaProvider, BuildingParams, BuildingProvider, Brush, RegionBlockBuffer, RoadParams,
    RoadProvider, SettlementFlattener, SettlementLayout, SettlementParams, SettlementProvider,
    TREES, TreeParams, TreeProvider, TreeSpawn,
};
use nebula_terrain::{HeightmapParams, SeaLevelProvider, SurfaceHeightProvider, Symmetry};

use crate::error::WorldGenError;
use crate::rasterizer::{StructureRasterizer, TerrainRasterizer, WorldRasterizer};

/// Maps the configured mode onto a terrain symmetry.
pub fn symmetry_of(mode: SymmetryMode) -> Option<Symmetry> {
    match mode {
        SymmetryMode::None => None,
        SymmetryMode::AxisX => Some(Symmetry::AxisX),
        SymmetryMode::AxisZ => Some(Symmetry::AxisZ),
        SymmetryMode::PositiveDiagonal => Some(Symmetry::PositiveDiagonal),
        SymmetryMode::NegativeDiagonal => Some(Symmetry::NegativeDiagonal),
    }
}

/// Everything generated for one region.
#[derive(Debug)]
pub struct RegionOutput {
    pub region: Region3,
    pub blocks: RegionBlockBuffer,
    pub trees: Vec<TreeSpawn>,
    /// Voxels written by the rasterizers, overwrites included.
    pub writes: usize,
    /// Writes dropped for falling outside the region.
    pub skipped: usize,
}

/// A configured world: the facet pipeline plus the rasterizers that turn
/// its facets into blocks.
pub struct WorldGenerator {
    config: Config,
    pipeline: Arc<FieldPipeline>,
    rasterizers: Vec<Box<dyn WorldRasterizer>>,
}

impl WorldGenerator {
    /// Validates `config` and assembles the full provider pipeline.
    pub fn from_config(config: &Config) -> Result<Self, WorldGenError> {
        config.validate()?;
        let seed = config.world.seed;
        let symmetry = symmetry_of(config.world.symmetry);

        let t = &config.terrain;
        let terrain = HeightmapParams {
            seed,
            octaves: t.octaves,
            lacunarity: t.lacunarity,
            persistence: t.persistence,
            base_frequency: t.base_frequency,
            amplitude: t.amplitude,
        };

        let s = &config.settlements;
        let settlement_params = SettlementParams {
            cell_size: s.cell_size,
            spawn_chance: s.spawn_chance,
            min_radius: s.min_radius,
            max_radius: s.max_radius,
        };
        let layout =
            SettlementLayout::new(settlement_params, terrain.clone(), t.base_height, symmetry);

        let buildings = BuildingParams {
            max_buildings: s.max_buildings,
            road_clearance: config.roads.margin,
            ..BuildingParams::default()
        };
        let roads = RoadParams {
            width: config.roads.width,
            max_length: config.roads.max_length,
            ..RoadParams::default()
        };
        let v = &config.vegetation;
        let trees = TreeParams {
            cell_size: v.tree_cell_size,
            chance: v.tree_chance,
            road_margin: v.road_margin,
        };

        let pipeline = FieldPipeline::builder(seed)
            .with_provider(SurfaceHeightProvider::new(terrain, t.base_height, symmetry))
            .with_provider(SeaLevelProvider::new(config.world.sea_level))
            .with_provider(SettlementProvider::new(layout.clone()))
            .with_provider(SettlementFlattener::new(layout))
            .with_provider(RoadProvider::new(roads))
            .with_provider(BuildingProvider::new(buildings, s.max_radius, symmetry))
            .with_provider(BlockedAreaProvider::new())
            .with_provider(TreeProvider::new(trees, symmetry))
            .with_cache(config.pipeline.cache_enabled)
            .build()?;

        tracing::info!(
            seed,
            symmetry = ?config.world.symmetry,
            providers = pipeline.order().len(),
            "world generator ready"
        );
        tracing::debug!(order = ?pipeline.order(), "provider order");

        Ok(Self {
            config: config.clone(),
            pipeline: Arc::new(pipeline),
            rasterizers: vec![Box::new(TerrainRasterizer), Box::new(StructureRasterizer)],
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &Arc<FieldPipeline> {
        &self.pipeline
    }

    /// The region at grid cell `cell` for the configured region size.
    pub fn region_at(&self, cell: IVec3) -> Region3 {
        Region3::from_grid_cell(cell, IVec3::from_array(self.config.world.region_size))
    }

    /// Facets for `region`, from cache when enabled.
    pub fn facets(&self, region: Region3) -> Result<Arc<RegionFacets>, WorldGenError> {
        Ok(self.pipeline.generate(region)?)
    }

    /// Generates the facets of `region` and rasterizes them into blocks.
    pub fn generate_region(&self, region: Region3) -> Result<RegionOutput, WorldGenError> {
        let facets = self.facets(region)?;
        let mut blocks = RegionBlockBuffer::new(region);
        let mut brush = Brush::new(&mut blocks);
        for rasterizer in &self.rasterizers {
            let _span = tracing::trace_span!("rasterize", name = rasterizer.name()).entered();
            rasterizer.rasterize(&facets, &mut brush)?;
        }
        let (writes, skipped) = (brush.writes(), brush.skipped());
        let trees = facets.get(TREES)?.clone();

        tracing::trace!(?region, writes, skipped, trees = trees.len(), "region rasterized");
        Ok(RegionOutput {
            region,
            blocks,
            trees,
            writes,
            skipped,
        })
    }

    /// Drops every cached region, e.g. on world reset.
    pub fn purge(&self) {
        self.pipeline.purge();
        tracing::debug!("facet cache purged");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.pipeline.cache_stats()
    }
}
