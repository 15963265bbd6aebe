//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "worldgen.ron";

/// Top-level world generation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World identity and layout.
    pub world: WorldConfig,
    /// Heightmap noise settings.
    pub terrain: TerrainConfig,
    /// Settlement and building placement.
    pub settlements: SettlementConfig,
    /// Road network settings.
    pub roads: RoadConfig,
    /// Tree placement.
    pub vegetation: VegetationConfig,
    /// Pipeline caching and worker pool.
    pub pipeline: PipelineConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Mirror symmetry applied to the whole world.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum SymmetryMode {
    /// No mirroring.
    #[default]
    None,
    /// Mirror across the X axis (`z -> -z - 1`).
    AxisX,
    /// Mirror across the Z axis (`x -> -x - 1`).
    AxisZ,
    /// Mirror across the `x = z` diagonal.
    PositiveDiagonal,
    /// Mirror across the `x = -z` diagonal.
    NegativeDiagonal,
}

/// World identity and layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed; every generated value derives from it.
    pub seed: u64,
    pub symmetry: SymmetryMode,
    /// Highest water layer.
    pub sea_level: i32,
    /// Size of one generated region in blocks (x, y, z).
    pub region_size: [i32; 3],
}

/// Heightmap noise settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub octaves: u32,
    pub lacunarity: f64,
    pub persistence: f64,
    pub base_frequency: f64,
    /// Peak deviation from `base_height` in blocks.
    pub amplitude: f64,
    /// Mean surface height in blocks.
    pub base_height: f32,
}

/// Settlement and building placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettlementConfig {
    /// Side of the settlement cell grid in blocks.
    pub cell_size: i32,
    /// Probability that a cell holds a settlement.
    pub spawn_chance: f64,
    pub min_radius: i32,
    pub max_radius: i32,
    /// Upper bound on buildings per settlement.
    pub max_buildings: u32,
}

/// Road network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoadConfig {
    pub width: f32,
    /// Free columns kept between buildings and a road edge.
    pub margin: f32,
    /// Settlements further apart than this are never connected.
    pub max_length: f32,
}

/// Tree placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VegetationConfig {
    pub tree_cell_size: i32,
    pub tree_chance: f64,
    /// Free columns kept between trunks and a road edge.
    pub road_margin: f32,
}

/// Pipeline caching and worker pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Keep generated facets per region until purged.
    pub cache_enabled: bool,
    /// Generation worker threads (0 = one per CPU core).
    pub worker_threads: usize,
    /// Maximum regions queued or in flight at once.
    pub queue_capacity: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            symmetry: SymmetryMode::None,
            sea_level: 32,
            region_size: [32, 128, 32],
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.005,
            amplitude: 24.0,
            base_height: 40.0,
        }
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            cell_size: 128,
            spawn_chance: 0.35,
            min_radius: 12,
            max_radius: 24,
            max_buildings: 8,
        }
    }
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            width: 3.0,
            margin: 1.0,
            max_length: 160.0,
        }
    }
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            tree_cell_size: 7,
            tree_chance: 0.45,
            road_margin: 2.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            worker_threads: 0,
            queue_capacity: 64,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

impl Config {
    /// Rejects values no generator can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [sx, sy, sz] = self.world.region_size;
        if sx <= 0 || sy <= 0 || sz <= 0 {
            return Err(invalid(format!(
                "region size {:?} must be positive on every axis",
                self.world.region_size
            )));
        }

        let t = &self.terrain;
        if t.octaves == 0 || t.base_frequency <= 0.0 || t.lacunarity <= 0.0 {
            return Err(invalid(
                "terrain needs at least one octave and positive frequency and lacunarity",
            ));
        }

        let s = &self.settlements;
        if !(0.0..=1.0).contains(&s.spawn_chance) {
            return Err(invalid(format!(
                "settlement spawn chance {} must lie in [0, 1]",
                s.spawn_chance
            )));
        }
        if s.min_radius < 1 || s.min_radius > s.max_radius {
            return Err(invalid(format!(
                "settlement radius range {}..={} is empty or non-positive",
                s.min_radius, s.max_radius
            )));
        }
        if s.cell_size <= s.max_radius.saturating_mul(2) {
            return Err(invalid(format!(
                "settlement cell size {} must exceed twice the max radius {}",
                s.cell_size, s.max_radius
            )));
        }

        let r = &self.roads;
        if r.width <= 0.0 || r.max_length <= 0.0 || r.margin < 0.0 {
            return Err(invalid(format!(
                "road width {} and max length {} must be positive, margin {} non-negative",
                r.width, r.max_length, r.margin
            )));
        }

        // Every road border scales with these; keep them within a few cells.
        let reach_limit = 8.0 * s.cell_size as f32;
        if r.max_length + r.width > reach_limit || r.margin > reach_limit {
            return Err(invalid(format!(
                "road max length {} plus width {} and margin {} must stay within {reach_limit}",
                r.max_length, r.width, r.margin
            )));
        }

        let v = &self.vegetation;
        if v.tree_cell_size < 1 || !(0.0..=1.0).contains(&v.tree_chance) || v.road_margin < 0.0 {
            return Err(invalid(format!(
                "tree cell size {} must be positive and tree chance {} within [0, 1]",
                v.tree_cell_size, v.tree_chance
            )));
        }

        if self.pipeline.queue_capacity == 0 {
            return Err(invalid("pipeline queue capacity must be at least 1"));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `worldgen.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Default config directory: `<platform config dir>/nebula-worldgen`.
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nebula-worldgen"))
    }
}
