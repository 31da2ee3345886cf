//! Configuration structs with sensible defaults, validation and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on per-segment vertex density along either axis.
const MAX_VERTS_PER_AXIS: u32 = 255;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Ring dimensions, density and creation window.
    pub ring: RingConfig,
    /// Level-of-detail and proximity settings.
    pub lod: LodConfig,
    /// Terrain parameters forwarded to the height sampler.
    pub terrain: TerrainConfig,
    /// Texture export settings.
    pub textures: TextureConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Ring geometry and generation-window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RingConfig {
    /// Number of angular slices the ring is cut into.
    pub segment_count: u32,
    /// Width of the ring band in meters.
    pub width_m: f64,
    /// Ring radius in meters.
    pub radius_m: f64,
    /// Quads across the width of a segment.
    pub verts_along_width: u32,
    /// Vertex rows along the circumferential edge of a segment.
    pub verts_along_circumference: u32,
    /// First segment index to create (inclusive). Values below zero are clamped.
    pub min_segment_index: i64,
    /// Last segment index to create (inclusive). Values past the end are clamped.
    pub max_segment_index: i64,
    /// Regenerate whenever the configuration changes outside play mode.
    pub auto_update: bool,
    /// Generate as soon as the host starts.
    pub generate_on_start: bool,
}

/// Level-of-detail configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// LOD every segment is created with during a full generation.
    pub starting_lod: u8,
    /// Coarsest LOD level supported (0 = finest).
    pub max_lod: u8,
    /// LOD a segment is rebuilt at when the observer comes close.
    pub upgrade_lod: u8,
    /// Maximum observer distance, in meters, for a segment to be upgraded.
    pub proximity_threshold: f64,
    /// Seconds between proximity checks.
    pub tick_interval_secs: f64,
}

/// A single key of the height remapping curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CurveKey {
    /// Normalized noise input in `[0, 1]`.
    pub time: f64,
    /// Output factor applied before the height multiplier.
    pub value: f64,
}

/// Terrain noise configuration. The generator core does not interpret these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Distance in meters covered by one unit of noise input.
    pub noise_scale: f64,
    /// Number of fBm octaves at the finest LOD.
    pub octaves: u32,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// World seed.
    pub seed: u32,
    /// Scale of the exported heightmap; region thresholds are compared against it.
    pub height_multiplier: f64,
    /// Remapping of normalized noise for exported heightmaps, sorted by `time`.
    pub height_curve: Vec<CurveKey>,
    /// Displacement in meters of a mesh curve output of 1.0.
    pub mesh_height_multiplier: f64,
    /// Remapping of normalized noise for mesh displacement, sorted by `time`.
    pub mesh_height_curve: Vec<CurveKey>,
}

/// A color band of exported textures: every height up to `height` gets `color`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TerrainRegion {
    /// Label shown in the config file.
    pub name: String,
    /// Upper bound (inclusive) of the band in texture height units.
    pub height: f64,
    /// RGB color written for the band.
    pub color: [u8; 3],
}

impl TerrainRegion {
    fn new(name: &str, height: f64, color: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            height,
            color,
        }
    }
}

/// Texture export configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Write a heightmap raster per segment during generation.
    pub save_texture_files: bool,
    /// Ground resolution of exported rasters.
    pub meters_per_pixel: f64,
    /// Directory the rasters are written to and purged from.
    pub directory: PathBuf,
    /// Color bands, ascending by height. Empty exports grayscale.
    pub regions: Vec<TerrainRegion>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            segment_count: 4,
            width_m: 300.0,
            radius_m: 10_000.0,
            verts_along_width: 16,
            verts_along_circumference: 2,
            min_segment_index: -1,
            max_segment_index: 360,
            auto_update: false,
            generate_on_start: true,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            starting_lod: 4,
            max_lod: 6,
            upgrade_lod: 0,
            proximity_threshold: 300.0,
            tick_interval_secs: 1.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            noise_scale: 250.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 0,
            height_multiplier: 1.0,
            height_curve: linear_curve(),
            mesh_height_multiplier: 20.0,
            mesh_height_curve: linear_curve(),
        }
    }
}

fn linear_curve() -> Vec<CurveKey> {
    vec![
        CurveKey {
            time: 0.0,
            value: 0.0,
        },
        CurveKey {
            time: 1.0,
            value: 1.0,
        },
    ]
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            save_texture_files: false,
            meters_per_pixel: 5.0,
            directory: PathBuf::from("procedural_textures"),
            regions: vec![
                TerrainRegion::new("water", 0.3, [50, 99, 195]),
                TerrainRegion::new("sand", 0.4, [210, 208, 125]),
                TerrainRegion::new("grass", 0.6, [86, 152, 23]),
                TerrainRegion::new("rock", 0.85, [94, 72, 66]),
                TerrainRegion::new("snow", 1.0, [255, 255, 255]),
            ],
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

impl RingConfig {
    /// Inclusive index window after clamping into `[0, segment_count - 1]`.
    ///
    /// Returns `None` when the clamped window is empty.
    pub fn index_window(&self) -> Option<(u32, u32)> {
        if self.segment_count == 0 {
            return None;
        }
        let first = self.min_segment_index.max(0);
        let last = self
            .max_segment_index
            .min(i64::from(self.segment_count) - 1);
        if first > last {
            return None;
        }
        Some((first as u32, last as u32))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_count < 1 {
            return Err(ConfigError::invalid(
                "segment_count",
                "at least one segment is required",
            ));
        }
        if !(self.width_m.is_finite() && self.width_m > 0.0) {
            return Err(ConfigError::invalid(
                "width_m",
                format!("must be positive, got {}", self.width_m),
            ));
        }
        if !(self.radius_m.is_finite() && self.radius_m > 0.0) {
            return Err(ConfigError::invalid(
                "radius_m",
                format!("must be positive, got {}", self.radius_m),
            ));
        }
        if !(1..=MAX_VERTS_PER_AXIS).contains(&self.verts_along_width) {
            return Err(ConfigError::invalid(
                "verts_along_width",
                format!(
                    "must be within 1..={MAX_VERTS_PER_AXIS}, got {}",
                    self.verts_along_width
                ),
            ));
        }
        if !(2..=MAX_VERTS_PER_AXIS).contains(&self.verts_along_circumference) {
            return Err(ConfigError::invalid(
                "verts_along_circumference",
                format!(
                    "must be within 2..={MAX_VERTS_PER_AXIS}, got {}",
                    self.verts_along_circumference
                ),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Validate the configuration and return a clamped copy ready for generation.
    ///
    /// Rejects non-positive ring dimensions, an empty ring, unusable vertex
    /// densities and negative proximity thresholds. Clamps the index window
    /// into the ring and the LOD levels into `[0, max_lod]`.
    pub fn validated(&self) -> Result<Self, ConfigError> {
        self.ring.validate()?;

        if !(self.lod.proximity_threshold.is_finite() && self.lod.proximity_threshold >= 0.0) {
            return Err(ConfigError::invalid(
                "proximity_threshold",
                format!("must be non-negative, got {}", self.lod.proximity_threshold),
            ));
        }
        if !(self.lod.tick_interval_secs.is_finite() && self.lod.tick_interval_secs > 0.0) {
            return Err(ConfigError::invalid(
                "tick_interval_secs",
                format!("must be positive, got {}", self.lod.tick_interval_secs),
            ));
        }

        let mut out = self.clone();
        out.ring.min_segment_index = out.ring.min_segment_index.max(0);
        out.ring.max_segment_index = out
            .ring
            .max_segment_index
            .min(i64::from(out.ring.segment_count) - 1);
        out.lod.starting_lod = out.lod.starting_lod.min(out.lod.max_lod);
        out.lod.upgrade_lod = out.lod.upgrade_lod.min(out.lod.max_lod);
        out.terrain.height_curve.sort_by(|a, b| a.time.total_cmp(&b.time));
        out.terrain
            .mesh_height_curve
            .sort_by(|a, b| a.time.total_cmp(&b.time));
        out.textures
            .regions
            .sort_by(|a, b| a.height.total_cmp(&b.height));
        Ok(out)
    }
}

// --- Load / Save / Reload ---

/// Default directory holding `config.ron`.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ringworld")
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

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

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
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
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
