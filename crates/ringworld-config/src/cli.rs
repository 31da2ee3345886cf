//! Command-line argument parsing for the ringworld generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Ringworld command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "ringworld", about = "Ringworld segment generator")]
pub struct CliArgs {
    /// Number of ring segments.
    #[arg(long)]
    pub segments: Option<u32>,

    /// Ring radius in meters.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Ring width in meters.
    #[arg(long)]
    pub width: Option<f64>,

    /// First segment index to create.
    #[arg(long, allow_hyphen_values = true)]
    pub min_index: Option<i64>,

    /// Last segment index to create.
    #[arg(long)]
    pub max_index: Option<i64>,

    /// Proximity threshold for LOD upgrades, in meters.
    #[arg(long)]
    pub proximity: Option<f64>,

    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Export per-segment heightmap textures.
    #[arg(long)]
    pub save_textures: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(n) = args.segments {
            self.ring.segment_count = n;
        }
        if let Some(r) = args.radius {
            self.ring.radius_m = r;
        }
        if let Some(w) = args.width {
            self.ring.width_m = w;
        }
        if let Some(min) = args.min_index {
            self.ring.min_segment_index = min;
        }
        if let Some(max) = args.max_index {
            self.ring.max_segment_index = max;
        }
        if let Some(d) = args.proximity {
            self.lod.proximity_threshold = d;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(save) = args.save_textures {
            self.textures.save_texture_files = save;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
