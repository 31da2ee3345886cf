//! Configuration system for the ringworld generator.
//!
//! Provides runtime-configurable ring, terrain, LOD and texture settings that
//! persist to disk as RON files. Supports CLI overrides via clap, hot-reload
//! detection, and the validate/clamp step run before every generation.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, CurveKey, DebugConfig, LodConfig, RingConfig, TerrainConfig, TerrainRegion,
    TextureConfig, default_config_dir,
};
pub use error::ConfigError;
