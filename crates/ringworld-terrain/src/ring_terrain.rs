//! Noise-driven terrain for a ring surface.
//!
//! The unrolled `(world_x, world_z)` coordinate is wrapped back onto the
//! cylinder before sampling 3D noise, so heights match across the seam where
//! the last segment meets the first.

use std::f64::consts::TAU;

use glam::DVec3;
use ringworld_config::TerrainConfig;

use crate::height_curve::HeightCurve;
use crate::heightmap::{HeightmapParams, HeightmapSampler};
use crate::sampler::TerrainSampler;

const MIN_NOISE_SCALE: f64 = 1e-4;

/// fBm terrain sampler where coarser LOD levels composite fewer octaves.
///
/// Mesh displacement and exported heightmaps share the noise but are shaped
/// by their own curve and multiplier.
pub struct NoiseTerrainSampler {
    heightmap: HeightmapSampler,
    mesh_curve: HeightCurve,
    mesh_multiplier: f64,
    texture_curve: HeightCurve,
    texture_multiplier: f64,
    circumference: f64,
}

impl NoiseTerrainSampler {
    /// Create a sampler for a ring of the given circumference.
    pub fn new(config: &TerrainConfig, circumference: f64) -> Self {
        let params = HeightmapParams {
            seed: config.seed,
            octaves: config.octaves,
            lacunarity: config.lacunarity,
            persistence: config.persistence,
            base_frequency: 1.0 / config.noise_scale.max(MIN_NOISE_SCALE),
            amplitude: 1.0,
        };
        Self {
            heightmap: HeightmapSampler::new(params),
            mesh_curve: HeightCurve::new(&config.mesh_height_curve),
            mesh_multiplier: config.mesh_height_multiplier,
            texture_curve: HeightCurve::new(&config.height_curve),
            texture_multiplier: config.height_multiplier,
            circumference,
        }
    }

    /// Octaves sampled at a given LOD: one fewer per level, never below one.
    pub fn octaves_for_lod(&self, lod: u8) -> u32 {
        let full = self.heightmap.params().octaves;
        if full == 0 {
            return 0;
        }
        full.saturating_sub(u32::from(lod)).max(1)
    }

    /// Noise remapped to `[0, 1]` before the height curve is applied.
    pub fn normalized(&self, world_x: f64, world_z: f64, lod: u8) -> f64 {
        let octaves = self.octaves_for_lod(lod);
        let max_amp = self.heightmap.max_amplitude_for(octaves);
        if max_amp == 0.0 {
            return 0.5;
        }
        let raw = self
            .heightmap
            .sample_3d_octaves(self.cylinder_point(world_x, world_z), octaves);
        ((raw / max_amp + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    fn cylinder_point(&self, world_x: f64, world_z: f64) -> DVec3 {
        if self.circumference <= 0.0 {
            return DVec3::new(world_x, 0.0, world_z);
        }
        let radius = self.circumference / TAU;
        let angle = world_x / radius;
        DVec3::new(radius * angle.cos(), radius * angle.sin(), world_z)
    }
}

impl TerrainSampler for NoiseTerrainSampler {
    fn sample(&self, world_x: f64, world_z: f64, lod: u8) -> f64 {
        self.mesh_curve.evaluate(self.normalized(world_x, world_z, lod)) * self.mesh_multiplier
    }

    fn texture_height(&self, world_x: f64, world_z: f64, lod: u8) -> f64 {
        self.texture_curve
            .evaluate(self.normalized(world_x, world_z, lod))
            * self.texture_multiplier
    }
}
