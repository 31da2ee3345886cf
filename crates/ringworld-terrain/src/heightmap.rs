//! Multi-octave fractal Brownian motion (fBm) heightmap sampler.
//!
//! Composites octaves of simplex noise. The octave count can be limited per
//! call so coarser detail levels sample fewer frequencies.

use glam::DVec3;
use noise::{NoiseFn, Simplex};

/// Configuration for multi-octave fBm noise.
#[derive(Clone, Debug)]
pub struct HeightmapParams {
    /// World seed for deterministic generation.
    pub seed: u32,
    /// Maximum number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency of the first (lowest) octave.
    pub base_frequency: f64,
    /// Amplitude of the first octave.
    pub amplitude: f64,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.004,
            amplitude: 1.0,
        }
    }
}

/// Generates height values using fractal Brownian motion over simplex noise.
pub struct HeightmapSampler {
    noise: Simplex,
    params: HeightmapParams,
}

impl HeightmapSampler {
    /// Create a new sampler with the given parameters.
    pub fn new(params: HeightmapParams) -> Self {
        let noise = Simplex::new(params.seed);
        Self { noise, params }
    }

    /// Sample a 3D point, compositing at most `octaves` octaves.
    pub fn sample_3d_octaves(&self, point: DVec3, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude;

        for _ in 0..octaves.min(self.params.octaves) {
            let p = point * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// Theoretical maximum absolute value for the first `octaves` octaves.
    pub fn max_amplitude_for(&self, octaves: u32) -> f64 {
        let mut sum = 0.0;
        let mut amp = self.params.amplitude;
        for _ in 0..octaves.min(self.params.octaves) {
            sum += amp;
            amp *= self.params.persistence;
        }
        sum
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &HeightmapParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_determinism_same_seed_same_coord() {
        let params = HeightmapParams {
            seed: 42,
            ..Default::default()
        };
        let sampler_a = HeightmapSampler::new(params.clone());
        let sampler_b = HeightmapSampler::new(params);

        let p = DVec3::new(100.0, -35.0, 200.0);
        let h1 = sampler_a.sample_3d_octaves(p, 4);
        let h2 = sampler_b.sample_3d_octaves(p, 4);
        assert!(
            (h1 - h2).abs() < EPSILON,
            "Same seed + same coord must produce identical height: {h1} vs {h2}"
        );
    }

    #[test]
    fn test_height_within_expected_range() {
        let sampler = HeightmapSampler::new(HeightmapParams::default());
        let max_amp = sampler.max_amplitude_for(4);

        for x in (0..50).map(|i| i as f64 * 37.0) {
            for z in (0..50).map(|i| i as f64 * 11.0) {
                let h = sampler.sample_3d_octaves(DVec3::new(x, 0.0, z), 4);
                assert!(
                    h.abs() <= max_amp + EPSILON,
                    "Height {h} exceeds max amplitude {max_amp} at ({x}, {z})"
                );
            }
        }
    }

    #[test]
    fn test_octave_limit_is_capped() {
        let sampler = HeightmapSampler::new(HeightmapParams {
            seed: 3,
            octaves: 3,
            ..Default::default()
        });
        let p = DVec3::new(12.0, 7.0, -40.0);
        assert_eq!(sampler.sample_3d_octaves(p, 3), sampler.sample_3d_octaves(p, 10));
        assert_eq!(sampler.max_amplitude_for(10), sampler.max_amplitude_for(3));
    }

    #[test]
    fn test_max_amplitude_calculation() {
        let sampler = HeightmapSampler::new(HeightmapParams {
            amplitude: 1000.0,
            persistence: 0.5,
            octaves: 4,
            ..Default::default()
        });
        assert!((sampler.max_amplitude_for(4) - 1875.0).abs() < EPSILON);
        assert!((sampler.max_amplitude_for(2) - 1500.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_octaves_returns_zero() {
        let sampler = HeightmapSampler::new(HeightmapParams::default());
        assert_eq!(sampler.sample_3d_octaves(DVec3::splat(5.0), 0), 0.0);
        assert_eq!(sampler.max_amplitude_for(0), 0.0);
    }
}
