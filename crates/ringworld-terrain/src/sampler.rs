//! The height sampling interface consumed by segment construction.

/// Supplies terrain height for a point on the unrolled ring surface.
///
/// `world_x` is the arc distance along the circumference and `world_z` the
/// offset across the ring width, both in meters. `lod` is the detail tier the
/// segment is being built at (0 = finest). Implementations must be
/// deterministic for fixed parameters.
pub trait TerrainSampler {
    /// Height in meters above the base ring surface.
    fn sample(&self, world_x: f64, world_z: f64, lod: u8) -> f64;

    /// Value written to exported heightmaps at the same point.
    ///
    /// Defaults to the mesh height.
    fn texture_height(&self, world_x: f64, world_z: f64, lod: u8) -> f64 {
        self.sample(world_x, world_z, lod)
    }
}

impl<F> TerrainSampler for F
where
    F: Fn(f64, f64, u8) -> f64,
{
    fn sample(&self, world_x: f64, world_z: f64, lod: u8) -> f64 {
        self(world_x, world_z, lod)
    }
}

/// A sampler that returns a constant height everywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatTerrain {
    /// Height returned for every sample.
    pub height: f64,
}

impl TerrainSampler for FlatTerrain {
    fn sample(&self, _world_x: f64, _world_z: f64, _lod: u8) -> f64 {
        self.height
    }
}
