//! Terrain height sampling for ring segments: the sampler interface, multi-octave
//! noise, and the height remapping curve.

mod heightmap;
mod height_curve;
mod ring_terrain;
mod sampler;

pub use height_curve::HeightCurve;
pub use heightmap::{HeightmapParams, HeightmapSampler};
pub use ring_terrain::NoiseTerrainSampler;
pub use sampler::{FlatTerrain, TerrainSampler};
