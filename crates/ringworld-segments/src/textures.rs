//! Exported heightmap rasters: per-segment PNG export and the purge that
//! runs before every generation.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use ringworld_config::{RingConfig, TerrainRegion, TextureConfig};
use ringworld_terrain::TerrainSampler;
use tracing::{error, info, warn};

use crate::error::TextureError;
use crate::planner::RingPlan;
use crate::segment::Segment;

/// Largest raster edge written, in pixels.
pub const MAX_TEXTURE_EDGE: u32 = 2048;

/// Outcome of purging the texture directory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PurgeReport {
    /// Files removed.
    pub deleted: usize,
    /// Files that could not be removed.
    pub failed: usize,
}

/// Delete every `.png` in `dir`.
///
/// Best effort: each failure is logged and counted, and a missing directory is
/// only a warning.
pub fn purge_exported_textures(dir: &Path) -> PurgeReport {
    let mut report = PurgeReport::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Texture directory does not exist: {}", dir.display());
            return report;
        }
        Err(source) => {
            let err = TextureError::Io {
                path: dir.to_path_buf(),
                source,
            };
            error!("{err}");
            return report;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "png") {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted file: {}", path.display());
                report.deleted += 1;
            }
            Err(source) => {
                let err = TextureError::Io { path, source };
                error!("Failed to delete texture: {err}");
                report.failed += 1;
            }
        }
    }

    report
}

/// Rasterizes segment heights to PNG files.
///
/// With color regions configured each pixel takes the color of the first band
/// whose height covers it; without them the raster is grayscale, normalized to
/// its own min/max.
#[derive(Clone, Debug)]
pub struct TextureExporter {
    directory: PathBuf,
    meters_per_pixel: f64,
    regions: Vec<TerrainRegion>,
}

impl TextureExporter {
    /// Create an exporter from the texture settings.
    pub fn new(config: &TextureConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            meters_per_pixel: config.meters_per_pixel,
            regions: config.regions.clone(),
        }
    }

    /// Directory rasters are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File an exported segment is written to.
    pub fn path_for(&self, index: u32) -> PathBuf {
        self.directory.join(format!("segment_{index}.png"))
    }

    /// Raster size for one segment: arc length by ring width, capped per edge.
    pub fn raster_size(&self, ring: &RingConfig, plan: &RingPlan) -> (u32, u32) {
        let mpp = self.meters_per_pixel.max(0.01);
        let arc = plan.circumference / f64::from(ring.segment_count);
        let edge = |meters: f64| ((meters / mpp).ceil() as u32).clamp(1, MAX_TEXTURE_EDGE);
        (edge(arc), edge(ring.width_m))
    }

    /// Color for a texture height; heights above every band take the last one.
    pub fn region_color(&self, height: f64) -> Option<[u8; 3]> {
        self.regions
            .iter()
            .find(|r| height <= r.height)
            .or(self.regions.last())
            .map(|r| r.color)
    }

    /// Sample `segment` at its own LOD and write it as an 8-bit PNG.
    pub fn export<S: TerrainSampler>(
        &self,
        segment: &Segment,
        ring: &RingConfig,
        plan: &RingPlan,
        sampler: &S,
    ) -> Result<PathBuf, TextureError> {
        let (width, height) = self.raster_size(ring, plan);
        let arc_start = segment.placement().start_degrees.to_radians() * ring.radius_m;
        let arc_len = plan.circumference / f64::from(ring.segment_count);

        let mut heights = Vec::with_capacity(width as usize * height as usize);
        for py in 0..height {
            let z = ((f64::from(py) + 0.5) / f64::from(height) - 0.5) * ring.width_m;
            for px in 0..width {
                let x = arc_start + (f64::from(px) + 0.5) / f64::from(width) * arc_len;
                heights.push(sampler.texture_height(x, z, segment.lod()));
            }
        }

        let (color, pixels) = if self.regions.is_empty() {
            (png::ColorType::Grayscale, grayscale(&heights))
        } else {
            let pixels: Vec<u8> = heights
                .iter()
                .filter_map(|&h| self.region_color(h))
                .flatten()
                .collect();
            (png::ColorType::Rgb, pixels)
        };

        std::fs::create_dir_all(&self.directory).map_err(|source| TextureError::Io {
            path: self.directory.clone(),
            source,
        })?;
        let path = self.path_for(segment.index());
        let file = File::create(&path).map_err(|source| TextureError::Io {
            path: path.clone(),
            source,
        })?;

        let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let encode_err = |source| TextureError::Encode {
            path: path.clone(),
            source,
        };
        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(&pixels).map_err(encode_err)?;

        Ok(path)
    }
}

fn grayscale(heights: &[f64]) -> Vec<u8> {
    let (lo, hi) = heights
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)));
    let range = hi - lo;
    heights
        .iter()
        .map(|&h| {
            if range > 0.0 {
                ((h - lo) / range * 255.0).round() as u8
            } else {
                0
            }
        })
        .collect()
}
