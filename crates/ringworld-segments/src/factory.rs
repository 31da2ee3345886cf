//! Builds the geometry of a single ring segment.
//!
//! A segment is a grid of `verts_along_width + 1` columns across the ring
//! band and `verts_along_circumference` rows along its arc. Rows are placed on
//! the ring by global angle, so the last row of segment `i` and the first row
//! of segment `i + 1` land on exactly the same positions and UVs.

use ringworld_config::RingConfig;
use ringworld_terrain::TerrainSampler;
use tracing::trace;

use crate::mesh::{SegmentMesh, SegmentVertex};
use crate::planner::RingPlan;
use crate::segment::{Segment, SegmentPlacement};

/// Creates segments, delegating surface height to a [`TerrainSampler`].
pub struct SegmentFactory<S> {
    sampler: S,
}

impl<S: TerrainSampler> SegmentFactory<S> {
    /// Create a factory around the given height sampler.
    pub fn new(sampler: S) -> Self {
        Self { sampler }
    }

    /// The height sampler in use.
    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    /// Build segment `index` at `lod`.
    ///
    /// `index` must already lie within the ring's clamped creation window;
    /// the factory does not validate it and never touches a registry.
    pub fn create_segment(
        &self,
        index: u32,
        lod: u8,
        ring: &RingConfig,
        plan: &RingPlan,
    ) -> Segment {
        let columns = ring.verts_along_width as usize;
        let rows = ring.verts_along_circumference as usize;
        let radius = ring.radius_m;
        let span_radians = plan.segment_span_degrees.to_radians();
        let segment_count = f64::from(ring.segment_count);

        let mut mesh = SegmentMesh::with_capacity(plan.vertex_count, plan.index_count);

        for row in 0..rows {
            let along = if rows > 1 {
                row as f64 / (rows - 1) as f64
            } else {
                0.0
            };
            // Position around the ring measured in segments.
            let ring_pos = f64::from(index) + along;
            let angle = ring_pos * span_radians;
            let (sin, cos) = angle.sin_cos();
            let arc = angle * radius;
            let u = (ring_pos / segment_count * plan.uv_scale_x) as f32;

            for col in 0..=columns {
                let across = col as f64 / columns.max(1) as f64;
                let z = (across - 0.5) * ring.width_m;
                // The inhabited surface faces the axis, so height moves inward.
                let r = radius - self.sampler.sample(arc, z, lod);
                mesh.vertices.push(SegmentVertex {
                    position: [(r * cos) as f32, (r * sin) as f32, z as f32],
                    normal: [-cos as f32, -sin as f32, 0.0],
                    uv: [u, across as f32],
                });
            }
        }

        let stride = (columns + 1) as u32;
        for row in 0..rows.saturating_sub(1) as u32 {
            for col in 0..columns as u32 {
                let a = row * stride + col;
                let b = a + 1;
                let d = a + stride;
                let e = d + 1;
                // Counter-clockwise when seen from the ring axis.
                mesh.indices.extend_from_slice(&[a, b, d, b, e, d]);
            }
        }

        mesh.recompute_normals();

        debug_assert_eq!(mesh.vertices.len(), plan.vertex_count);
        debug_assert_eq!(mesh.indices.len(), plan.index_count);
        trace!(
            index,
            lod,
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "built segment geometry"
        );

        let placement = SegmentPlacement::for_index(index, ring.segment_count, radius);
        Segment::new(index, lod, mesh, placement)
    }
}
