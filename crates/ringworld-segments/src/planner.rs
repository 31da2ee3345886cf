//! Ring-wide geometric constants shared by every segment of a generation.

use std::f64::consts::TAU;

use ringworld_config::{ConfigError, RingConfig};

use crate::error::RingError;

/// Constants derived from a [`RingConfig`].
///
/// Vertex and index counts depend only on vertex density, never on LOD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingPlan {
    /// Ring circumference in meters (`2π·radius`).
    pub circumference: f64,
    /// Horizontal texture repeat over the full ring (`circumference / width`).
    pub uv_scale_x: f64,
    /// Vertices in one segment: `(verts_along_width + 1) · verts_along_circumference`.
    pub vertex_count: usize,
    /// Indices in one segment: `verts_along_width · (verts_along_circumference − 1) · 6`.
    pub index_count: usize,
    /// Angular span of one segment in degrees.
    pub segment_span_degrees: f64,
}

/// Compute the plan for a ring.
///
/// Fails when the ring has no segments or a non-positive width or radius.
pub fn plan(ring: &RingConfig) -> Result<RingPlan, RingError> {
    if ring.segment_count < 1 {
        return Err(ConfigError::Invalid {
            field: "segment_count",
            reason: "at least one segment is required".to_string(),
        }
        .into());
    }
    if !(ring.width_m.is_finite() && ring.width_m > 0.0) {
        return Err(ConfigError::Invalid {
            field: "width_m",
            reason: format!("must be positive, got {}", ring.width_m),
        }
        .into());
    }
    if !(ring.radius_m.is_finite() && ring.radius_m > 0.0) {
        return Err(ConfigError::Invalid {
            field: "radius_m",
            reason: format!("must be positive, got {}", ring.radius_m),
        }
        .into());
    }

    let circumference = TAU * ring.radius_m;
    let width = ring.verts_along_width as usize;
    let rows = ring.verts_along_circumference as usize;

    Ok(RingPlan {
        circumference,
        uv_scale_x: circumference / ring.width_m,
        vertex_count: (width + 1) * rows,
        index_count: width * rows.saturating_sub(1) * 6,
        segment_span_degrees: 360.0 / f64::from(ring.segment_count),
    })
}
