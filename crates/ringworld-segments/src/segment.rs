//! A live ring segment and its placement on the ring.

use glam::DVec3;

use crate::mesh::{Aabb, SegmentMesh};
use crate::scene::SceneHandle;

/// Where a segment sits on the ring. Derived purely from its index and the ring config.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentPlacement {
    /// Angle in degrees where the segment starts.
    pub start_degrees: f64,
    /// Angular width of the segment in degrees.
    pub span_degrees: f64,
    /// Midpoint of the segment on the undisplaced ring surface.
    pub center: DVec3,
}

impl SegmentPlacement {
    /// Placement of segment `index` on a ring of `segment_count` slices.
    pub fn for_index(index: u32, segment_count: u32, radius: f64) -> Self {
        let span_degrees = 360.0 / f64::from(segment_count);
        let start_degrees = f64::from(index) * span_degrees;
        let mid = (start_degrees + span_degrees * 0.5).to_radians();
        Self {
            start_degrees,
            span_degrees,
            center: DVec3::new(radius * mid.cos(), radius * mid.sin(), 0.0),
        }
    }

    /// Angle in degrees where the segment ends.
    pub fn end_degrees(&self) -> f64 {
        self.start_degrees + self.span_degrees
    }
}

/// One angular slice of the ring at a given level of detail.
#[derive(Debug)]
pub struct Segment {
    index: u32,
    lod: u8,
    mesh: SegmentMesh,
    placement: SegmentPlacement,
    bounds: Aabb,
    node: Option<SceneHandle>,
}

impl Segment {
    pub(crate) fn new(index: u32, lod: u8, mesh: SegmentMesh, placement: SegmentPlacement) -> Self {
        let bounds = mesh
            .bounds()
            .unwrap_or(Aabb::new(placement.center, placement.center));
        Self {
            index,
            lod,
            mesh,
            placement,
            bounds,
            node: None,
        }
    }

    /// Ring index of this segment.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Level of detail the geometry was built at.
    pub fn lod(&self) -> u8 {
        self.lod
    }

    /// The segment's geometry.
    pub fn mesh(&self) -> &SegmentMesh {
        &self.mesh
    }

    /// Placement on the ring.
    pub fn placement(&self) -> &SegmentPlacement {
        &self.placement
    }

    /// Bounding box of the displaced geometry, used as the proximity proxy.
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Scene node the segment is attached to, if any.
    pub fn node(&self) -> Option<SceneHandle> {
        self.node
    }

    /// Record the scene node this segment is attached to.
    pub fn attach(&mut self, node: SceneHandle) {
        self.node = Some(node);
    }

    /// Distance from `point` to the closest point of the segment's bounds.
    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.bounds.distance_to(point)
    }

    /// End this segment's life, releasing its geometry.
    pub(crate) fn retire(self) -> RetiredSegment {
        RetiredSegment {
            index: self.index,
            lod: self.lod,
            node: self.node,
        }
    }
}

/// What remains of a segment after its geometry has been released.
///
/// The scene node, if any, still has to be destroyed by whoever owns the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetiredSegment {
    /// Ring index the segment occupied.
    pub index: u32,
    /// LOD it was built at.
    pub lod: u8,
    /// Scene node it was attached to.
    pub node: Option<SceneHandle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_for_index() {
        let p = SegmentPlacement::for_index(1, 4, 100.0);
        assert_eq!(p.start_degrees, 90.0);
        assert_eq!(p.span_degrees, 90.0);
        assert_eq!(p.end_degrees(), 180.0);
        // Midpoint at 135 degrees.
        let expected = DVec3::new(-100.0, 100.0, 0.0) / 2.0_f64.sqrt();
        assert!((p.center - expected).length() < 1e-9);
    }

    #[test]
    fn test_retire_keeps_identity() {
        let placement = SegmentPlacement::for_index(3, 8, 10.0);
        let mut segment = Segment::new(3, 2, SegmentMesh::default(), placement);
        segment.attach(SceneHandle(7));
        assert_eq!(segment.bounds().min, placement.center);

        let retired = segment.retire();
        assert_eq!(retired.index, 3);
        assert_eq!(retired.lod, 2);
        assert_eq!(retired.node, Some(SceneHandle(7)));
    }
}
