//! Segment geometry buffers and bounding boxes.

use glam::{DVec3, Vec3};

/// A single vertex of a ring segment, laid out for direct GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SegmentVertex {
    /// Position in ring space (ring axis along +Z, origin at the ring center).
    pub position: [f32; 3],
    /// Unit normal, pointing toward the ring axis on flat terrain.
    pub normal: [f32; 3],
    /// Texture coordinates; U runs around the ring, V across its width.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(SegmentVertex, [u8; 32]);

/// Owned vertex and index buffers for one segment.
#[derive(Clone, Debug, Default)]
pub struct SegmentMesh {
    /// Vertex buffer.
    pub vertices: Vec<SegmentVertex>,
    /// Index buffer (triangles, 3 indices per triangle).
    pub indices: Vec<u32>,
}

impl SegmentMesh {
    /// Create empty buffers sized for the given counts.
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex buffer as raw bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Approximate memory held by both buffers.
    pub fn byte_size(&self) -> usize {
        self.vertex_bytes().len() + self.index_bytes().len()
    }

    /// Replace every normal with the normalized sum of its adjacent face normals.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from(self.vertices[a].position);
            let pb = Vec3::from(self.vertices[b].position);
            let pc = Vec3::from(self.vertices[c].position);
            // Area-weighted: the unnormalized cross product.
            let n = (pb - pa).cross(pc - pa);
            accum[a] += n;
            accum[b] += n;
            accum[c] += n;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            if let Some(n) = n.try_normalize() {
                vertex.normal = n.to_array();
            }
        }
    }

    /// Axis-aligned box around every vertex, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position).as_dvec3());
        let first = iter.next()?;
        Some(iter.fold(Aabb::new(first, first), |b, p| b.grow(p)))
    }
}

/// An axis-aligned bounding box in ring space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: DVec3,
    /// Maximum corner of the bounding box.
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Returns the center point of the AABB.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Return a box that also contains `point`.
    pub fn grow(self, point: DVec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// The point inside the box nearest to `point`.
    pub fn closest_point(&self, point: DVec3) -> DVec3 {
        point.clamp(self.min, self.max)
    }

    /// Distance from `point` to the box; zero when inside.
    pub fn distance_to(&self, point: DVec3) -> f64 {
        point.distance(self.closest_point(point))
    }
}
