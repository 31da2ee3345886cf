//! The authoritative map from ring index to live segment.

use std::collections::BTreeMap;

use crate::segment::{RetiredSegment, Segment};

/// Owns every live segment, at most one per ring index.
///
/// Replacing or clearing a segment releases its geometry immediately and
/// hands back a [`RetiredSegment`] so the caller can detach its scene node.
#[derive(Debug, Default)]
pub struct SegmentRegistry {
    segments: BTreeMap<u32, Segment>,
}

impl SegmentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `segment` at `index`, retiring any segment already there.
    pub fn put(&mut self, index: u32, segment: Segment) -> Option<RetiredSegment> {
        debug_assert_eq!(index, segment.index(), "segment stored under a foreign index");
        self.segments.insert(index, segment).map(Segment::retire)
    }

    /// The live segment at `index`.
    pub fn get(&self, index: u32) -> Option<&Segment> {
        self.segments.get(&index)
    }

    /// Mutable access to the live segment at `index`.
    pub fn get_mut(&mut self, index: u32) -> Option<&mut Segment> {
        self.segments.get_mut(&index)
    }

    /// Whether a segment is live at `index`.
    pub fn contains(&self, index: u32) -> bool {
        self.segments.contains_key(&index)
    }

    /// Live indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.segments.keys().copied()
    }

    /// Live segments in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Number of live segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether no segment is live.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Release every segment and empty the registry.
    pub fn clear(&mut self) -> Vec<RetiredSegment> {
        std::mem::take(&mut self.segments)
            .into_values()
            .map(Segment::retire)
            .collect()
    }

    /// Total bytes held by live geometry buffers.
    pub fn geometry_bytes(&self) -> usize {
        self.segments.values().map(|s| s.mesh().byte_size()).sum()
    }
}
