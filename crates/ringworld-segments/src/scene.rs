//! Scene attachment: the opaque host capability segments are parented under.
//!
//! The generator never owns scene nodes beyond creating and destroying them.
//! [`HeadlessScene`] is an in-memory host for tools and tests, and
//! [`DestroyQueue`] defers destruction by one scheduling step.

use std::collections::HashMap;

use crate::segment::SegmentPlacement;

/// Opaque handle to a node owned by the scene host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneHandle(pub u64);

/// Scene graph operations the generator needs from its host.
pub trait SceneHost {
    /// Create an empty named node.
    fn create_placeholder(&mut self, name: &str) -> SceneHandle;

    /// Destroy a node and everything parented under it.
    /// Returns `false` if the node no longer exists.
    fn destroy(&mut self, handle: SceneHandle) -> bool;

    /// Parent `child` under `parent`.
    fn set_parent(&mut self, child: SceneHandle, parent: SceneHandle);

    /// Position a node where a segment sits on the ring.
    fn set_placement(&mut self, handle: SceneHandle, placement: &SegmentPlacement);
}

/// A node tracked by [`HeadlessScene`].
#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    /// Name given at creation.
    pub name: String,
    /// Parent node, if any.
    pub parent: Option<SceneHandle>,
    /// Last placement set on the node.
    pub placement: Option<SegmentPlacement>,
}

/// An in-memory scene host with no rendering behind it.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    nodes: HashMap<SceneHandle, SceneNode>,
    next_id: u64,
}

impl HeadlessScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live node.
    pub fn node(&self, handle: SceneHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    /// Whether `handle` refers to a live node.
    pub fn contains(&self, handle: SceneHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Live children of `parent`.
    pub fn children(&self, parent: SceneHandle) -> Vec<SceneHandle> {
        let mut out: Vec<_> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(parent))
            .map(|(&h, _)| h)
            .collect();
        out.sort();
        out
    }
}

impl SceneHost for HeadlessScene {
    fn create_placeholder(&mut self, name: &str) -> SceneHandle {
        let handle = SceneHandle(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            handle,
            SceneNode {
                name: name.to_string(),
                parent: None,
                placement: None,
            },
        );
        handle
    }

    fn destroy(&mut self, handle: SceneHandle) -> bool {
        if self.nodes.remove(&handle).is_none() {
            return false;
        }
        for child in self.children(handle) {
            self.destroy(child);
        }
        true
    }

    fn set_parent(&mut self, child: SceneHandle, parent: SceneHandle) {
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    fn set_placement(&mut self, handle: SceneHandle, placement: &SegmentPlacement) {
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.placement = Some(*placement);
        }
    }
}

/// Scene nodes waiting to be destroyed at the next scheduling step.
///
/// Lets the frame that still references a container finish before it goes away.
#[derive(Debug, Default)]
pub struct DestroyQueue {
    pending: Vec<SceneHandle>,
}

impl DestroyQueue {
    /// Queue a node for destruction.
    pub fn enqueue(&mut self, handle: SceneHandle) {
        self.pending.push(handle);
    }

    /// Destroy all queued nodes. Returns how many actually existed.
    pub fn flush(&mut self, scene: &mut dyn SceneHost) -> usize {
        self.pending
            .drain(..)
            .filter(|&h| scene.destroy(h))
            .count()
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
