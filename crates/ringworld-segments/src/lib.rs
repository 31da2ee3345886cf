//! Ring segment generation: geometry planning, segment construction, the live
//! segment registry, proximity-driven LOD upgrades and the lifecycle controller
//! that ties them together.

mod controller;
mod error;
mod factory;
mod mesh;
mod planner;
mod progress;
mod registry;
mod scene;
mod scheduler;
mod segment;
mod textures;

pub use controller::{
    CONTAINER_NAME, ControllerState, GenerationOutcome, HostMode, RingLifecycleController,
};
pub use error::{RingError, TextureError};
pub use factory::SegmentFactory;
pub use mesh::{Aabb, SegmentMesh, SegmentVertex};
pub use planner::{RingPlan, plan};
pub use progress::{LogProgress, NoProgress, ProgressReporter};
pub use registry::SegmentRegistry;
pub use scene::{DestroyQueue, HeadlessScene, SceneHandle, SceneHost, SceneNode};
pub use scheduler::{
    DEFAULT_TICK_INTERVAL, LodUpgrade, ProximityLodScheduler, ProximityState, TickClock,
    UpgradeCandidate, select_candidate,
};
pub use segment::{RetiredSegment, Segment, SegmentPlacement};
pub use textures::{MAX_TEXTURE_EDGE, PurgeReport, TextureExporter, purge_exported_textures};
