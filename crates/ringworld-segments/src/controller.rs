//! Full ring (re)generation and the live proximity loop.
//!
//! [`RingLifecycleController`] is the single writer of the segment registry
//! and the proximity state. A generation tears down the previous epoch,
//! recreates every segment in the configured window, and resets the upgrade
//! history. Between generations the host drives [`advance`] once per frame.
//!
//! Configuration and sampler changes are staged: upgrades keep using the ring,
//! plan and terrain of the epoch that built their neighbours until the next
//! generation adopts the staged values.
//!
//! [`advance`]: RingLifecycleController::advance

use glam::DVec3;
use ringworld_config::Config;
use ringworld_terrain::TerrainSampler;
use tracing::{debug, error, info, warn};

use crate::error::RingError;
use crate::factory::SegmentFactory;
use crate::planner::{RingPlan, plan};
use crate::progress::{NoProgress, ProgressReporter};
use crate::registry::SegmentRegistry;
use crate::scene::{DestroyQueue, SceneHandle, SceneHost};
use crate::scheduler::{LodUpgrade, ProximityLodScheduler, ProximityState};
use crate::segment::{RetiredSegment, Segment};
use crate::textures::{PurgeReport, TextureExporter, purge_exported_textures};

/// Name of the scene node every segment is parented under.
pub const CONTAINER_NAME: &str = "Segments";

/// Whether a generation is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// Waiting for a generation request or proximity ticks.
    Idle,
    /// Creating segments.
    Generating,
}

/// How the host is currently running, for auto-update decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostMode {
    /// Interactive editing; configuration changes may regenerate.
    Editing,
    /// Play mode; configuration changes never regenerate.
    Playing,
}

/// Summary of one generation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Segments in the clamped index window.
    pub requested: usize,
    /// Segments actually created.
    pub created: usize,
    /// Whether the progress reporter stopped the pass early.
    pub cancelled: bool,
    /// Result of purging textures from the previous generation.
    pub textures_purged: PurgeReport,
    /// Textures written during this pass.
    pub textures_exported: usize,
}

/// Settings frozen by a generation for the lifetime of its segments.
#[derive(Clone, Debug)]
struct Epoch {
    config: Config,
    plan: RingPlan,
}

/// Orchestrates generation and proximity LOD for one ring.
pub struct RingLifecycleController<S, H> {
    config: Config,
    epoch: Option<Epoch>,
    factory: SegmentFactory<S>,
    pending_sampler: Option<S>,
    scene: H,
    registry: SegmentRegistry,
    proximity: ProximityState,
    scheduler: ProximityLodScheduler,
    container: Option<SceneHandle>,
    destroy_queue: DestroyQueue,
    state: ControllerState,
    generation: u64,
}

impl<S: TerrainSampler, H: SceneHost> RingLifecycleController<S, H> {
    /// Create an idle controller. Nothing is generated until [`generate`](Self::generate).
    pub fn new(config: Config, sampler: S, scene: H) -> Result<Self, RingError> {
        let config = config.validated()?;
        Ok(Self {
            scheduler: ProximityLodScheduler::new(&config.lod),
            epoch: None,
            factory: SegmentFactory::new(sampler),
            pending_sampler: None,
            scene,
            registry: SegmentRegistry::new(),
            proximity: ProximityState::default(),
            container: None,
            destroy_queue: DestroyQueue::default(),
            state: ControllerState::Idle,
            generation: 0,
            config,
        })
    }

    /// Tear down and rebuild every segment in the configured window.
    pub fn generate(&mut self) -> Result<GenerationOutcome, RingError> {
        self.generate_with_progress(&mut NoProgress)
    }

    /// [`generate`](Self::generate), consulting `reporter` after each segment.
    ///
    /// A cancelled pass keeps the segments created so far. Configuration
    /// errors are returned before anything is torn down.
    pub fn generate_with_progress(
        &mut self,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<GenerationOutcome, RingError> {
        let config = self.config.validated()?;
        let plan = plan(&config.ring)?;

        self.state = ControllerState::Generating;
        info!(
            segments = config.ring.segment_count,
            radius = config.ring.radius_m,
            "Generating circle mesh..."
        );

        let exporter = TextureExporter::new(&config.textures);
        let mut textures_purged = purge_exported_textures(exporter.directory());
        if let Some(previous) = &self.epoch
            && previous.config.textures.directory != config.textures.directory
        {
            let stale = purge_exported_textures(&previous.config.textures.directory);
            textures_purged.deleted += stale.deleted;
            textures_purged.failed += stale.failed;
        }
        self.tear_down();

        if let Some(sampler) = self.pending_sampler.take() {
            self.factory = SegmentFactory::new(sampler);
        }
        let container = self.scene.create_placeholder(CONTAINER_NAME);
        self.container = Some(container);
        self.scheduler = ProximityLodScheduler::new(&config.lod);

        let mut outcome = GenerationOutcome {
            textures_purged,
            ..Default::default()
        };

        if let Some((first, last)) = config.ring.index_window() {
            outcome.requested = (last - first) as usize + 1;
            for index in first..=last {
                let segment =
                    self.factory
                        .create_segment(index, config.lod.starting_lod, &config.ring, &plan);
                if config.textures.save_texture_files {
                    match exporter.export(&segment, &config.ring, &plan, self.factory.sampler())
                    {
                        Ok(_) => outcome.textures_exported += 1,
                        Err(e) => error!(index, "Texture export failed: {e}"),
                    }
                }
                self.store(segment);
                outcome.created += 1;

                let cancel = reporter.report(outcome.created, outcome.requested);
                if cancel && outcome.created < outcome.requested {
                    info!(
                        created = outcome.created,
                        requested = outcome.requested,
                        "Operation canceled by the user."
                    );
                    outcome.cancelled = true;
                    break;
                }
            }
        } else {
            warn!(
                min = config.ring.min_segment_index,
                max = config.ring.max_segment_index,
                "Segment index window is empty; no segments created"
            );
        }

        self.proximity.clear();
        self.config = config.clone();
        self.epoch = Some(Epoch { config, plan });
        self.generation += 1;
        self.state = ControllerState::Idle;

        debug!(
            generation = self.generation,
            created = outcome.created,
            bytes = self.registry.geometry_bytes(),
            "generation finished"
        );
        Ok(outcome)
    }

    /// Stage a new configuration for the next generation.
    ///
    /// Regenerates right away when `auto_update` is set and the host is
    /// editing, returning that outcome. Otherwise live segments and proximity
    /// upgrades keep the current epoch's settings.
    pub fn apply_config(
        &mut self,
        config: Config,
        mode: HostMode,
    ) -> Result<Option<GenerationOutcome>, RingError> {
        let config = config.validated()?;
        let regenerate = config.ring.auto_update && mode == HostMode::Editing;
        self.config = config;
        if regenerate {
            self.generate().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Stage a terrain sampler; the next generation builds with it.
    pub fn replace_sampler(&mut self, sampler: S) {
        self.pending_sampler = Some(sampler);
    }

    /// One host step: finish deferred teardown, then run a proximity tick if due.
    pub fn advance(&mut self, dt: f64, observer: Option<DVec3>) -> Option<LodUpgrade> {
        self.flush_deferred();
        if self.scheduler.advance(dt) {
            self.proximity_tick(observer)
        } else {
            None
        }
    }

    /// Run one proximity evaluation immediately, ignoring the clock.
    pub fn proximity_tick(&mut self, observer: Option<DVec3>) -> Option<LodUpgrade> {
        let epoch = self.epoch.as_ref()?;
        let upgrade = self.scheduler.tick(
            observer,
            &epoch.config.ring,
            &epoch.plan,
            &self.factory,
            &mut self.registry,
            &mut self.proximity,
        )?;

        // The replacement is attached before the old node goes away.
        if let Some(container) = self.container
            && let Some(segment) = self.registry.get_mut(upgrade.index)
        {
            let node = self.scene.create_placeholder(&upgrade.index.to_string());
            self.scene.set_parent(node, container);
            self.scene.set_placement(node, segment.placement());
            segment.attach(node);
        }
        if let Some(old) = upgrade.retired.node {
            self.scene.destroy(old);
        }

        Some(upgrade)
    }

    /// Destroy scene nodes whose teardown was deferred by the last generation.
    pub fn flush_deferred(&mut self) -> usize {
        self.destroy_queue.flush(&mut self.scene)
    }

    fn tear_down(&mut self) {
        let retired = self.registry.clear();
        if retired.is_empty() && self.container.is_none() {
            return;
        }
        info!(count = retired.len(), "Deleting previous segments...");
        match self.container.take() {
            // Segment nodes go with their container.
            Some(container) => self.destroy_queue.enqueue(container),
            None => {
                for node in retired.iter().filter_map(|r: &RetiredSegment| r.node) {
                    self.destroy_queue.enqueue(node);
                }
            }
        }
    }

    fn store(&mut self, mut segment: Segment) {
        if let Some(container) = self.container {
            let node = self.scene.create_placeholder(&segment.index().to_string());
            self.scene.set_parent(node, container);
            self.scene.set_placement(node, segment.placement());
            segment.attach(node);
        }
        if let Some(retired) = self.registry.put(segment.index(), segment)
            && let Some(node) = retired.node
        {
            self.scene.destroy(node);
        }
    }

    /// The latest validated configuration, staged for the next generation.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configuration the live segments were generated with.
    pub fn active_config(&self) -> Option<&Config> {
        self.epoch.as_ref().map(|e| &e.config)
    }

    /// Constants of the last generation, if any ran.
    pub fn plan(&self) -> Option<&RingPlan> {
        self.epoch.as_ref().map(|e| &e.plan)
    }

    /// Whether a sampler is waiting for the next generation.
    pub fn has_pending_sampler(&self) -> bool {
        self.pending_sampler.is_some()
    }

    /// Live segments.
    pub fn registry(&self) -> &SegmentRegistry {
        &self.registry
    }

    /// Indices upgraded during the current epoch.
    pub fn proximity_state(&self) -> &ProximityState {
        &self.proximity
    }

    /// The proximity scheduler.
    pub fn scheduler(&self) -> &ProximityLodScheduler {
        &self.scheduler
    }

    /// The scene host.
    pub fn scene(&self) -> &H {
        &self.scene
    }

    /// Container node of the current generation.
    pub fn container(&self) -> Option<SceneHandle> {
        self.container
    }

    /// Scene nodes waiting for the next step to be destroyed.
    pub fn pending_destroy(&self) -> usize {
        self.destroy_queue.len()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
