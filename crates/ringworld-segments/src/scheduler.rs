//! Proximity-driven LOD upgrades on a fixed cadence.
//!
//! Each tick picks the single nearest segment within the proximity threshold
//! that has not been upgraded yet this generation, and rebuilds it at the
//! target LOD. Ticks never overlap and never run in catch-up bursts: a clock
//! that fell behind by several intervals fires once and drops the backlog.

use std::collections::BTreeSet;

use glam::DVec3;
use ringworld_config::{LodConfig, RingConfig};
use ringworld_terrain::TerrainSampler;
use tracing::{debug, info};

use crate::factory::SegmentFactory;
use crate::planner::RingPlan;
use crate::registry::SegmentRegistry;
use crate::segment::RetiredSegment;

/// Default seconds between proximity checks.
pub const DEFAULT_TICK_INTERVAL: f64 = 1.0;

/// Indices already upgraded during the current generation epoch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProximityState {
    upgraded: BTreeSet<u32>,
}

impl ProximityState {
    /// Whether `index` was already upgraded.
    pub fn contains(&self, index: u32) -> bool {
        self.upgraded.contains(&index)
    }

    /// Record an upgrade. Returns `false` if it was already recorded.
    pub fn insert(&mut self, index: u32) -> bool {
        self.upgraded.insert(index)
    }

    /// Forget every upgrade; only a full generation does this.
    pub fn clear(&mut self) {
        self.upgraded.clear();
    }

    /// Number of upgraded indices.
    pub fn len(&self) -> usize {
        self.upgraded.len()
    }

    /// Whether nothing was upgraded yet.
    pub fn is_empty(&self) -> bool {
        self.upgraded.is_empty()
    }

    /// Upgraded indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.upgraded.iter().copied()
    }
}

/// Fixed-interval clock driving proximity ticks.
#[derive(Clone, Debug)]
pub struct TickClock {
    interval: f64,
    accumulator: f64,
    ticks_run: u64,
    ticks_dropped: u64,
}

impl TickClock {
    /// Create a clock firing every `interval` seconds.
    ///
    /// Non-positive or non-finite intervals fall back to [`DEFAULT_TICK_INTERVAL`].
    pub fn new(interval: f64) -> Self {
        let interval = if interval.is_finite() && interval > 0.0 {
            interval
        } else {
            DEFAULT_TICK_INTERVAL
        };
        Self {
            interval,
            accumulator: 0.0,
            ticks_run: 0,
            ticks_dropped: 0,
        }
    }

    /// Advance by `dt` seconds. Returns `true` when a tick is due.
    ///
    /// At most one tick is reported per call; whole intervals beyond the first
    /// are dropped, keeping the phase of the remainder.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.accumulator += dt.max(0.0);
        if self.accumulator < self.interval {
            return false;
        }
        let elapsed = (self.accumulator / self.interval).floor() as u64;
        self.ticks_dropped += elapsed.saturating_sub(1);
        self.ticks_run += 1;
        self.accumulator %= self.interval;
        true
    }

    /// Seconds between ticks.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// Ticks reported so far.
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Intervals skipped because the host fell behind.
    pub fn ticks_dropped(&self) -> u64 {
        self.ticks_dropped
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

/// The segment chosen for an upgrade and its distance to the observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeCandidate {
    /// Ring index of the winner.
    pub index: u32,
    /// Distance from the observer to the segment's bounds.
    pub distance: f64,
}

/// A completed upgrade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodUpgrade {
    /// Ring index that was rebuilt.
    pub index: u32,
    /// LOD of the replaced segment.
    pub from_lod: u8,
    /// LOD of the new segment.
    pub to_lod: u8,
    /// Observer distance that triggered the upgrade.
    pub distance: f64,
    /// The replaced segment, whose scene node still needs destroying.
    pub retired: RetiredSegment,
}

/// Pick the nearest not-yet-upgraded segment within `threshold` of `observer`.
///
/// Ties go to the lowest index.
pub fn select_candidate(
    registry: &SegmentRegistry,
    state: &ProximityState,
    observer: DVec3,
    threshold: f64,
) -> Option<UpgradeCandidate> {
    let mut best: Option<UpgradeCandidate> = None;
    // Registry iteration is ascending, so a strict comparison keeps the lowest index on ties.
    for segment in registry.iter().filter(|s| !state.contains(s.index())) {
        let distance = segment.distance_to(observer);
        if distance > threshold {
            continue;
        }
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(UpgradeCandidate {
                index: segment.index(),
                distance,
            });
        }
    }
    best
}

/// Replaces the nearest eligible segment with a finer rebuild, once per tick.
#[derive(Clone, Debug)]
pub struct ProximityLodScheduler {
    clock: TickClock,
    threshold: f64,
    target_lod: u8,
}

impl ProximityLodScheduler {
    /// Create a scheduler from the LOD settings.
    pub fn new(config: &LodConfig) -> Self {
        Self {
            clock: TickClock::new(config.tick_interval_secs),
            threshold: config.proximity_threshold,
            target_lod: config.upgrade_lod,
        }
    }

    /// Maximum upgrade distance.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// LOD upgraded segments are rebuilt at.
    pub fn target_lod(&self) -> u8 {
        self.target_lod
    }

    /// The tick clock.
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Advance the clock; returns `true` when a tick should run now.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.clock.advance(dt)
    }

    /// Run one proximity evaluation.
    ///
    /// Does nothing without an observer or when no candidate is in range.
    /// Otherwise rebuilds the winner at the target LOD, stores it in the
    /// registry and marks its index as upgraded.
    pub fn tick<S: TerrainSampler>(
        &self,
        observer: Option<DVec3>,
        ring: &RingConfig,
        plan: &RingPlan,
        factory: &SegmentFactory<S>,
        registry: &mut SegmentRegistry,
        state: &mut ProximityState,
    ) -> Option<LodUpgrade> {
        let observer = observer?;
        let candidate = select_candidate(registry, state, observer, self.threshold)?;

        let replacement = factory.create_segment(candidate.index, self.target_lod, ring, plan);
        let retired = registry.put(candidate.index, replacement)?;
        state.insert(candidate.index);

        info!(
            index = candidate.index,
            distance = candidate.distance,
            "Closest segment is {} with a distance of {:.1}",
            candidate.index,
            candidate.distance
        );
        debug!(
            index = candidate.index,
            from_lod = retired.lod,
            to_lod = self.target_lod,
            "segment upgraded"
        );

        Some(LodUpgrade {
            index: candidate.index,
            from_lod: retired.lod,
            to_lod: self.target_lod,
            distance: candidate.distance,
            retired,
        })
    }
}
