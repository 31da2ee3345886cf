//! Proximity-driven LOD upgrades against a generated ring.
//!
//! The ring has four flat segments of radius 1000 m, so segment `i` spans
//! `[90·i, 90·(i+1))` degrees and its bounding box covers one quadrant of the
//! XY plane, 100 m deep along Z.

use glam::DVec3;
use ringworld_config::Config;
use ringworld_segments::{HeadlessScene, RingLifecycleController};
use ringworld_terrain::FlatTerrain;

type Controller = RingLifecycleController<FlatTerrain, HeadlessScene>;

fn generated(threshold: f64) -> (Controller, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.ring.segment_count = 4;
    config.ring.radius_m = 1_000.0;
    config.ring.width_m = 100.0;
    config.lod.starting_lod = 4;
    config.lod.upgrade_lod = 0;
    config.lod.proximity_threshold = threshold;
    config.textures.directory = dir.path().to_path_buf();

    let mut c =
        RingLifecycleController::new(config, FlatTerrain::default(), HeadlessScene::new()).unwrap();
    c.generate().unwrap();
    (c, dir)
}

#[test]
fn test_single_nearby_segment_upgraded_once() {
    let (mut c, _dir) = generated(300.0);
    let observer = Some(DVec3::new(707.0, 707.0, 0.0));

    let upgrade = c.proximity_tick(observer).unwrap();
    assert_eq!(upgrade.index, 0);
    assert_eq!(upgrade.from_lod, 4);
    assert_eq!(upgrade.to_lod, 0);
    assert_eq!(upgrade.distance, 0.0);
    assert_eq!(c.registry().get(0).unwrap().lod(), 0);

    assert!(c.proximity_tick(observer).is_none());
    assert_eq!(c.proximity_state().iter().collect::<Vec<_>>(), vec![0]);
    for i in 1..4 {
        assert_eq!(c.registry().get(i).unwrap().lod(), 4);
    }
}

#[test]
fn test_equidistant_segments_pick_lowest_index() {
    let (mut c, _dir) = generated(600.0);
    // On the seam between segments 0 and 1, 500 m beyond the rim.
    let observer = Some(DVec3::new(0.0, 1_500.0, 0.0));

    let d0 = c.registry().get(0).unwrap().distance_to(observer.unwrap());
    let d1 = c.registry().get(1).unwrap().distance_to(observer.unwrap());
    assert_eq!(d0, d1);

    assert_eq!(c.proximity_tick(observer).unwrap().index, 0);
    assert_eq!(c.proximity_tick(observer).unwrap().index, 1);
    assert!(c.proximity_tick(observer).is_none());
}

#[test]
fn test_far_observer_causes_no_upgrade() {
    let (mut c, _dir) = generated(300.0);
    let observer = Some(DVec3::new(5_000.0, 5_000.0, 0.0));
    assert!(c.proximity_tick(observer).is_none());
    assert!(c.proximity_state().is_empty());
    assert!(c.registry().iter().all(|s| s.lod() == 4));
}

#[test]
fn test_missing_observer_is_noop() {
    let (mut c, _dir) = generated(300.0);
    assert!(c.proximity_tick(None).is_none());
    assert!(c.advance(5.0, None).is_none());
    assert!(c.proximity_state().is_empty());
}

#[test]
fn test_one_upgrade_per_tick() {
    let (mut c, _dir) = generated(10_000.0);
    let observer = Some(DVec3::ZERO);

    for expected_len in 1..=4 {
        assert!(c.advance(1.0, observer).is_some());
        assert_eq!(c.proximity_state().len(), expected_len);
    }
    assert!(c.advance(1.0, observer).is_none());
}

#[test]
fn test_regeneration_resets_upgrade_history() {
    let (mut c, _dir) = generated(300.0);
    let observer = Some(DVec3::new(707.0, 707.0, 0.0));
    c.proximity_tick(observer).unwrap();
    assert!(c.proximity_tick(observer).is_none());

    c.generate().unwrap();
    assert!(c.proximity_state().is_empty());
    assert_eq!(c.registry().get(0).unwrap().lod(), 4);
    assert_eq!(c.proximity_tick(observer).unwrap().index, 0);
}

#[test]
fn test_upgrade_leaves_other_segments_untouched() {
    let (mut c, _dir) = generated(300.0);
    let before: Vec<_> = c
        .registry()
        .iter()
        .map(|s| (s.index(), s.node(), s.lod()))
        .collect();

    c.proximity_tick(Some(DVec3::new(-707.0, -707.0, 0.0))).unwrap();

    let after: Vec<_> = c
        .registry()
        .iter()
        .map(|s| (s.index(), s.node(), s.lod()))
        .collect();
    assert_eq!(after.len(), before.len());
    for (b, a) in before.iter().zip(&after) {
        if b.0 == 2 {
            assert_ne!(b.1, a.1);
            assert_eq!(a.2, 0);
        } else {
            assert_eq!(b, a);
        }
    }
}
