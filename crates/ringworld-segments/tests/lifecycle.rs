//! Full generation behaviour: index windows, repeat generation, cancellation
//! and texture artifacts.

use ringworld_config::Config;
use ringworld_segments::{
    ControllerState, HeadlessScene, HostMode, RingError, RingLifecycleController, plan,
};
use ringworld_terrain::FlatTerrain;

type Controller = RingLifecycleController<FlatTerrain, HeadlessScene>;

fn config(segment_count: u32, min: i64, max: i64, texture_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.ring.segment_count = segment_count;
    config.ring.radius_m = 1_000.0;
    config.ring.width_m = 100.0;
    config.ring.min_segment_index = min;
    config.ring.max_segment_index = max;
    config.textures.directory = texture_dir.to_path_buf();
    config
}

fn controller(config: Config) -> Controller {
    RingLifecycleController::new(config, FlatTerrain::default(), HeadlessScene::new()).unwrap()
}

fn indices(c: &Controller) -> Vec<u32> {
    c.registry().indices().collect()
}

#[test]
fn test_window_is_clamped_to_ring() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(config(4, -1, 360, dir.path()));
    let outcome = c.generate().unwrap();
    assert_eq!(indices(&c), vec![0, 1, 2, 3]);
    assert_eq!(outcome.requested, 4);
    assert_eq!(outcome.created, 4);
}

#[test]
fn test_single_index_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(config(10, 2, 2, dir.path()));
    c.generate().unwrap();
    assert_eq!(indices(&c), vec![2]);
}

#[test]
fn test_empty_window_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(config(10, 7, 3, dir.path()));
    let outcome = c.generate().unwrap();
    assert_eq!(outcome.created, 0);
    assert!(c.registry().is_empty());
    assert_eq!(c.state(), ControllerState::Idle);
}

#[test]
fn test_every_segment_matches_plan() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(6, 0, 5, dir.path());
    cfg.ring.verts_along_width = 5;
    cfg.ring.verts_along_circumference = 4;
    let mut c = controller(cfg);
    c.generate().unwrap();

    let p = plan(&c.config().ring).unwrap();
    assert_eq!(c.plan(), Some(&p));
    for segment in c.registry().iter() {
        assert_eq!(segment.mesh().vertices.len(), 6 * 4);
        assert_eq!(segment.mesh().indices.len(), 5 * 3 * 6);
        assert_eq!(segment.lod(), c.config().lod.starting_lod);
    }
}

#[test]
fn test_repeat_generation_replaces_not_unions() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(config(8, 1, 5, dir.path()));
    c.generate().unwrap();
    c.generate().unwrap();
    assert_eq!(c.registry().len(), 5);
    assert_eq!(indices(&c), vec![1, 2, 3, 4, 5]);
    assert_eq!(c.generation(), 2);
}

#[test]
fn test_cancel_keeps_created_segments() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(config(5, 0, 4, dir.path()));

    let mut reports = Vec::new();
    let mut cancel_after_two = |current: usize, total: usize| {
        reports.push((current, total));
        current == 2
    };
    let outcome = c.generate_with_progress(&mut cancel_after_two).unwrap();

    assert!(outcome.cancelled);
    assert_eq!(outcome.created, 2);
    assert_eq!(indices(&c), vec![0, 1]);
    assert_eq!(reports, vec![(1, 5), (2, 5)]);
    assert_eq!(c.state(), ControllerState::Idle);
    for segment in c.registry().iter() {
        assert!(segment.node().is_some());
        assert!(!segment.mesh().vertices.is_empty());
    }

    let outcome = c.generate().unwrap();
    assert!(!outcome.cancelled);
    assert_eq!(indices(&c), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_cancel_on_last_segment_is_completion() {
    let dir = tempfile::tempdir().unwrap();
    let mut c = controller(config(3, 0, 2, dir.path()));
    let mut always_cancel = |current: usize, total: usize| current == total;
    let outcome = c.generate_with_progress(&mut always_cancel).unwrap();
    assert!(!outcome.cancelled);
    assert_eq!(outcome.created, 3);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad = config(4, 0, 3, dir.path());
    bad.ring.width_m = -1.0;
    let result = RingLifecycleController::new(bad, FlatTerrain::default(), HeadlessScene::new());
    assert!(matches!(result, Err(RingError::InvalidConfiguration(_))));
}

#[test]
fn test_generate_purges_previous_textures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("segment_9.png"), b"stale").unwrap();
    std::fs::write(dir.path().join("readme.txt"), b"keep").unwrap();

    let mut c = controller(config(4, 0, 3, dir.path()));
    let outcome = c.generate().unwrap();

    assert_eq!(outcome.textures_purged.deleted, 1);
    assert!(!dir.path().join("segment_9.png").exists());
    assert!(dir.path().join("readme.txt").exists());
}

#[test]
fn test_texture_export_round_trip_through_generations() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(4, 0, 3, dir.path());
    cfg.textures.save_texture_files = true;
    cfg.textures.meters_per_pixel = 50.0;
    let mut c = controller(cfg);

    let first = c.generate().unwrap();
    assert_eq!(first.textures_exported, 4);
    for i in 0..4 {
        assert!(dir.path().join(format!("segment_{i}.png")).exists());
    }

    let second = c.generate().unwrap();
    assert_eq!(second.textures_purged.deleted, 4);
    assert_eq!(second.textures_exported, 4);
}

fn png_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
                .count()
        })
        .unwrap_or(0)
}

#[test]
fn test_texture_directory_change_applies_at_next_generation() {
    let old_dir = tempfile::tempdir().unwrap();
    let new_dir = tempfile::tempdir().unwrap();
    std::fs::write(new_dir.path().join("segment_99.png"), b"stale").unwrap();

    let mut cfg = config(4, 0, 3, old_dir.path());
    cfg.textures.save_texture_files = true;
    cfg.textures.meters_per_pixel = 50.0;
    let mut c = controller(cfg.clone());
    c.generate().unwrap();
    assert_eq!(png_count(old_dir.path()), 4);

    cfg.textures.directory = new_dir.path().to_path_buf();
    assert!(c.apply_config(cfg, HostMode::Editing).unwrap().is_none());
    // Staged only: the live epoch's textures stay where they are.
    assert_eq!(png_count(old_dir.path()), 4);
    assert_eq!(png_count(new_dir.path()), 1);

    let outcome = c.generate().unwrap();
    assert_eq!(outcome.textures_purged.deleted, 5);
    assert_eq!(outcome.textures_exported, 4);
    assert_eq!(png_count(old_dir.path()), 0);
    assert_eq!(png_count(new_dir.path()), 4);
    assert!(!new_dir.path().join("segment_99.png").exists());
}

#[test]
fn test_staged_ring_change_does_not_leak_into_upgrades() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = config(6, 0, 5, dir.path());
    cfg.ring.verts_along_width = 2;
    cfg.ring.verts_along_circumference = 3;
    cfg.lod.proximity_threshold = 5_000.0;
    let mut c = controller(cfg.clone());
    c.generate().unwrap();

    cfg.ring.verts_along_width = 8;
    cfg.ring.segment_count = 3;
    c.apply_config(cfg, HostMode::Editing).unwrap();

    let p = *c.plan().unwrap();
    while let Some(upgrade) = c.proximity_tick(Some(glam::DVec3::ZERO)) {
        assert!(upgrade.index < 6);
        let segment = c.registry().get(upgrade.index).unwrap();
        assert_eq!(segment.mesh().vertices.len(), p.vertex_count);
        assert_eq!(segment.mesh().indices.len(), p.index_count);
        assert!(segment.placement().end_degrees() <= 360.0);
    }
    assert_eq!(c.proximity_state().len(), 6);
    assert_eq!(c.registry().len(), 6);
}
