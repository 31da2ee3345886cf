use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ringworld_config::{RingConfig, TerrainConfig};
use ringworld_segments::{SegmentFactory, plan};
use ringworld_terrain::{FlatTerrain, NoiseTerrainSampler};

fn dense_ring() -> RingConfig {
    RingConfig {
        segment_count: 360,
        verts_along_width: 64,
        verts_along_circumference: 64,
        ..Default::default()
    }
}

fn bench_plan(c: &mut Criterion) {
    let ring = dense_ring();
    c.bench_function("ring_plan", |b| b.iter(|| plan(black_box(&ring))));
}

fn bench_flat_segment(c: &mut Criterion) {
    let ring = dense_ring();
    let p = plan(&ring).unwrap();
    let factory = SegmentFactory::new(FlatTerrain::default());
    c.bench_function("create_segment_flat_64x64", |b| {
        b.iter(|| factory.create_segment(black_box(17), 0, &ring, &p))
    });
}

fn bench_noise_segment(c: &mut Criterion) {
    let ring = dense_ring();
    let p = plan(&ring).unwrap();
    let factory = SegmentFactory::new(NoiseTerrainSampler::new(
        &TerrainConfig::default(),
        p.circumference,
    ));
    c.bench_function("create_segment_noise_lod0", |b| {
        b.iter(|| factory.create_segment(black_box(17), 0, &ring, &p))
    });
    c.bench_function("create_segment_noise_lod3", |b| {
        b.iter(|| factory.create_segment(black_box(17), 3, &ring, &p))
    });
}

criterion_group!(benches, bench_plan, bench_flat_segment, bench_noise_segment);
criterion_main!(benches);
