//! Benchmarks for the per-frame hot path.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use glyphdrift::prelude::*;
use glyphdrift::Compositor;

fn build(particles: usize) -> Simulation {
    let config = Config::for_resolution(1280, 720).with_particle_count(particles);
    let mut rng = SmallRng::seed_from_u64(42);

    let base = RgbaImage::from_pixel(160, 48, Rgba([255, 255, 255, 180]));
    let keywords = (0..8)
        .map(|i| {
            let sprites = SpriteCache::from_base(&base, &config.blur_levels);
            KeywordAgent::new(format!("k{i}"), sprites, &config, &mut rng)
        })
        .collect();

    let points = (0..2_000)
        .map(|i| Vec2::new(400.0 + (i % 500) as f32, 300.0 + (i / 500) as f32 * 30.0))
        .collect();
    let spawn = SpawnPointSet::new(points, "bench").unwrap();
    let title = TitleSprite::new(
        RgbaImage::from_pixel(500, 120, Rgba([255, 255, 255, 255])),
        Rect::new(390.0, 300.0, 500.0, 120.0),
    );

    Simulation::from_parts(config, spawn, title, keywords, rng).unwrap()
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");
    group.sample_size(20);

    for count in [500usize, 2_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut sim = build(count);
            b.iter(|| {
                black_box(sim.step(1.0 / 60.0, Some(Vec2::new(640.0, 360.0))));
            })
        });
    }

    group.finish();
}

fn bench_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");

    group.bench_function("begin_frame_1280x720", |b| {
        let mut compositor = Compositor::new(1280, 720, 4);
        b.iter(|| compositor.begin_frame())
    });

    group.bench_function("draw_particle_d32", |b| {
        let mut compositor = Compositor::new(1280, 720, 4);
        b.iter(|| {
            compositor.draw_particle(
                black_box(Vec2::new(640.0, 360.0)),
                32.0,
                Rgba([200, 100, 220, 64]),
            )
        })
    });

    group.finish();
}

criterion_group!(benches, bench_step, bench_compositor);
criterion_main!(benches);
