//! End-to-end tests driving the public API with synthetic spawn points and
//! sprites, so no font file is needed.

use glyphdrift::prelude::*;
use image::{Rgba, RgbaImage};
use rand::rngs::SmallRng;
use rand::SeedableRng;

const WIDTH: u32 = 200;
const HEIGHT: u32 = 120;

fn config() -> Config {
    Config::for_resolution(WIDTH, HEIGHT).with_particle_count(300)
}

fn title() -> TitleSprite {
    TitleSprite::new(
        RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255])),
        Rect::new(80.0, 50.0, 40.0, 20.0),
    )
}

fn spawn_points() -> SpawnPointSet {
    let points = (0..40)
        .map(|i| Vec2::new(80.0 + i as f32, 50.0 + (i % 20) as f32))
        .collect();
    SpawnPointSet::new(points, "synthetic").unwrap()
}

fn keywords(config: &Config, rng: &mut SmallRng, count: usize) -> Vec<KeywordAgent> {
    (0..count)
        .map(|i| {
            let base = RgbaImage::from_pixel(16, 8, Rgba([255, 255, 255, 255]));
            let sprites = SpriteCache::from_base(&base, &config.blur_levels);
            KeywordAgent::new(format!("word{i}"), sprites, config, rng)
        })
        .collect()
}

fn build(config: Config, keyword_count: usize, seed: u64) -> Simulation {
    let mut rng = SmallRng::seed_from_u64(seed);
    let words = keywords(&config, &mut rng, keyword_count);
    Simulation::from_parts(config, spawn_points(), title(), words, rng).unwrap()
}

#[test]
fn test_speed_never_exceeds_max() {
    let mut sim = build(config(), 5, 1);
    let max = sim.config().max_speed;
    for frame in 0..120 {
        let pointer = (frame % 3 == 0).then(|| Vec2::new(100.0, 60.0));
        sim.step(1.0 / 30.0, pointer);
        for p in sim.particles() {
            assert!(p.velocity.length() <= max + 1e-3, "speed {} > {max}", p.velocity.length());
        }
    }
}

#[test]
fn test_lifetime_stays_in_range() {
    let mut sim = build(config(), 3, 2);
    for _ in 0..200 {
        sim.step(0.1, None);
        for p in sim.particles() {
            assert!(p.lifetime_remaining > 0.0);
            assert!(p.lifetime_remaining <= p.lifetime_total);
            assert!(p.lifetime_total >= sim.config().lifetime_min);
            assert!(p.lifetime_total <= sim.config().lifetime_max);
        }
    }
}

#[test]
fn test_lifetime_decreases_until_respawn() {
    let mut sim = build(config(), 3, 3);
    let mut previous: Vec<(f32, f32)> = sim
        .particles()
        .iter()
        .map(|p| (p.lifetime_remaining, p.lifetime_total))
        .collect();

    for _ in 0..100 {
        sim.step(0.2, None);
        for (p, (before, total)) in sim.particles().iter().zip(&previous) {
            let respawned = p.lifetime_remaining > *before;
            if respawned {
                assert!(sim.spawn_points().contains(p.spawn_position));
            } else {
                assert_eq!(p.lifetime_total, *total);
            }
        }
        previous = sim
            .particles()
            .iter()
            .map(|p| (p.lifetime_remaining, p.lifetime_total))
            .collect();
    }
}

#[test]
fn test_everyone_respawns_from_the_outline() {
    let mut config = config();
    config.lifetime_min = 0.5;
    config.lifetime_max = 0.5;
    let mut sim = build(config, 2, 4);

    sim.step(0.6, None);
    for p in sim.particles() {
        assert!(sim.spawn_points().contains(p.position));
        assert_eq!(p.position, p.spawn_position);
        assert!((p.velocity.length() - sim.config().initial_speed).abs() < 1e-3);
        assert!(p.target.is_some());
    }
}

#[test]
fn test_particles_stay_inside_buffer() {
    let mut sim = build(config(), 4, 5);
    for _ in 0..150 {
        sim.step(0.25, None);
        for p in sim.particles() {
            assert!(p.position.x >= 0.0 && p.position.x <= WIDTH as f32);
            assert!(p.position.y >= 0.0 && p.position.y <= HEIGHT as f32);
        }
    }
}

#[test]
fn test_keywords_stay_inside_buffer() {
    let mut sim = build(config(), 6, 6);
    for _ in 0..300 {
        sim.step(0.1, None);
        for k in sim.keywords() {
            let r = k.sprite_rect();
            assert!(r.x >= 0.0 && r.x + r.w <= WIDTH as f32 + 1e-3);
            assert!(r.y >= 0.0 && r.y + r.h <= HEIGHT as f32 + 1e-3);
            assert!(k.depth >= sim.config().z_min && k.depth <= sim.config().z_max);
            assert!(k.sprite_index() < k.sprites().len());
        }
    }
}

#[test]
fn test_zero_keywords_is_a_valid_scene() {
    let config = config().with_keywords(Vec::<String>::new());
    let mut sim = build(config, 0, 7);
    for _ in 0..30 {
        sim.step(0.1, Some(Vec2::new(10.0, 10.0)));
    }
    assert!(sim.keywords().is_empty());
    assert!(sim.particles().iter().all(|p| p.target.is_none()));
    assert!(sim.particles().iter().all(|p| p.position.is_finite()));
}

#[test]
fn test_trails_persist_across_frames() {
    let mut sim = build(config(), 0, 8);
    sim.toggle_title();
    sim.step(0.05, None);
    let lit_first = sim.scene().pixels().filter(|p| p.0[..3] != [0, 0, 0]).count();
    sim.step(0.05, None);
    let lit_second = sim.scene().pixels().filter(|p| p.0[..3] != [0, 0, 0]).count();
    assert!(lit_first > 0);
    assert!(lit_second >= lit_first);
}

#[test]
fn test_deterministic_with_fixed_seed_and_field() {
    let mut a = build(config(), 3, 9).with_field(ConstantField(0.3));
    let mut b = build(config(), 3, 9).with_field(ConstantField(0.3));
    for _ in 0..20 {
        a.step(0.05, None);
        b.step(0.05, None);
    }
    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.scene(), b.scene());
}
