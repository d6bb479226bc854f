//! Trail particles.
//!
//! A fixed pool of particles is created once. Each frame a particle
//! accumulates three forces, integrates with semi-implicit Euler, wraps
//! around the buffer edges and loses lifetime. When its lifetime runs out it
//! is re-initialised in place at a fresh spawn point.
//!
//! Forces:
//! - flow steering: a unit vector at `4π · field(pos · noise_scale, t)`,
//!   scaled to `noise_force_magnitude`
//! - keyword pursuit: constant magnitude `keyword_attraction_force` toward
//!   the target snapshot
//! - pointer repulsion: linear falloff from `mouse_repulsion_force` at the
//!   pointer to zero at `mouse_repulsion_radius`

use std::f32::consts::PI;

use glam::Vec2;
use image::Rgba;
use rand::Rng;

use crate::config::Config;
use crate::field::FlowField;
use crate::frame::FrameContext;
use crate::spawn::{random_between, random_direction, SpawnPointSet};

/// Linear remap of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
/// Values outside the input range extrapolate.
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// One trail particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Where this life started; drives the green channel.
    pub spawn_position: Vec2,
    pub velocity: Vec2,
    /// Force accumulated this frame, cleared after integration.
    pub acceleration: Vec2,
    pub lifetime_remaining: f32,
    pub lifetime_total: f32,
    /// Snapshot of a keyword position; `None` when there are no keywords.
    pub target: Option<Vec2>,
}

impl Particle {
    /// Create a particle at a random spawn point.
    pub fn spawn<R: Rng + ?Sized>(
        spawn: &SpawnPointSet,
        targets: &[Vec2],
        config: &Config,
        rng: &mut R,
    ) -> Self {
        let position = spawn.pick(rng);
        let lifetime = random_between(rng, config.lifetime_min, config.lifetime_max);
        Self {
            position,
            spawn_position: position,
            velocity: random_direction(rng) * config.initial_speed,
            acceleration: Vec2::ZERO,
            lifetime_remaining: lifetime,
            lifetime_total: lifetime,
            target: pick_target(targets, rng),
        }
    }

    /// Re-initialise in place with a fresh spawn point, velocity, lifetime
    /// and target.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        spawn: &SpawnPointSet,
        targets: &[Vec2],
        config: &Config,
        rng: &mut R,
    ) {
        *self = Self::spawn(spawn, targets, config, rng);
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Accumulate this frame's forces and retarget when the current target
    /// has been reached.
    pub fn follow_flow<F, R>(
        &mut self,
        field: &F,
        ctx: &FrameContext,
        targets: &[Vec2],
        config: &Config,
        rng: &mut R,
    ) where
        F: FlowField + ?Sized,
        R: Rng + ?Sized,
    {
        let value = field.sample(
            self.position.x * config.noise_scale,
            self.position.y * config.noise_scale,
            ctx.time,
        );
        self.apply_force(Vec2::from_angle(4.0 * PI * value) * config.noise_force_magnitude);

        if let Some(target) = self.target {
            let pull = (target - self.position).normalize_or_zero();
            self.apply_force(pull * config.keyword_attraction_force);

            if self.position.distance(target) < config.distance_threshold {
                if let Some(next) = pick_target(targets, rng) {
                    self.target = Some(next);
                }
            }
        }

        if let Some(pointer) = ctx.pointer {
            let away = self.position - pointer;
            let distance = away.length();
            if distance < config.mouse_repulsion_radius {
                let strength = remap(
                    distance,
                    0.0,
                    config.mouse_repulsion_radius,
                    config.mouse_repulsion_force,
                    0.0,
                );
                self.apply_force(away.normalize_or_zero() * strength);
            }
        }
    }

    /// Semi-implicit Euler step, speed clamp, force reset and edge wrap.
    pub fn integrate(&mut self, dt: f32, config: &Config) {
        self.velocity += self.acceleration * dt;
        self.velocity = self.velocity.clamp_length_max(config.max_speed);
        self.position += self.velocity * dt;
        self.acceleration = Vec2::ZERO;
        self.wrap(config.buffer_size());
    }

    /// Teleport to the opposite edge when outside `[0, size]`.
    pub fn wrap(&mut self, size: Vec2) {
        if self.position.x > size.x {
            self.position.x = 0.0;
        }
        if self.position.x < 0.0 {
            self.position.x = size.x;
        }
        if self.position.y > size.y {
            self.position.y = 0.0;
        }
        if self.position.y < 0.0 {
            self.position.y = size.y;
        }
    }

    /// Spend `dt` seconds of lifetime. Returns `true` once the particle is dead.
    pub fn age(&mut self, dt: f32) -> bool {
        self.lifetime_remaining = (self.lifetime_remaining - dt.max(0.0)).max(0.0);
        self.is_dead()
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.lifetime_remaining <= 0.0
    }

    /// Remaining fraction of this life, 1 at birth and 0 at death.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.lifetime_total > 0.0 {
            self.lifetime_remaining / self.lifetime_total
        } else {
            0.0
        }
    }

    /// Mark diameter: `particle_size_min` at birth growing to
    /// `particle_size_max` at death.
    pub fn size(&self, config: &Config) -> f32 {
        remap(
            self.life_ratio(),
            0.0,
            1.0,
            config.particle_size_max,
            config.particle_size_min,
        )
    }

    /// Mark colour. Red tracks pointer proximity, green the distance from the
    /// spawn point and blue the distance to the target.
    pub fn color(&self, pointer: Option<Vec2>, config: &Config) -> Rgba<u8> {
        let width = config.buffer_width as f32;

        let start_distance = remap(self.spawn_position.distance(self.position), 0.0, width, 255.0, 0.0);
        let target_distance = self
            .target
            .map(|t| remap(t.distance(self.position), 0.0, width, 0.0, 255.0))
            .unwrap_or(0.0);
        let pointer_distance = pointer
            .map(|p| remap(self.position.distance(p), 0.0, width / 2.0, 255.0, 0.0).clamp(0.0, 255.0))
            .unwrap_or(0.0);

        let red = remap(pointer_distance, 0.0, 255.0, 100.0, 255.0);
        let green = remap(start_distance, 0.0, 255.0, 200.0, 50.0);
        let blue = remap(target_distance, 0.0, 255.0, 150.0, 255.0);

        Rgba([channel(red), channel(green), channel(blue), config.particle_alpha])
    }
}

fn pick_target<R: Rng + ?Sized>(targets: &[Vec2], rng: &mut R) -> Option<Vec2> {
    if targets.is_empty() {
        None
    } else {
        Some(targets[rng.gen_range(0..targets.len())])
    }
}

#[inline]
fn channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}
