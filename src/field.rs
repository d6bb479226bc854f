//! Flow field sampled by particles to pick a steering direction.
//!
//! A [`FlowField`] maps a point in space and time to a smooth scalar in
//! `[0, 1)`. Particles turn that scalar into an angle:
//!
//! ```ignore
//! let value = field.sample(pos.x * config.noise_scale, pos.y * config.noise_scale, time);
//! let angle = 4.0 * PI * value; // wraps twice over the unit range
//! let force = Vec2::from_angle(angle) * config.noise_force_magnitude;
//! ```

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Largest value a field may return; samples are clamped below 1.0.
const BELOW_ONE: f32 = 1.0 - f32::EPSILON;

/// A continuous scalar field over (x, y, t).
pub trait FlowField {
    /// Sample the field. Must return a value in `[0, 1)` and be smooth in
    /// all three arguments.
    fn sample(&self, x: f32, y: f32, t: f32) -> f32;
}

/// Multi-octave Perlin noise remapped to `[0, 1)`.
pub struct NoiseField {
    noise: Fbm<Perlin>,
}

impl NoiseField {
    /// Octave count and falloff matching classic creative-coding noise.
    const OCTAVES: usize = 4;
    const PERSISTENCE: f64 = 0.5;

    /// Create a field with the given seed.
    pub fn new(seed: u32) -> Self {
        let noise = Fbm::<Perlin>::new(seed)
            .set_octaves(Self::OCTAVES)
            .set_persistence(Self::PERSISTENCE);
        Self { noise }
    }
}

impl FlowField for NoiseField {
    fn sample(&self, x: f32, y: f32, t: f32) -> f32 {
        let raw = self.noise.get([x as f64, y as f64, t as f64]) as f32;
        (raw * 0.5 + 0.5).clamp(0.0, BELOW_ONE)
    }
}

/// A field that returns the same value everywhere.
///
/// Useful for tests and for disabling noise steering.
#[derive(Debug, Clone, Copy)]
pub struct ConstantField(pub f32);

impl FlowField for ConstantField {
    #[inline]
    fn sample(&self, _x: f32, _y: f32, _t: f32) -> f32 {
        self.0.clamp(0.0, BELOW_ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_in_unit_range() {
        let field = NoiseField::new(7);
        for i in 0..500 {
            let f = i as f32 * 0.37;
            let v = field.sample(f, f * 1.3 + 2.0, f * 0.1);
            assert!((0.0..1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn test_noise_is_smooth() {
        let field = NoiseField::new(11);
        let step = 1e-3;
        for i in 0..100 {
            let x = i as f32 * 0.91 + 0.13;
            let a = field.sample(x, 3.7, 0.5);
            let b = field.sample(x + step, 3.7, 0.5);
            let c = field.sample(x, 3.7, 0.5 + step);
            assert!((a - b).abs() < 0.05);
            assert!((a - c).abs() < 0.05);
        }
    }

    #[test]
    fn test_noise_same_seed_same_values() {
        let a = NoiseField::new(3);
        let b = NoiseField::new(3);
        assert_eq!(a.sample(1.5, 2.5, 3.5), b.sample(1.5, 2.5, 3.5));
    }

    #[test]
    fn test_constant_field_clamps() {
        assert!(ConstantField(1.0).sample(0.0, 0.0, 0.0) < 1.0);
        assert_eq!(ConstantField(-2.0).sample(0.0, 0.0, 0.0), 0.0);
    }
}
