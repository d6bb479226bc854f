//! Spawn points and random helpers for (re)initialising agents.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::error::{Error, Result};
use crate::glyph::GlyphOutline;

/// Immutable, non-empty set of positions particles are born at.
#[derive(Debug, Clone)]
pub struct SpawnPointSet {
    points: Vec<Vec2>,
}

impl SpawnPointSet {
    /// Wrap a point cloud. Fails on an empty cloud, naming `text` as the
    /// source it came from.
    pub fn new(points: Vec<Vec2>, text: &str) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptySpawnSet {
                text: text.to_string(),
            });
        }
        Ok(Self { points })
    }

    /// Take the points of a sampled title outline.
    pub fn from_outline(outline: &GlyphOutline, text: &str) -> Result<Self> {
        Self::new(outline.points.clone(), text)
    }

    /// Uniformly random spawn point.
    #[inline]
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        self.points[rng.gen_range(0..self.points.len())]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.points.contains(&point)
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

/// Random unit vector, uniform in angle.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..TAU))
}

/// Random value in `[min, max)`; returns `min` when the range is empty.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty_set_is_an_error() {
        let result = SpawnPointSet::new(Vec::new(), "");
        assert!(matches!(result, Err(Error::EmptySpawnSet { .. })));
    }

    #[test]
    fn test_pick_returns_member() {
        let points = vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0)];
        let set = SpawnPointSet::new(points, "abc").unwrap();
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..50 {
            assert!(set.contains(set.pick(&mut rng)));
        }
    }

    #[test]
    fn test_random_direction_is_unit() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            assert!((random_direction(&mut rng).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_random_between_degenerate_range() {
        let mut rng = SmallRng::seed_from_u64(2);
        assert_eq!(random_between(&mut rng, 5.0, 5.0), 5.0);
        let v = random_between(&mut rng, 5.0, 30.0);
        assert!((5.0..30.0).contains(&v));
    }
}
