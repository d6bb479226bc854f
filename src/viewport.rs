//! Aspect-preserving placement of the buffer on the output surface.

use glam::Vec2;

/// Where the buffer lands on the surface: uniformly scaled, centred, with
/// black bars on the two sides that do not fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    /// Top-left corner of the drawn area on the surface.
    pub offset: Vec2,
    /// Size of the drawn area on the surface.
    pub size: Vec2,
}

impl Letterbox {
    /// Fit a buffer of `buffer` size into a surface of `surface` size.
    pub fn fit(buffer: Vec2, surface: Vec2) -> Self {
        let scale = (surface.x / buffer.x).min(surface.y / buffer.y);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        let size = buffer * scale;
        let offset = (surface - size) / 2.0;
        Self {
            scale,
            offset,
            size,
        }
    }

    /// Whether a surface point falls on the drawn area (edges inclusive).
    pub fn contains(&self, surface_point: Vec2) -> bool {
        let max = self.offset + self.size;
        surface_point.x >= self.offset.x
            && surface_point.x <= max.x
            && surface_point.y >= self.offset.y
            && surface_point.y <= max.y
    }

    /// Translate a surface point into buffer coordinates, or `None` when it
    /// lies on a bar or outside the surface.
    pub fn to_buffer(&self, surface_point: Vec2) -> Option<Vec2> {
        self.contains(surface_point)
            .then(|| (surface_point - self.offset) / self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_aspect_fills_surface() {
        let lb = Letterbox::fit(Vec2::new(1920.0, 1080.0), Vec2::new(960.0, 540.0));
        assert_eq!(lb.scale, 0.5);
        assert_eq!(lb.offset, Vec2::ZERO);
        assert_eq!(lb.size, Vec2::new(960.0, 540.0));
    }

    #[test]
    fn test_tall_surface_gets_horizontal_bars() {
        let lb = Letterbox::fit(Vec2::new(200.0, 100.0), Vec2::new(200.0, 200.0));
        assert_eq!(lb.scale, 1.0);
        assert_eq!(lb.offset, Vec2::new(0.0, 50.0));
    }

    #[test]
    fn test_wide_surface_gets_vertical_bars() {
        let lb = Letterbox::fit(Vec2::new(100.0, 100.0), Vec2::new(400.0, 200.0));
        assert_eq!(lb.scale, 2.0);
        assert_eq!(lb.offset, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_pointer_mapping() {
        let lb = Letterbox::fit(Vec2::new(100.0, 100.0), Vec2::new(400.0, 200.0));
        assert_eq!(lb.to_buffer(Vec2::new(200.0, 100.0)), Some(Vec2::new(50.0, 50.0)));
        assert_eq!(lb.to_buffer(Vec2::new(50.0, 100.0)), None);
        assert_eq!(lb.to_buffer(Vec2::new(300.0, 200.0)), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_zero_surface_does_not_divide_by_zero() {
        let lb = Letterbox::fit(Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert!(lb.scale.is_finite());
    }
}
