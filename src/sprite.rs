//! Pre-blurred sprite variants of a keyword label.
//!
//! Each label is rendered once, then blurred once per configured level. At
//! draw time the keyword's depth picks a variant by index; nothing is
//! re-rendered per frame.

use image::{imageops, RgbaImage};

/// Blur variants of one label, ordered like the configured blur levels.
#[derive(Debug, Clone)]
pub struct SpriteCache {
    sprites: Vec<RgbaImage>,
}

impl SpriteCache {
    /// Blur `base` once per level. A level of zero keeps the sharp image.
    ///
    /// `base` must already carry enough transparent padding for the largest
    /// blur, otherwise blurred edges are clipped.
    pub fn from_base(base: &RgbaImage, blur_levels: &[f32]) -> Self {
        let sprites = blur_levels
            .iter()
            .map(|&radius| {
                if radius > 0.0 {
                    imageops::blur(base, radius)
                } else {
                    base.clone()
                }
            })
            .collect();
        Self { sprites }
    }

    /// Number of variants.
    #[inline]
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Variant at `index`, clamped to the valid range.
    pub fn get(&self, index: usize) -> &RgbaImage {
        &self.sprites[index.min(self.sprites.len() - 1)]
    }

    /// Width and height shared by every variant.
    pub fn size(&self) -> (u32, u32) {
        self.sprites[0].dimensions()
    }

    /// Map a depth in `[z_min, z_max]` to a variant index: `z_min` selects
    /// the last (sharpest) variant, `z_max` the first (blurriest).
    pub fn index_for_depth(depth: f32, z_min: f32, z_max: f32, levels: usize) -> usize {
        if levels <= 1 {
            return 0;
        }
        let last = (levels - 1) as f32;
        let normalized = (depth - z_min) / (z_max - z_min);
        let index = ((1.0 - normalized) * last).floor();
        if index.is_nan() {
            return 0;
        }
        index.clamp(0.0, last) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn dot_image() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(21, 21, Rgba([255, 255, 255, 0]));
        img.put_pixel(10, 10, Rgba([255, 255, 255, 255]));
        img
    }

    #[test]
    fn test_one_variant_per_level() {
        let cache = SpriteCache::from_base(&dot_image(), &[3.0, 2.0, 1.0, 0.0]);
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.size(), (21, 21));
        for i in 0..4 {
            assert_eq!(cache.get(i).dimensions(), (21, 21));
        }
    }

    #[test]
    fn test_zero_level_is_sharp_and_blur_spreads() {
        let base = dot_image();
        let cache = SpriteCache::from_base(&base, &[2.0, 0.0]);
        assert_eq!(cache.get(1), &base);
        let blurred = cache.get(0);
        assert!(blurred.get_pixel(10, 10)[3] < 255);
        assert!(blurred.get_pixel(12, 10)[3] > 0);
    }

    #[test]
    fn test_get_clamps_index() {
        let cache = SpriteCache::from_base(&dot_image(), &[1.0, 0.0]);
        assert!(std::ptr::eq(cache.get(7), cache.get(1)));
    }

    #[test]
    fn test_depth_to_index() {
        assert_eq!(SpriteCache::index_for_depth(-50.0, -50.0, 50.0, 4), 3);
        assert_eq!(SpriteCache::index_for_depth(50.0, -50.0, 50.0, 4), 0);
        assert_eq!(SpriteCache::index_for_depth(0.0, -50.0, 50.0, 4), 1);
        assert_eq!(SpriteCache::index_for_depth(-49.0, -50.0, 50.0, 4), 2);
        assert_eq!(SpriteCache::index_for_depth(500.0, -50.0, 50.0, 4), 0);
        assert_eq!(SpriteCache::index_for_depth(-500.0, -50.0, 50.0, 4), 3);
        assert_eq!(SpriteCache::index_for_depth(10.0, -50.0, 50.0, 1), 0);
    }
}
