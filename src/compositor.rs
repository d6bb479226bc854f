//! Two-layer frame compositing.
//!
//! The trail buffer is never cleared. Each frame it is darkened by a
//! low-alpha black fill, so particle marks fade out over many frames. The
//! scene buffer is cleared every frame, receives the trail buffer, then the
//! title and keyword sprites on top.
//!
//! Frame order:
//! 1. [`Compositor::begin_frame`]: clear scene, fade trail
//! 2. [`Compositor::draw_particle`] for every particle
//! 3. [`Compositor::composite_trail`]
//! 4. [`Compositor::draw_sprite`] for the title and each visible keyword
//! 5. [`Compositor::scene`] is the finished frame

use glam::Vec2;
use image::{imageops, Rgba, RgbaImage};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Owns the trail and scene buffers.
pub struct Compositor {
    trail: RgbaImage,
    scene: RgbaImage,
    /// Fraction of each trail channel kept per frame, out of 255.
    keep: u16,
}

impl Compositor {
    /// Create both buffers, black. `background_fade` is the alpha (0-255) of
    /// the darkening fill applied to the trail each frame.
    pub fn new(width: u32, height: u32, background_fade: u8) -> Self {
        Self {
            trail: RgbaImage::from_pixel(width, height, BLACK),
            scene: RgbaImage::from_pixel(width, height, BLACK),
            keep: 255 - background_fade as u16,
        }
    }

    /// Clear the scene to black and fade the trail toward black.
    pub fn begin_frame(&mut self) {
        for pixel in self.scene.pixels_mut() {
            *pixel = BLACK;
        }

        if self.keep == 255 {
            return;
        }
        let keep = self.keep;
        for pixel in self.trail.pixels_mut() {
            for c in &mut pixel.0[..3] {
                // Floor so dim pixels keep decaying instead of sticking.
                *c = ((*c as u16 * keep) / 255) as u8;
            }
        }
    }

    /// Blend a filled disc of the given diameter into the trail buffer.
    pub fn draw_particle(&mut self, center: Vec2, diameter: f32, color: Rgba<u8>) {
        let radius = (diameter / 2.0).max(0.5);
        let (w, h) = self.trail.dimensions();
        let x0 = (center.x - radius).floor().max(0.0) as u32;
        let y0 = (center.y - radius).floor().max(0.0) as u32;
        let x1 = ((center.x + radius).ceil().max(0.0) as u32).min(w);
        let y1 = ((center.y + radius).ceil().max(0.0) as u32).min(h);
        let r2 = radius * radius;

        for y in y0..y1 {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= r2 {
                    blend_over(self.trail.get_pixel_mut(x, y), color);
                }
            }
        }
    }

    /// Put the trail buffer under everything drawn after it this frame.
    pub fn composite_trail(&mut self) {
        // The trail is fully opaque, so compositing it over black is a copy.
        self.scene.copy_from_slice(self.trail.as_raw());
    }

    /// Alpha-composite an image onto the scene with its top-left corner at
    /// `top_left`. Parts outside the buffer are clipped.
    pub fn draw_sprite(&mut self, sprite: &RgbaImage, top_left: Vec2) {
        imageops::overlay(
            &mut self.scene,
            sprite,
            top_left.x.round() as i64,
            top_left.y.round() as i64,
        );
    }

    /// The finished frame.
    pub fn scene(&self) -> &RgbaImage {
        &self.scene
    }

    /// The persistent particle layer.
    pub fn trail(&self) -> &RgbaImage {
        &self.trail
    }
}

/// Source-over blend of `src` onto an opaque destination pixel.
#[inline]
fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let a = src[3] as u16;
    let inv = 255 - a;
    for i in 0..3 {
        dst[i] = ((src[i] as u16 * a + dst[i] as u16 * inv + 127) / 255) as u8;
    }
}
