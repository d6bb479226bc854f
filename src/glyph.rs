//! Glyph geometry: outline point clouds, text bounds and label rasterization.
//!
//! The title is sampled once into a point cloud that seeds particle spawns.
//! Keyword labels are rasterized once into the base image of their sprite
//! cache. Both use the same loaded font.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, OutlineBuilder, PositionedGlyph, Scale};

use crate::error::{Error, Result};

/// Axis-aligned rectangle, top-left origin, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Self {
        let min = self.min().min(other.min());
        let max = (self.min() + self.size()).max(other.min() + other.size());
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// Points traced along a string's glyph outlines, with its bounding box.
#[derive(Debug, Clone, Default)]
pub struct GlyphOutline {
    pub points: Vec<Vec2>,
    pub bbox: Rect,
}

impl GlyphOutline {
    /// Shift points and box together.
    pub fn translate(mut self, offset: Vec2) -> Self {
        for p in &mut self.points {
            *p += offset;
        }
        self.bbox = self.bbox.translate(offset);
        self
    }

    /// Offset that moves the box centre onto the centre of an area of the
    /// given size.
    pub fn centering_offset(&self, area: Vec2) -> Vec2 {
        area / 2.0 - self.bbox.center()
    }
}

/// Samples and rasterizes text with one loaded font.
pub struct GlyphSampler {
    font: Font<'static>,
}

impl GlyphSampler {
    /// Load a TrueType/OpenType font from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::ResourceLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::try_from_vec(data).ok_or_else(|| Error::InvalidFont(path.to_path_buf()))?;
        Ok(Self { font })
    }

    /// Use font bytes already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font =
            Font::try_from_vec(data).ok_or_else(|| Error::InvalidFont(PathBuf::from("<memory>")))?;
        Ok(Self { font })
    }

    fn layout(&self, text: &str, size: f32) -> Vec<PositionedGlyph<'_>> {
        self.font
            .layout(text, Scale::uniform(size), point(0.0, 0.0))
            .collect()
    }

    /// Tight pixel bounds of `text` at `size`, relative to a baseline origin
    /// at (0, 0). Text without visible glyphs yields an empty rectangle.
    pub fn measure(&self, text: &str, size: f32) -> Rect {
        bounds_of(&self.layout(text, size))
    }

    /// Trace the outlines of `text` at `size`, one point roughly every
    /// `density` path units. Coordinates are relative to a baseline origin
    /// at (0, 0). Hole contours are traced like any other contour.
    pub fn sample(&self, text: &str, size: f32, density: f32) -> GlyphOutline {
        let glyphs = self.layout(text, size);
        let mut sampler = PathSampler::new(density.max(f32::EPSILON));
        for glyph in &glyphs {
            let pos = glyph.position();
            sampler.offset = Vec2::new(pos.x, pos.y);
            glyph.unpositioned().build_outline(&mut sampler);
        }
        GlyphOutline {
            points: sampler.points,
            bbox: bounds_of(&glyphs),
        }
    }

    /// Render `text` in white onto a transparent image, with `padding`
    /// pixels of empty margin on every side.
    pub fn rasterize(&self, text: &str, size: f32, padding: f32) -> RgbaImage {
        let glyphs = self.layout(text, size);
        let bounds = bounds_of(&glyphs);
        let padding = padding.max(0.0);
        let width = (bounds.w + padding * 2.0).ceil().max(1.0) as u32;
        let height = (bounds.h + padding * 2.0).ceil().max(1.0) as u32;
        let origin_x = (padding - bounds.x).round() as i32;
        let origin_y = (padding - bounds.y).round() as i32;

        let mut image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]));
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = origin_x + bb.min.x + gx as i32;
                let py = origin_y + bb.min.y + gy as i32;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                let pixel = image.get_pixel_mut(px as u32, py as u32);
                pixel[3] = pixel[3].max(alpha);
            });
        }
        image
    }
}

fn bounds_of(glyphs: &[PositionedGlyph<'_>]) -> Rect {
    glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .map(|bb| {
            Rect::new(
                bb.min.x as f32,
                bb.min.y as f32,
                (bb.max.x - bb.min.x) as f32,
                (bb.max.y - bb.min.y) as f32,
            )
        })
        .reduce(|a, b| a.union(&b))
        .unwrap_or_default()
}

/// Walks outline contours and drops a point every `spacing` units of arc
/// length. Curves are flattened into short line segments first.
struct PathSampler {
    spacing: f32,
    offset: Vec2,
    points: Vec<Vec2>,
    current: Vec2,
    start: Vec2,
    /// Arc length travelled since the last emitted point.
    carry: f32,
}

impl PathSampler {
    const MIN_CURVE_STEPS: usize = 4;
    const MAX_CURVE_STEPS: usize = 64;

    fn new(spacing: f32) -> Self {
        Self {
            spacing,
            offset: Vec2::ZERO,
            points: Vec::new(),
            current: Vec2::ZERO,
            start: Vec2::ZERO,
            carry: 0.0,
        }
    }

    fn segment_to(&mut self, to: Vec2) {
        let from = self.current;
        let length = from.distance(to);
        if length > 0.0 {
            let dir = (to - from) / length;
            let mut along = self.spacing - self.carry;
            while along <= length {
                self.points.push(from + dir * along);
                along += self.spacing;
            }
            self.carry = length - (along - self.spacing);
        }
        self.current = to;
    }

    fn curve_steps(&self, control_length: f32) -> usize {
        ((control_length / self.spacing).ceil() as usize)
            .clamp(Self::MIN_CURVE_STEPS, Self::MAX_CURVE_STEPS)
    }
}

impl OutlineBuilder for PathSampler {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y) + self.offset;
        self.current = p;
        self.start = p;
        self.carry = 0.0;
        self.points.push(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.segment_to(Vec2::new(x, y) + self.offset);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p0 = self.current;
        let p1 = Vec2::new(x1, y1) + self.offset;
        let p2 = Vec2::new(x, y) + self.offset;
        let steps = self.curve_steps(p0.distance(p1) + p1.distance(p2));
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let u = 1.0 - t;
            self.segment_to(p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p0 = self.current;
        let p1 = Vec2::new(x1, y1) + self.offset;
        let p2 = Vec2::new(x2, y2) + self.offset;
        let p3 = Vec2::new(x, y) + self.offset;
        let steps = self.curve_steps(p0.distance(p1) + p1.distance(p2) + p2.distance(p3));
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let u = 1.0 - t;
            self.segment_to(
                p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t),
            );
        }
    }

    fn close(&mut self) {
        let start = self.start;
        self.segment_to(start);
    }
}
