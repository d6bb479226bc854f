//! Floating keyword labels.
//!
//! Keywords drift in a straight line, bounce elastically off the buffer
//! edges, get pushed away from the title and move through a simulated depth
//! that selects one of their pre-blurred sprites.

use glam::{Vec2, Vec3};
use image::RgbaImage;
use rand::Rng;

use crate::config::Config;
use crate::glyph::{GlyphSampler, Rect};
use crate::spawn::{random_between, random_direction};
use crate::sprite::SpriteCache;

/// A drifting keyword label.
#[derive(Debug, Clone)]
pub struct KeywordAgent {
    label: String,
    /// Top-left corner of the sprite in buffer coordinates.
    pub position: Vec2,
    /// Drift in x/y plus depth rate in z.
    pub velocity: Vec3,
    pub depth: f32,
    sprites: SpriteCache,
    current_sprite: usize,
}

impl KeywordAgent {
    /// Place a keyword at a random position, heading and depth.
    pub fn new<R: Rng + ?Sized>(
        label: impl Into<String>,
        sprites: SpriteCache,
        config: &Config,
        rng: &mut R,
    ) -> Self {
        let size = config.buffer_size();
        let margin = config.keyword_size;
        let position = Vec2::new(
            random_between(rng, margin, size.x - margin),
            random_between(rng, margin, size.y - margin),
        );
        let drift = random_direction(rng) * config.keyword_drift_speed;
        let depth_rate = random_between(rng, -config.keyword_depth_speed, config.keyword_depth_speed);
        let depth = random_between(rng, config.z_min, config.z_max);

        let mut agent = Self {
            label: label.into(),
            position,
            velocity: drift.extend(depth_rate),
            depth,
            sprites,
            current_sprite: 0,
        };
        agent.update_sprite_index(config);
        agent
    }

    /// Render the label and build its blur variants. This is the expensive
    /// part of setup.
    pub fn render<R: Rng + ?Sized>(
        label: &str,
        glyphs: &GlyphSampler,
        config: &Config,
        rng: &mut R,
    ) -> Self {
        let base = glyphs.rasterize(label, config.keyword_size, config.keyword_padding);
        let sprites = SpriteCache::from_base(&base, &config.blur_levels);
        Self::new(label, sprites, config, rng)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Advance one frame: drift, bounce, title repulsion, depth, sprite.
    pub fn update(&mut self, dt: f32, title: &Rect, config: &Config) {
        self.position += self.velocity.truncate() * dt;
        self.bounce(config.buffer_size());
        self.repel_from(title, config);

        self.depth += self.velocity.z * dt;
        if self.depth < config.z_min {
            self.depth = config.z_max;
        }
        if self.depth > config.z_max {
            self.depth = config.z_min;
        }
        self.update_sprite_index(config);
    }

    /// Keep the sprite box inside `[0, size]`, reflecting the velocity
    /// component of every edge it touched.
    pub fn bounce(&mut self, size: Vec2) {
        let (w, h) = self.sprite_size();

        if self.position.x < 0.0 {
            self.position.x = 0.0;
            self.velocity.x = -self.velocity.x;
        } else if self.position.x + w > size.x {
            self.position.x = size.x - w;
            self.velocity.x = -self.velocity.x;
        }

        if self.position.y < 0.0 {
            self.position.y = 0.0;
            self.velocity.y = -self.velocity.y;
        } else if self.position.y + h > size.y {
            self.position.y = size.y - h;
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Inverse-square push away from the title, added straight to velocity.
    ///
    /// The distance is clamped to `keyword_repulsion_min_distance` so a
    /// keyword centred on the title gets a large but finite kick.
    pub fn repel_from(&mut self, title: &Rect, config: &Config) {
        let (w, _) = self.sprite_size();
        let away = self.sprite_rect().center() - title.center();
        let distance = away.length();
        let reach = (w + title.w) / 2.0 * config.keyword_repulsion_radius_multiplier;

        if distance < reach {
            let clamped = distance.max(config.keyword_repulsion_min_distance);
            let strength = config.keyword_repulsion_force / (clamped * clamped);
            let direction = away.try_normalize().unwrap_or(Vec2::NEG_Y);
            self.velocity += (direction * strength).extend(0.0);
        }
    }

    fn update_sprite_index(&mut self, config: &Config) {
        self.current_sprite =
            SpriteCache::index_for_depth(self.depth, config.z_min, config.z_max, self.sprites.len());
    }

    /// Index of the sprite variant for the current depth.
    #[inline]
    pub fn sprite_index(&self) -> usize {
        self.current_sprite
    }

    /// Sprite variant for the current depth.
    #[inline]
    pub fn sprite(&self) -> &RgbaImage {
        self.sprites.get(self.current_sprite)
    }

    pub fn sprites(&self) -> &SpriteCache {
        &self.sprites
    }

    fn sprite_size(&self) -> (f32, f32) {
        let (w, h) = self.sprites.size();
        (w as f32, h as f32)
    }

    /// Bounding box of the sprite in buffer coordinates.
    pub fn sprite_rect(&self) -> Rect {
        let (w, h) = self.sprite_size();
        Rect::new(self.position.x, self.position.y, w, h)
    }
}
