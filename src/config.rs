//! Animation configuration.
//!
//! Every size, force and speed scales with the output resolution. Build a
//! [`Config`] once with [`Config::for_resolution`], adjust it with the
//! `with_*` methods or a JSON overlay, and pass it by reference into every
//! constructor.
//!
//! ```ignore
//! let config = Config::for_resolution(1280, 720)
//!     .with_particle_count(2_000)
//!     .with_title("HELLO");
//! config.validate()?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Title drawn in the centre of the buffer and used for spawn points.
pub const DEFAULT_TITLE: &str = "CMTB25";

/// Buffer size used when none is given.
pub const DEFAULT_WIDTH: u32 = 1920;
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Keyword vocabulary the labels are created from.
pub const DEFAULT_KEYWORDS: [&str; 19] = [
    "AI",
    "VR",
    "Ethics",
    "Data",
    "Health",
    "Social Media",
    "Privacy",
    "E-learning",
    "Robotics",
    "Blockchain",
    "Quantum Computing",
    "Cybersecurity",
    "Machine Learning",
    "Big Data",
    "Cloud Computing",
    "Augmented Reality",
    "Internet of Things",
    "5G",
    "Biotechnology",
];

/// All tunable parameters of the animation.
///
/// Distances are in buffer pixels, speeds in pixels per second and forces in
/// pixels per second squared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub buffer_width: u32,
    pub buffer_height: u32,

    /// Title font size.
    pub txt_size: f32,
    /// Keyword label font size.
    pub keyword_size: f32,

    pub noise_scale: f32,
    pub noise_force_magnitude: f32,
    pub keyword_attraction_force: f32,
    pub max_speed: f32,
    pub initial_speed: f32,
    pub particle_size_min: f32,
    pub particle_size_max: f32,
    /// Alpha of each particle mark in the trail buffer.
    pub particle_alpha: u8,
    /// A particle closer than this to its target picks a new one.
    pub distance_threshold: f32,
    pub mouse_repulsion_force: f32,
    pub mouse_repulsion_radius: f32,

    pub keyword_drift_speed: f32,
    /// Largest absolute depth rate a keyword can be given, depth units per second.
    pub keyword_depth_speed: f32,
    pub keyword_repulsion_force: f32,
    pub keyword_repulsion_radius_multiplier: f32,
    /// Lower clamp on the keyword-to-title distance in the inverse-square term.
    pub keyword_repulsion_min_distance: f32,
    /// Transparent margin around keyword sprites; must cover the widest blur.
    pub keyword_padding: f32,

    /// Seconds.
    pub lifetime_min: f32,
    /// Seconds.
    pub lifetime_max: f32,
    /// Rate multiplier applied to elapsed time before it feeds the noise field.
    pub time_increment: f32,
    /// Alpha (0-255) of the black rectangle that fades the trail buffer each frame.
    pub background_fade: u8,

    pub particle_count: usize,
    /// Path units between consecutive spawn samples along the glyph outlines.
    pub sample_spacing: f32,
    /// Blur radii of the keyword sprite variants, blurriest first.
    pub blur_levels: Vec<f32>,
    pub z_min: f32,
    pub z_max: f32,

    pub title: String,
    pub keywords: Vec<String>,

    /// Upper bound on a single frame's elapsed time, seconds.
    pub max_frame_delta: f32,
    /// Frame rate written into GIF captures.
    pub capture_fps: u32,
}

impl Config {
    /// Derive every parameter from the output resolution.
    pub fn for_resolution(width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Self {
            buffer_width: width,
            buffer_height: height,
            txt_size: h * 0.3,
            keyword_size: h * 0.05,
            noise_scale: w * 0.05,
            noise_force_magnitude: w * 0.1,
            keyword_attraction_force: w * 0.05,
            max_speed: w * 0.01,
            initial_speed: w * 0.005,
            particle_size_min: w * 0.01,
            particle_size_max: w * 0.05,
            particle_alpha: 64,
            distance_threshold: w * 0.005,
            mouse_repulsion_force: w * 0.5,
            mouse_repulsion_radius: w * 0.05,
            keyword_drift_speed: w * 0.005,
            keyword_depth_speed: 5.0,
            keyword_repulsion_force: w * 0.1,
            keyword_repulsion_radius_multiplier: 1.5,
            keyword_repulsion_min_distance: 1.0,
            keyword_padding: w * 0.05,
            lifetime_min: 5.0,
            lifetime_max: 30.0,
            time_increment: 1.0,
            background_fade: 4,
            particle_count: 5000,
            sample_spacing: 1.0,
            blur_levels: vec![3.0, 2.0, 1.0, 0.0],
            z_min: -50.0,
            z_max: 50.0,
            title: DEFAULT_TITLE.to_string(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            max_frame_delta: 0.25,
            capture_fps: 30,
        }
    }

    /// Load a JSON file. Fields it omits take the defaults derived from the
    /// buffer size the file names (1920x1080 when it names none).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_file_sized(path, None, None)
    }

    /// Like [`Config::from_json_file`], but `width` and `height` take
    /// precedence over the buffer size in the file.
    pub fn from_json_file_sized<P: AsRef<Path>>(
        path: P,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::overlay_json(&text, width, height).map_err(|source| Error::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a JSON object laid over the resolution-derived defaults.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        Self::overlay_json(text, None, None)
    }

    fn overlay_json(
        text: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> serde_json::Result<Self> {
        let mut fields: Map<String, Value> = serde_json::from_str(text)?;

        // A malformed size stays in `fields` so deserialization reports it.
        let mut resolve = |key: &str, given: Option<u32>, fallback: u32| {
            let in_file = fields
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok());
            if given.is_some() || in_file.is_some() {
                fields.remove(key);
            }
            given.or(in_file).unwrap_or(fallback)
        };
        let width = resolve("buffer_width", width, DEFAULT_WIDTH);
        let height = resolve("buffer_height", height, DEFAULT_HEIGHT);

        let mut merged = serde_json::to_value(Self::for_resolution(width, height))?;
        if let Value::Object(defaults) = &mut merged {
            defaults.extend(fields);
        }
        serde_json::from_value(merged)
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the title string.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replace the keyword vocabulary.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the blur radii of the keyword sprites.
    pub fn with_blur_levels(mut self, levels: Vec<f32>) -> Self {
        self.blur_levels = levels;
        self
    }

    /// Set the elapsed-time rate multiplier.
    pub fn with_time_increment(mut self, rate: f32) -> Self {
        self.time_increment = rate;
        self
    }

    /// Buffer dimensions as floats.
    #[inline]
    pub fn buffer_size(&self) -> glam::Vec2 {
        glam::Vec2::new(self.buffer_width as f32, self.buffer_height as f32)
    }

    /// Check the invariants the simulation relies on.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(Error::Config(msg.to_string()));

        if self.buffer_width == 0 || self.buffer_height == 0 {
            return fail("buffer dimensions must be non-zero");
        }
        if self.particle_count == 0 {
            return fail("particle_count must be at least 1");
        }
        if !(self.lifetime_min > 0.0) || self.lifetime_min > self.lifetime_max {
            return fail("lifetimes must satisfy 0 < lifetime_min <= lifetime_max");
        }
        if self.z_min >= self.z_max {
            return fail("z_min must be below z_max");
        }
        if self.blur_levels.is_empty() {
            return fail("blur_levels must contain at least one level");
        }
        if self.blur_levels.iter().any(|b| *b < 0.0 || !b.is_finite()) {
            return fail("blur levels must be finite and non-negative");
        }
        if !(self.sample_spacing > 0.0) {
            return fail("sample_spacing must be positive");
        }
        if self.max_speed < 0.0 || self.initial_speed < 0.0 {
            return fail("speeds must be non-negative");
        }
        if !(self.keyword_repulsion_min_distance > 0.0) {
            return fail("keyword_repulsion_min_distance must be positive");
        }
        if self.capture_fps == 0 {
            return fail("capture_fps must be at least 1");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_resolution(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}
