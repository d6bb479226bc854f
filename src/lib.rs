//! # glyphdrift
//!
//! Generative particle typography. Thousands of particles stream off the
//! outline of a title string, steered by a flow field toward a set of
//! drifting keyword labels, and leave slowly fading trails behind them.
//! The keywords float above the trails with a blur that follows their
//! simulated depth.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glyphdrift::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let glyphs = GlyphSampler::from_file("assets/font.ttf")?;
//!     let config = Config::for_resolution(1920, 1080).with_particle_count(3_000);
//!     let simulation = Simulation::new(config, &glyphs)?;
//!     run(simulation, RunOptions::default())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! A fixed pool of [`Particle`]s. Each frame a particle sums three forces:
//! a flow-field steering force, a constant-magnitude pull toward a snapshot
//! of one keyword's position, and a push away from the pointer. It then
//! integrates, wraps around the buffer edges and paints one disc into the
//! trail buffer. When its lifetime runs out it is re-initialised in place
//! at a random point of the title outline.
//!
//! ### Keywords
//!
//! A [`KeywordAgent`] per configured label. Keywords drift, bounce off the
//! buffer edges, are pushed away from the title and move through a depth
//! range that wraps around. The depth picks one of the label's pre-blurred
//! sprites from its [`SpriteCache`].
//!
//! ### Compositing
//!
//! The [`Compositor`] keeps two buffers. The trail buffer is faded a little
//! each frame and never cleared, so particle marks leave trails. The scene
//! buffer is cleared every frame, receives the trail, then the title and
//! keyword sprites. [`Letterbox`] fits the scene onto the window.
//!
//! ## Controls
//!
//! | key | action |
//! |-----|--------|
//! | W   | toggle keywords |
//! | T   | toggle title |
//! | F   | toggle FPS in the window title |
//! | S   | save a JPEG still |
//! | G   | start/stop GIF recording |
//! | Esc | quit |

pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod field;
pub mod frame;
pub mod glyph;
mod gpu;
pub mod input;
pub mod keyword;
pub mod particle;
pub mod simulation;
pub mod spawn;
pub mod sprite;
pub mod time;
pub mod viewport;
pub mod window;

pub use compositor::Compositor;
pub use config::Config;
pub use error::{Error, Result};
pub use field::{ConstantField, FlowField, NoiseField};
pub use glam::{Vec2, Vec3};
pub use glyph::{GlyphOutline, GlyphSampler, Rect};
pub use input::{Command, Input};
pub use keyword::KeywordAgent;
pub use particle::Particle;
pub use simulation::{Simulation, TitleSprite};
pub use spawn::SpawnPointSet;
pub use sprite::SpriteCache;
pub use viewport::Letterbox;
pub use window::{run, RunOptions};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glyphdrift::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, DEFAULT_KEYWORDS, DEFAULT_TITLE};
    pub use crate::error::{Error, Result};
    pub use crate::field::{ConstantField, FlowField, NoiseField};
    pub use crate::glyph::{GlyphSampler, Rect};
    pub use crate::keyword::KeywordAgent;
    pub use crate::particle::Particle;
    pub use crate::simulation::{Simulation, TitleSprite};
    pub use crate::spawn::SpawnPointSet;
    pub use crate::sprite::SpriteCache;
    pub use crate::window::{run, RunOptions};
    pub use crate::{Vec2, Vec3};
}
