//! Simulation state and the per-frame update.
//!
//! A [`Simulation`] owns every agent and both compositing buffers. Each call
//! to [`Simulation::step`] is one complete frame:
//!
//! 1. advance the clock and snapshot keyword positions
//! 2. clear the scene buffer and fade the trail buffer
//! 3. steer, integrate and draw every particle into the trail, respawning
//!    the ones whose lifetime ran out
//! 4. composite the trail into the scene
//! 5. draw the title, then update and draw every keyword in list order
//!
//! ```ignore
//! let glyphs = GlyphSampler::from_file("assets/font.ttf")?;
//! let mut sim = Simulation::new(Config::default(), &glyphs)?;
//! let frame = sim.step(1.0 / 60.0, None);
//! ```

use glam::Vec2;
use image::RgbaImage;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::compositor::Compositor;
use crate::config::Config;
use crate::error::Result;
use crate::field::{FlowField, NoiseField};
use crate::frame::FrameContext;
use crate::glyph::{GlyphSampler, Rect};
use crate::keyword::KeywordAgent;
use crate::particle::Particle;
use crate::spawn::SpawnPointSet;
use crate::time::SimulationClock;

/// Rendered title and where it sits in the buffer.
#[derive(Debug, Clone)]
pub struct TitleSprite {
    pub image: RgbaImage,
    pub rect: Rect,
}

impl TitleSprite {
    pub fn new(image: RgbaImage, rect: Rect) -> Self {
        Self { image, rect }
    }
}

/// The particle and keyword animation.
pub struct Simulation {
    config: Config,
    clock: SimulationClock,
    field: Box<dyn FlowField>,
    spawn: SpawnPointSet,
    title: TitleSprite,
    particles: Vec<Particle>,
    keywords: Vec<KeywordAgent>,
    /// Keyword positions as of the start of the current frame.
    targets: Vec<Vec2>,
    compositor: Compositor,
    rng: SmallRng,
    frame: u64,

    show_words: bool,
    show_title: bool,
    show_fps: bool,
}

impl Simulation {
    /// Build the full scene: sample the title outline into spawn points,
    /// render the title and every keyword sprite set, and spawn the
    /// particle pool.
    ///
    /// Fails when the configuration is invalid or the title yields no spawn
    /// points.
    pub fn new(config: Config, glyphs: &GlyphSampler) -> Result<Self> {
        config.validate()?;
        let mut rng = SmallRng::from_entropy();

        let outline = glyphs.sample(&config.title, config.txt_size, config.sample_spacing);
        let offset = outline.centering_offset(config.buffer_size());
        let outline = outline.translate(offset);
        let spawn = SpawnPointSet::from_outline(&outline, &config.title)?;
        log::info!(
            "Sampled {} spawn points from title {:?}",
            spawn.len(),
            config.title
        );

        let title = TitleSprite::new(
            glyphs.rasterize(&config.title, config.txt_size, 0.0),
            outline.bbox,
        );

        let keywords: Vec<KeywordAgent> = config
            .keywords
            .iter()
            .map(|label| KeywordAgent::render(label, glyphs, &config, &mut rng))
            .collect();
        log::info!(
            "Rendered {} keywords with {} blur levels each",
            keywords.len(),
            config.blur_levels.len()
        );

        Self::from_parts(config, spawn, title, keywords, rng)
    }

    /// Assemble a simulation from pre-built pieces. No font is needed, which
    /// makes this the entry point for tests and benchmarks.
    pub fn from_parts(
        config: Config,
        spawn: SpawnPointSet,
        title: TitleSprite,
        keywords: Vec<KeywordAgent>,
        mut rng: SmallRng,
    ) -> Result<Self> {
        config.validate()?;
        if keywords.is_empty() {
            log::warn!("No keywords configured; particles will only follow the flow field");
        }

        let targets: Vec<Vec2> = keywords.iter().map(target_of).collect();
        let particles: Vec<Particle> = (0..config.particle_count)
            .map(|_| Particle::spawn(&spawn, &targets, &config, &mut rng))
            .collect();
        let field = NoiseField::new(rng.gen());
        let compositor = Compositor::new(
            config.buffer_width,
            config.buffer_height,
            config.background_fade,
        );
        log::debug!(
            "Spawned {} particles into a {}x{} buffer",
            particles.len(),
            config.buffer_width,
            config.buffer_height
        );

        Ok(Self {
            clock: SimulationClock::new(config.time_increment),
            field: Box::new(field),
            spawn,
            title,
            particles,
            keywords,
            targets,
            compositor,
            rng,
            frame: 0,
            show_words: true,
            show_title: true,
            show_fps: true,
            config,
        })
    }

    /// Replace the flow field.
    pub fn with_field<F: FlowField + 'static>(mut self, field: F) -> Self {
        self.field = Box::new(field);
        self
    }

    /// Run one frame and return the composited scene.
    ///
    /// `dt` is the elapsed wall time in seconds, `pointer` the pointer
    /// position in buffer coordinates when it is over the drawn area.
    pub fn step(&mut self, dt: f32, pointer: Option<Vec2>) -> &RgbaImage {
        let dt = dt.max(0.0);
        let ctx = FrameContext::new(self.clock.advance(dt), dt, pointer);

        self.targets.clear();
        self.targets.extend(self.keywords.iter().map(target_of));

        let Self {
            config,
            field,
            spawn,
            particles,
            targets,
            compositor,
            rng,
            ..
        } = self;

        compositor.begin_frame();

        let mut respawned = 0usize;
        for particle in particles.iter_mut() {
            particle.follow_flow(&**field, &ctx, targets, config, rng);
            particle.integrate(ctx.dt, config);
            compositor.draw_particle(
                particle.position,
                particle.size(config),
                particle.color(ctx.pointer, config),
            );
            if particle.age(ctx.dt) {
                particle.reset(spawn, targets, config, rng);
                respawned += 1;
            }
        }
        if respawned > 0 {
            log::trace!("Frame {}: respawned {} particles", self.frame, respawned);
        }

        self.compositor.composite_trail();

        if self.show_title {
            self.compositor
                .draw_sprite(&self.title.image, self.title.rect.min());
        }

        if self.show_words {
            for keyword in &mut self.keywords {
                keyword.update(ctx.dt, &self.title.rect, &self.config);
                self.compositor.draw_sprite(keyword.sprite(), keyword.position);
            }
        }

        self.frame += 1;
        self.compositor.scene()
    }

    /// Flip keyword label visibility. Returns the new state.
    pub fn toggle_words(&mut self) -> bool {
        self.show_words = !self.show_words;
        log::info!("Keywords {}", on_off(self.show_words));
        self.show_words
    }

    /// Flip title visibility. Returns the new state.
    pub fn toggle_title(&mut self) -> bool {
        self.show_title = !self.show_title;
        log::info!("Title {}", on_off(self.show_title));
        self.show_title
    }

    /// Flip the FPS readout. Returns the new state.
    pub fn toggle_fps(&mut self) -> bool {
        self.show_fps = !self.show_fps;
        log::info!("FPS display {}", on_off(self.show_fps));
        self.show_fps
    }

    pub fn set_show_fps(&mut self, show: bool) {
        self.show_fps = show;
    }

    pub fn show_words(&self) -> bool {
        self.show_words
    }

    pub fn show_title(&self) -> bool {
        self.show_title
    }

    pub fn show_fps(&self) -> bool {
        self.show_fps
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn keywords(&self) -> &[KeywordAgent] {
        &self.keywords
    }

    pub fn spawn_points(&self) -> &SpawnPointSet {
        &self.spawn
    }

    pub fn title_rect(&self) -> Rect {
        self.title.rect
    }

    /// Current flow-field time offset.
    pub fn time(&self) -> f32 {
        self.clock.offset()
    }

    /// Frames completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The last composited frame.
    pub fn scene(&self) -> &RgbaImage {
        self.compositor.scene()
    }

    /// Buffer dimensions in pixels.
    pub fn buffer_size(&self) -> Vec2 {
        self.config.buffer_size()
    }
}

/// Point particles steer toward for a keyword: the sprite's top-left corner.
fn target_of(keyword: &KeywordAgent) -> Vec2 {
    keyword.position
}

fn on_off(state: bool) -> &'static str {
    if state {
        "on"
    } else {
        "off"
    }
}
