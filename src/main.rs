//! Command-line entry point for glyphdrift.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use glyphdrift::config::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use glyphdrift::{run, Config, GlyphSampler, RunOptions, Simulation};

#[derive(Parser)]
#[command(name = "glyphdrift")]
#[command(about = "Particles streaming off title glyphs toward drifting keywords", long_about = None)]
#[command(version)]
struct Cli {
    /// TrueType/OpenType font used for the title and keywords
    #[arg(long)]
    font: PathBuf,

    /// JSON file overriding configuration fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Buffer width in pixels (resolution-derived defaults follow it)
    #[arg(long)]
    width: Option<u32>,

    /// Buffer height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Number of particles
    #[arg(long)]
    particles: Option<usize>,

    /// Title text particles spawn from
    #[arg(long)]
    title: Option<String>,

    /// Keyword label; repeat to replace the default vocabulary
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// Directory for stills and recordings
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file_sized(path, self.width, self.height)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::for_resolution(
                self.width.unwrap_or(DEFAULT_WIDTH),
                self.height.unwrap_or(DEFAULT_HEIGHT),
            ),
        };

        if let Some(count) = self.particles {
            config = config.with_particle_count(count);
        }
        if let Some(title) = &self.title {
            config = config.with_title(title.clone());
        }
        if !self.keywords.is_empty() {
            config = config.with_keywords(self.keywords.iter().cloned());
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = cli.build_config()?;
    log::info!(
        "Buffer {}x{}, {} particles, {} keywords",
        config.buffer_width,
        config.buffer_height,
        config.particle_count,
        config.keywords.len()
    );

    let glyphs = GlyphSampler::from_file(&cli.font)?;
    let simulation = Simulation::new(config, &glyphs).context("building the scene")?;

    let options = RunOptions {
        output_dir: cli.output_dir,
        ..RunOptions::default()
    };
    run(simulation, options)?;
    Ok(())
}
