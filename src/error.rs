//! Error types for glyphdrift.
//!
//! Startup failures (font, spawn set, configuration, GPU) are fatal. Export
//! failures are recoverable: the caller logs them and keeps the frame loop
//! running.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up or running the animation.
#[derive(Debug, Error)]
pub enum Error {
    /// The font file could not be read.
    #[error("failed to read font '{}': {source}", path.display())]
    ResourceLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The font file was read but is not a usable TrueType/OpenType font.
    #[error("'{}' is not a valid font file", .0.display())]
    InvalidFont(PathBuf),

    /// Glyph sampling produced no spawn points for the title.
    #[error("title {text:?} produced no spawn points (empty text or missing glyphs)")]
    EmptySpawnSet { text: String },

    /// Configuration values are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration file could not be parsed.
    #[error("failed to parse config file '{}': {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Encoding or writing an exported image failed.
    #[error("export failed: {0}")]
    Export(#[from] image::ImageError),

    /// Filesystem failure outside font loading.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// GPU surface, adapter or device could not be created.
    #[error("GPU error: {0}")]
    Gpu(String),

    /// The window system failed.
    #[error("window error: {0}")]
    Window(String),
}

impl From<wgpu::CreateSurfaceError> for Error {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Error::Gpu(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for Error {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Error::Gpu(e.to_string())
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(e: winit::error::EventLoopError) -> Self {
        Error::Window(e.to_string())
    }
}

impl From<winit::error::OsError> for Error {
    fn from(e: winit::error::OsError) -> Self {
        Error::Window(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_spawn_set_message_names_text() {
        let err = Error::EmptySpawnSet {
            text: "CMTB25".into(),
        };
        assert!(err.to_string().contains("CMTB25"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
