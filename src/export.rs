//! Still-image export and animated GIF capture.
//!
//! Both exports are named after the local time they were started, e.g.
//! `Tag_20251018T142501123.jpg` and `Recording_20251018T142733042.gif`.
//!
//! GIF encoding is slow, so a [`GifRecorder`] hands frames to a background
//! thread over a bounded channel. When the encoder falls behind, frames are
//! dropped rather than stalling the animation.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use chrono::Local;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat, RgbaImage};

use crate::error::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3f";

/// Frames that may wait for the encoder before new ones are dropped.
const QUEUE_DEPTH: usize = 8;

/// Local time formatted for export file names.
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn stamped_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    dir.join(format!("{prefix}_{}.{extension}", timestamp()))
}

/// Write `image` as a JPEG into `dir`, creating the directory if needed.
/// Returns the path written.
pub fn save_still(image: &RgbaImage, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = stamped_path(dir, "Tag", "jpg");
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
    rgb.save_with_format(&path, ImageFormat::Jpeg)?;
    log::info!("Saved still to {}", path.display());
    Ok(path)
}

/// Result of a finished recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSummary {
    pub path: PathBuf,
    pub frames: u64,
}

/// An in-progress GIF capture.
pub struct GifRecorder {
    sender: SyncSender<RgbaImage>,
    worker: JoinHandle<Result<RecordingSummary>>,
    path: PathBuf,
    /// Seconds between captured frames.
    interval: f32,
    /// Time accumulated toward the next capture.
    pending: f32,
    sent: u64,
    dropped: u64,
}

impl GifRecorder {
    /// Create the output file in `dir` and start the encoder thread.
    ///
    /// Frames are captured at most `fps` times per second of animation time
    /// and played back at the same rate.
    pub fn start(dir: &Path, fps: u32) -> Result<Self> {
        if fps == 0 {
            return Err(Error::Config("capture_fps must be at least 1".into()));
        }
        fs::create_dir_all(dir)?;
        let path = stamped_path(dir, "Recording", "gif");
        let file = File::create(&path)?;

        let (sender, receiver) = mpsc::sync_channel(QUEUE_DEPTH);
        let delay = Delay::from_numer_denom_ms(1000, fps);
        let worker_path = path.clone();
        let worker = thread::Builder::new()
            .name("gif-encoder".into())
            .spawn(move || {
                let result = encode_frames(file, receiver, delay).map(|frames| RecordingSummary {
                    path: worker_path,
                    frames,
                });
                match &result {
                    Ok(summary) => log::info!(
                        "Recording finished: {} frames written to {}",
                        summary.frames,
                        summary.path.display()
                    ),
                    Err(e) => log::warn!("Recording failed: {e}"),
                }
                result
            })?;

        log::info!("Recording to {}", path.display());
        Ok(Self {
            sender,
            worker,
            path,
            interval: 1.0 / fps as f32,
            // Capture the first frame immediately.
            pending: 1.0 / fps as f32,
            sent: 0,
            dropped: 0,
        })
    }

    /// Offer the current frame. It is queued only when a capture interval
    /// has elapsed, and dropped when the encoder is behind. Never blocks.
    pub fn capture(&mut self, dt: f32, frame: &RgbaImage) {
        self.pending += dt.max(0.0);
        if self.pending < self.interval {
            return;
        }
        self.pending %= self.interval;

        match self.sender.try_send(frame.clone()) {
            Ok(()) => self.sent += 1,
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                if self.dropped == 1 || self.dropped % 100 == 0 {
                    log::warn!(
                        "GIF encoder is behind, {} frames dropped so far",
                        self.dropped
                    );
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                if self.dropped == 1 {
                    log::warn!("GIF encoder stopped; further frames are discarded");
                }
            }
        }
    }

    /// Output file of this recording.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frames handed to the encoder so far.
    pub fn frames_sent(&self) -> u64 {
        self.sent
    }

    /// Frames dropped because the encoder was behind.
    pub fn frames_dropped(&self) -> u64 {
        self.dropped
    }

    /// Close the queue and let the encoder finish in the background. The
    /// encoder thread logs the outcome.
    pub fn stop(self) {
        log::info!(
            "Stopping recording ({} frames queued, {} dropped)",
            self.sent,
            self.dropped
        );
        drop(self.sender);
    }

    /// Close the queue and wait for the encoder to finish.
    pub fn finish(self) -> Result<RecordingSummary> {
        drop(self.sender);
        self.worker
            .join()
            .map_err(|_| Error::Io(std::io::Error::other("GIF encoder thread panicked")))?
    }
}

fn encode_frames(file: File, frames: Receiver<RgbaImage>, delay: Delay) -> Result<u64> {
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;
    let mut written = 0;
    for image in frames {
        encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame(shade: u8) -> RgbaImage {
        RgbaImage::from_pixel(8, 6, Rgba([shade, shade / 2, 255 - shade, 255]))
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        // YYYYMMDDTHHMMSSmmm
        assert_eq!(ts.len(), 18);
        assert_eq!(&ts[8..9], "T");
        assert!(ts.chars().filter(|c| *c != 'T').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_save_still_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_still(&frame(120), dir.path()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("Tag_") && name.ends_with(".jpg"));

        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (8, 6));
    }

    #[test]
    fn test_save_still_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("captures").join("stills");
        let path = save_still(&frame(10), &nested).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn test_recording_writes_gif() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = GifRecorder::start(dir.path(), 10).unwrap();
        let name = recorder.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("Recording_") && name.ends_with(".gif"));

        for i in 0..3u8 {
            recorder.capture(0.1, &frame(i * 80));
        }
        let sent = recorder.frames_sent();
        assert_eq!(sent + recorder.frames_dropped(), 3);

        let summary = recorder.finish().unwrap();
        assert_eq!(summary.frames, sent);
        let bytes = fs::read(&summary.path).unwrap();
        assert_eq!(&bytes[..3], b"GIF");
    }

    #[test]
    fn test_capture_respects_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = GifRecorder::start(dir.path(), 10).unwrap();
        // First offer is captured, the next two fall inside the interval.
        recorder.capture(0.0, &frame(0));
        recorder.capture(0.03, &frame(0));
        recorder.capture(0.03, &frame(0));
        assert_eq!(recorder.frames_sent() + recorder.frames_dropped(), 1);
        recorder.capture(0.05, &frame(0));
        assert_eq!(recorder.frames_sent() + recorder.frames_dropped(), 2);
        recorder.finish().unwrap();
    }

    #[test]
    fn test_zero_fps_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GifRecorder::start(dir.path(), 0).is_err());
    }
}
