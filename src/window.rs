//! Window and event loop.
//!
//! [`run`] opens a window and drives a [`Simulation`] once per redraw. The
//! window-independent part of a running session (commands, capture,
//! window title) lives in [`Session`] so it can be exercised headless.

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;
use image::RgbaImage;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::{Error, Result};
use crate::export::{self, GifRecorder, RecordingSummary};
use crate::gpu::Presenter;
use crate::input::{Command, Input};
use crate::simulation::Simulation;
use crate::time::FrameTimer;

/// Window settings for [`run`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Where stills and recordings are written.
    pub output_dir: PathBuf,
    pub window_title: String,
    /// Initial logical window size.
    pub window_size: (u32, u32),
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            window_title: "glyphdrift".to_string(),
            window_size: (1280, 720),
        }
    }
}

/// Open a window and run the animation until it is closed.
pub fn run(simulation: Simulation, options: RunOptions) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(simulation, options);
    event_loop.run_app(&mut app)?;

    app.session.shutdown();
    match app.failure.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// A running animation minus the window: applies commands, feeds the
/// recorder and formats the window title.
pub struct Session {
    simulation: Simulation,
    recorder: Option<GifRecorder>,
    /// FPS display state to restore when a recording stops.
    fps_before_recording: bool,
    output_dir: PathBuf,
}

impl Session {
    pub fn new(simulation: Simulation, output_dir: PathBuf) -> Self {
        Self {
            simulation,
            recorder: None,
            fps_before_recording: false,
            output_dir,
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Apply one command. Returns `false` when the session should end.
    ///
    /// Export failures are logged and do not end the session.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::ToggleWords => {
                self.simulation.toggle_words();
            }
            Command::ToggleTitle => {
                self.simulation.toggle_title();
            }
            Command::ToggleFps => {
                if self.is_recording() {
                    // Takes effect once the recording stops.
                    self.fps_before_recording = !self.fps_before_recording;
                } else {
                    self.simulation.toggle_fps();
                }
            }
            Command::SaveStill => {
                if let Err(e) = export::save_still(self.simulation.scene(), &self.output_dir) {
                    log::warn!("Could not save still: {e}");
                }
            }
            Command::ToggleRecording => {
                if self.is_recording() {
                    self.stop_recording();
                } else {
                    self.start_recording();
                }
            }
            Command::Quit => return false,
        }
        true
    }

    fn start_recording(&mut self) {
        match GifRecorder::start(&self.output_dir, self.simulation.config().capture_fps) {
            Ok(recorder) => {
                self.recorder = Some(recorder);
                self.fps_before_recording = self.simulation.show_fps();
                self.simulation.set_show_fps(false);
            }
            Err(e) => log::warn!("Could not start recording: {e}"),
        }
    }

    /// Close the current recording, if any, and restore the FPS display.
    pub fn stop_recording(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            recorder.stop();
            self.simulation.set_show_fps(self.fps_before_recording);
        }
    }

    /// End the session. A recording in progress is closed and its encoder
    /// joined, so the file is complete when this returns.
    pub fn shutdown(&mut self) -> Option<RecordingSummary> {
        let recorder = self.recorder.take()?;
        self.simulation.set_show_fps(self.fps_before_recording);
        log::info!("Waiting for the GIF encoder to finish");
        match recorder.finish() {
            Ok(summary) => Some(summary),
            Err(e) => {
                log::warn!("Recording could not be completed: {e}");
                None
            }
        }
    }

    /// Step the simulation and hand the result to the recorder.
    pub fn frame(&mut self, dt: f32, pointer: Option<Vec2>) -> &RgbaImage {
        let scene = self.simulation.step(dt, pointer);
        if let Some(recorder) = &mut self.recorder {
            recorder.capture(dt, scene);
        }
        scene
    }

    /// Window title, with the frame rate appended while FPS display is on.
    pub fn window_title(&self, base: &str, fps: f32) -> String {
        if self.simulation.show_fps() {
            format!("{base} - {fps:.0} FPS")
        } else {
            base.to_string()
        }
    }
}

struct App {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    session: Session,
    input: Input,
    timer: FrameTimer,
    options: RunOptions,
    title: String,
    failure: Option<Error>,
}

impl App {
    fn new(simulation: Simulation, options: RunOptions) -> Self {
        let timer = FrameTimer::new(simulation.config().max_frame_delta);
        Self {
            window: None,
            presenter: None,
            session: Session::new(simulation, options.output_dir.clone()),
            input: Input::new(),
            timer,
            title: options.window_title.clone(),
            options,
            failure: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.options.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let config = self.session.simulation().config();
        let presenter = pollster::block_on(Presenter::new(
            window.clone(),
            config.buffer_width,
            config.buffer_height,
        ))?;

        self.window = Some(window);
        self.presenter = Some(presenter);
        self.timer = FrameTimer::new(config.max_frame_delta);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        for command in self.input.drain_commands() {
            if !self.session.apply(command) {
                event_loop.exit();
                return;
            }
        }

        let Some(presenter) = &mut self.presenter else {
            return;
        };

        let dt = self.timer.tick();
        let pointer = self
            .input
            .pointer()
            .and_then(|p| presenter.letterbox().to_buffer(p));
        let scene = self.session.frame(dt, pointer);

        match presenter.render(scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.failure = Some(Error::Gpu("surface out of memory".into()));
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }

        if let Some(window) = &self.window {
            let title = self
                .session
                .window_title(&self.options.window_title, self.timer.fps());
            if title != self.title {
                window.set_title(&title);
                self.title = title;
            }
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                log::error!("Could not open window: {e}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => self.input.handle_event(&other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::glyph::Rect;
    use crate::simulation::TitleSprite;
    use crate::spawn::SpawnPointSet;
    use image::Rgba;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn session(dir: PathBuf) -> Session {
        let config = Config::for_resolution(64, 36).with_particle_count(10);
        let spawn = SpawnPointSet::new(vec![Vec2::new(32.0, 18.0)], "T").unwrap();
        let title = TitleSprite::new(
            RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])),
            Rect::new(30.0, 16.0, 4.0, 4.0),
        );
        let sim =
            Simulation::from_parts(config, spawn, title, Vec::new(), SmallRng::seed_from_u64(3))
                .unwrap();
        Session::new(sim, dir)
    }

    #[test]
    fn test_quit_ends_session() {
        let mut s = session(PathBuf::from("."));
        assert!(s.apply(Command::ToggleTitle));
        assert!(!s.simulation().show_title());
        assert!(!s.apply(Command::Quit));
    }

    #[test]
    fn test_recording_suppresses_and_restores_fps() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path().to_path_buf());
        assert!(s.simulation().show_fps());

        s.apply(Command::ToggleRecording);
        assert!(s.is_recording());
        assert!(!s.simulation().show_fps());
        assert_eq!(s.window_title("demo", 60.0), "demo");

        s.frame(0.1, None);
        s.apply(Command::ToggleRecording);
        assert!(!s.is_recording());
        assert!(s.simulation().show_fps());
        assert_eq!(s.window_title("demo", 59.6), "demo - 60 FPS");
    }

    #[test]
    fn test_fps_toggle_while_recording_applies_on_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path().to_path_buf());
        s.apply(Command::ToggleRecording);
        s.apply(Command::ToggleFps);
        assert!(!s.simulation().show_fps());
        s.apply(Command::ToggleRecording);
        assert!(!s.simulation().show_fps());
    }

    #[test]
    fn test_shutdown_while_recording_leaves_complete_gif() {
        use image::codecs::gif::GifDecoder;
        use image::AnimationDecoder;
        use std::io::BufReader;

        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path().to_path_buf());
        s.apply(Command::ToggleRecording);
        for _ in 0..3 {
            s.frame(0.1, None);
        }

        let summary = s.shutdown().unwrap();
        assert!(!s.is_recording());
        assert!(s.simulation().show_fps());
        assert_eq!(summary.frames, 3);

        let file = std::fs::File::open(&summary.path).unwrap();
        let decoder = GifDecoder::new(BufReader::new(file)).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].buffer().dimensions(), (64, 36));
    }

    #[test]
    fn test_shutdown_without_recording_is_a_no_op() {
        let mut s = session(PathBuf::from("."));
        assert!(s.shutdown().is_none());
    }

    #[test]
    fn test_save_still_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path().to_path_buf());
        s.frame(0.016, None);
        assert!(s.apply(Command::SaveStill));
        let count = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 1);
    }
}
