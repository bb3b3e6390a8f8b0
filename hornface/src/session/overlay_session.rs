use std::{
    path::{Path, PathBuf},
    sync::mpsc,
};

use crate::{
    assets::registry::{AssetManifest, AssetRegistry},
    capture::state::CaptureState,
    export::png::{encode_png, write_export},
    foundation::core::Canvas,
    foundation::error::{HornfaceError, HornfaceResult},
    render::backend::{DrawBackend, RenderSettings},
    render::cpu::CpuCanvas,
    render::frame_loop::{FrameLoop, RenderStats},
    session::readiness::{Readiness, ReadinessBarrier},
    source::detect::{DetectionEvent, Detector},
    source::video::VideoSource,
};

/// Environment variable overriding [`SessionOpts::assets_root`].
pub const ASSETS_DIR_ENV: &str = "HORNFACE_ASSETS_DIR";

/// Options for [`OverlaySession`].
#[derive(Clone, Debug)]
pub struct SessionOpts {
    /// Directory relative sprite paths are resolved against.
    pub assets_root: PathBuf,
    /// Sprite locations.
    pub manifest: AssetManifest,
    /// Surface settings.
    pub render: RenderSettings,
}

impl Default for SessionOpts {
    fn default() -> Self {
        let assets_root = std::env::var_os(ASSETS_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            assets_root,
            manifest: AssetManifest::default(),
            render: RenderSettings::default(),
        }
    }
}

/// Everything one compositing session mutates: sprites, camera, canvas, and capture state.
///
/// All methods take `&mut self`, so render passes, toggles, and exports never interleave.
pub struct OverlaySession {
    registry: AssetRegistry,
    source: Box<dyn VideoSource>,
    backend: Box<dyn DrawBackend>,
    barrier: ReadinessBarrier,
    capture: CaptureState,
    frame_loop: Option<FrameLoop>,
}

impl OverlaySession {
    /// Session drawing into a software canvas.
    pub fn new(opts: SessionOpts, source: Box<dyn VideoSource>) -> Self {
        let backend = Box::new(CpuCanvas::new(
            Canvas {
                width: 0,
                height: 0,
            },
            &opts.render,
        ));
        Self::with_backend(opts, source, backend)
    }

    /// Session drawing into a caller-provided backend.
    pub fn with_backend(
        opts: SessionOpts,
        source: Box<dyn VideoSource>,
        backend: Box<dyn DrawBackend>,
    ) -> Self {
        let manifest = opts.manifest.resolved(&opts.assets_root);
        Self {
            registry: AssetRegistry::new(manifest),
            source,
            backend,
            barrier: ReadinessBarrier::new(),
            capture: CaptureState::default(),
            frame_loop: None,
        }
    }

    /// Run the readiness barrier. On success the canvas takes the video's natural size.
    ///
    /// Calling again returns the cached outcome.
    pub fn start(&mut self) -> HornfaceResult<Readiness> {
        let outcome = self
            .barrier
            .await_ready(&mut self.registry, self.source.as_mut());
        if let Readiness::Ready(info) = &outcome
            && self.frame_loop.is_none()
        {
            self.backend.resize(Canvas {
                width: info.width,
                height: info.height,
            })?;
            self.frame_loop = Some(FrameLoop::new(&self.registry)?);
        }
        Ok(outcome)
    }

    /// Whether the render loop is running.
    pub fn is_started(&self) -> bool {
        self.frame_loop.is_some()
    }

    /// Composite one detection event onto the current video frame, then step the source.
    pub fn on_detection(&mut self, event: &DetectionEvent) -> HornfaceResult<()> {
        let frame_loop = self
            .frame_loop
            .as_mut()
            .ok_or_else(|| HornfaceError::validation("render loop has not started"))?;
        let background = self.source.current_frame()?;
        frame_loop.render(
            self.backend.as_mut(),
            &self.registry,
            self.capture,
            &background,
            event,
        )?;
        self.source.next_frame();
        Ok(())
    }

    /// Render every event until all senders hang up. Returns the number of passes.
    pub fn run(&mut self, events: mpsc::Receiver<DetectionEvent>) -> HornfaceResult<u64> {
        let mut passes = 0;
        for event in events {
            self.on_detection(&event)?;
            passes += 1;
        }
        Ok(passes)
    }

    /// Subscribe to `detector` and render everything it publishes.
    pub fn run_detector(&mut self, detector: &mut dyn Detector) -> HornfaceResult<u64> {
        if !self.is_started() {
            return Err(HornfaceError::validation("render loop has not started"));
        }
        let (tx, rx) = mpsc::channel();
        detector.subscribe(tx)?;
        self.run(rx)
    }

    /// Flip capture mode and return the toggle control's new label.
    pub fn toggle_capture(&mut self) -> &'static str {
        self.capture.toggle().label()
    }

    /// Canvas size; empty until the session has started.
    pub fn canvas(&self) -> Canvas {
        self.backend.canvas()
    }

    /// Current capture mode.
    pub fn capture_state(&self) -> CaptureState {
        self.capture
    }

    /// Mutable access to the video source, e.g. to seek recorded footage.
    pub fn source_mut(&mut self) -> &mut dyn VideoSource {
        self.source.as_mut()
    }

    /// Counters from the render loop; all zero before start.
    pub fn stats(&self) -> RenderStats {
        self.frame_loop
            .as_ref()
            .map(FrameLoop::stats)
            .unwrap_or_default()
    }

    /// PNG of whatever the last render pass left on the canvas.
    pub fn export_frame(&self) -> HornfaceResult<Vec<u8>> {
        if self.stats().frames == 0 {
            return Err(HornfaceError::NoFrameAvailable);
        }
        encode_png(&self.backend.readback_rgba8()?)
    }

    /// Export to `target` (a file, or a directory receiving `demon-meme.png`).
    pub fn save_frame(&self, target: &Path) -> HornfaceResult<PathBuf> {
        let payload = self.export_frame()?;
        let out = write_export(&payload, target)?;
        tracing::info!(path = %out.display(), bytes = payload.len(), "meme saved");
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/overlay_session.rs"]
mod tests;
