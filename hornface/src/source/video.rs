use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::error::{HornfaceError, HornfaceResult},
    render::backend::FrameRGBA,
};

/// Natural dimensions a video source reports once it is playable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A live frame source, e.g. a camera.
///
/// `acquire` plays the role of the permission prompt plus metadata load: it blocks until the
/// source is playable or fails with [`HornfaceError::CameraAccess`].
pub trait VideoSource: Send {
    /// Open the source and report its natural size.
    fn acquire(&mut self) -> HornfaceResult<VideoInfo>;

    /// The most recent frame, in straight or premultiplied RGBA8.
    fn current_frame(&mut self) -> HornfaceResult<FrameRGBA>;

    /// Jump to a recorded frame. Live sources cannot seek.
    fn seek(&mut self, frame: usize) -> HornfaceResult<()> {
        Err(HornfaceError::validation(format!(
            "video source cannot seek (requested frame {frame})"
        )))
    }

    /// Step to the frame shown on the next pass. Live and still sources have nothing to do.
    fn next_frame(&mut self) {}
}

fn load_frame(path: &Path) -> HornfaceResult<FrameRGBA> {
    let rgba = image::open(path)
        .with_context(|| format!("open frame '{}'", path.display()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameRGBA::from_straight(width, height, rgba.into_raw())
}

fn camera_error(e: HornfaceError) -> HornfaceError {
    match e {
        HornfaceError::CameraAccess(_) => e,
        other => HornfaceError::camera_access(other.to_string()),
    }
}

/// A source that shows the same picture forever.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    path: Option<PathBuf>,
    frame: Option<FrameRGBA>,
}

impl StillImageSource {
    /// Load the picture from `path` on [`VideoSource::acquire`].
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            frame: None,
        }
    }

    /// Use an in-memory frame.
    pub fn from_frame(frame: FrameRGBA) -> Self {
        Self {
            path: None,
            frame: Some(frame),
        }
    }
}

impl VideoSource for StillImageSource {
    fn acquire(&mut self) -> HornfaceResult<VideoInfo> {
        if self.frame.is_none()
            && let Some(path) = &self.path
        {
            self.frame = Some(load_frame(path).map_err(camera_error)?);
        }
        let frame = self
            .frame
            .as_ref()
            .ok_or_else(|| HornfaceError::camera_access("no frame configured"))?;
        if frame.canvas().is_empty() {
            return Err(HornfaceError::camera_access("source reports an empty frame"));
        }
        Ok(VideoInfo {
            width: frame.width,
            height: frame.height,
        })
    }

    fn current_frame(&mut self) -> HornfaceResult<FrameRGBA> {
        self.frame
            .clone()
            .ok_or_else(|| HornfaceError::camera_access("source not acquired"))
    }
}

/// Recorded footage: an ordered list of frame images of identical size.
#[derive(Clone, Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    cursor: usize,
    info: Option<VideoInfo>,
    cached: Option<(usize, FrameRGBA)>,
}

impl ImageSequenceSource {
    /// Frames in the given order.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            cursor: 0,
            info: None,
            cached: None,
        }
    }

    /// Every `png`/`jpg`/`jpeg` file in `dir`, sorted by file name.
    pub fn from_dir(dir: &Path) -> HornfaceResult<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("list frames in '{}'", dir.display()))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.context("read frame directory entry")?.path();
            let is_frame = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
                .unwrap_or(false);
            if is_frame {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self::new(paths))
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Index of the frame `current_frame` returns.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Move to the next frame, staying on the last one at the end.
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.paths.len() {
            self.cursor += 1;
        }
    }
}

impl VideoSource for ImageSequenceSource {
    fn acquire(&mut self) -> HornfaceResult<VideoInfo> {
        if let Some(info) = self.info {
            return Ok(info);
        }
        let first = self
            .paths
            .first()
            .ok_or_else(|| HornfaceError::camera_access("image sequence has no frames"))?;
        let frame = load_frame(first).map_err(camera_error)?;
        let info = VideoInfo {
            width: frame.width,
            height: frame.height,
        };
        self.cached = Some((0, frame));
        self.info = Some(info);
        Ok(info)
    }

    fn current_frame(&mut self) -> HornfaceResult<FrameRGBA> {
        let info = self
            .info
            .ok_or_else(|| HornfaceError::camera_access("source not acquired"))?;
        if let Some((idx, frame)) = &self.cached
            && *idx == self.cursor
        {
            return Ok(frame.clone());
        }

        let frame = load_frame(&self.paths[self.cursor])?;
        if frame.width != info.width || frame.height != info.height {
            return Err(HornfaceError::validation(format!(
                "frame {} is {}x{}, sequence is {}x{}",
                self.cursor, frame.width, frame.height, info.width, info.height
            )));
        }
        self.cached = Some((self.cursor, frame.clone()));
        Ok(frame)
    }

    fn seek(&mut self, frame: usize) -> HornfaceResult<()> {
        if frame >= self.paths.len() {
            return Err(HornfaceError::validation(format!(
                "frame {frame} out of range (sequence has {})",
                self.paths.len()
            )));
        }
        self.cursor = frame;
        Ok(())
    }

    fn next_frame(&mut self) {
        self.advance();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/video.rs"]
mod tests;
