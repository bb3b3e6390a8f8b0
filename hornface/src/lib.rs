//! Hornface composites decorative sprites (horns, eyes, a whisker bar) onto live video,
//! anchored to the face rectangles an external detector reports.
//!
//! # Pipeline overview
//!
//! 1. **Start**: an [`OverlaySession`] runs the [`ReadinessBarrier`]: all four sprites decode
//!    concurrently while the [`VideoSource`] is acquired. Any failure stops everything.
//! 2. **Render**: each [`DetectionEvent`] clears the canvas, draws the current video frame, and,
//!    while [`CaptureState::Capturing`], draws the sprites [`place`] computes for every face.
//! 3. **Export**: [`OverlaySession::export_frame`] encodes whatever the last pass drew as PNG.
//!
//! Face detection and camera access are external; they plug in through [`Detector`] and
//! [`VideoSource`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod capture;
mod export;
mod foundation;
mod layout;
mod render;
mod session;
mod source;


pub use crate::assets::decode::{PreparedImage, decode_image, decode_image_file};
pub use crate::assets::registry::{AssetKind, AssetManifest, AssetRegistry, OverlayAsset};
pub use crate::capture::state::CaptureState;
pub use crate::export::png::{DEFAULT_EXPORT_FILE_NAME, encode_png, export_path, write_export};
pub use crate::foundation::core::{Affine, Canvas, FaceRect, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{HornfaceError, HornfaceResult};
pub use crate::layout::placement::{
    PlacementTransform, SPRITES_PER_FACE, Slot, SpriteAspects, place,
};
pub use crate::render::backend::{DrawBackend, FrameRGBA, RenderSettings};
pub use crate::render::cpu::CpuCanvas;
pub use crate::render::frame_loop::{FrameLoop, RenderStats};
pub use crate::session::overlay_session::{ASSETS_DIR_ENV, OverlaySession, SessionOpts};
pub use crate::session::readiness::{Readiness, ReadinessBarrier};
pub use crate::session::replay::{ReplayReport, ReplayScript, ReplayStep, replay};
pub use crate::source::detect::{DetectionEvent, Detector, ScriptedDetector};
pub use crate::source::video::{ImageSequenceSource, StillImageSource, VideoInfo, VideoSource};
