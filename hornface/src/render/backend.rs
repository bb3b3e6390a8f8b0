use crate::{
    assets::registry::OverlayAsset,
    foundation::core::Canvas,
    foundation::error::{HornfaceError, HornfaceResult},
    foundation::math::premultiply_rgba8_in_place,
    layout::placement::PlacementTransform,
};

/// A frame as RGBA8 pixels.
///
/// Canvas readbacks are premultiplied; camera frames are usually straight alpha. The
/// `premultiplied` flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Wrap straight-alpha RGBA8 bytes, checking the buffer length.
    pub fn from_straight(width: u32, height: u32, data: Vec<u8>) -> HornfaceResult<Self> {
        let expected = Canvas { width, height }.byte_len();
        if data.len() != expected {
            return Err(HornfaceError::validation(format!(
                "frame {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            premultiplied: false,
        })
    }

    /// Size of this frame.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied copy of the pixel data.
    pub(crate) fn premul_data(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        if !self.premultiplied {
            premultiply_rgba8_in_place(&mut data);
        }
        data
    }
}

/// Drawing surface the frame loop composites into.
///
/// Implementations only draw; ordering is the frame loop's responsibility.
pub trait DrawBackend {
    /// Reallocate the surface for a new canvas size.
    fn resize(&mut self, canvas: Canvas) -> HornfaceResult<()>;

    /// Current surface size.
    fn canvas(&self) -> Canvas;

    /// Reset every pixel to the clear color.
    fn clear(&mut self) -> HornfaceResult<()>;

    /// Draw a video frame stretched over the whole surface.
    fn draw_background(&mut self, frame: &FrameRGBA) -> HornfaceResult<()>;

    /// Draw `asset` into the destination rectangle of `placement`.
    fn draw_sprite(
        &mut self,
        asset: &OverlayAsset,
        placement: &PlacementTransform,
    ) -> HornfaceResult<()>;

    /// Copy out the current surface contents.
    fn readback_rgba8(&self) -> HornfaceResult<FrameRGBA>;
}

/// Backend-agnostic settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Straight-alpha RGBA8 color the surface is cleared to. Transparent when unset.
    pub clear_rgba: Option<[u8; 4]>,
}
