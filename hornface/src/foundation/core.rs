use crate::foundation::error::{HornfaceError, HornfaceResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Axis-aligned face bounding box reported by a detector, in video pixel coordinates.
///
/// Produced fresh for every detection event and never retained across frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FaceRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent, must be > 0.
    pub width: f64,
    /// Vertical extent, must be > 0.
    pub height: f64,
}

impl FaceRect {
    /// Construct a rectangle without validating it.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reject rectangles a detector may emit for malformed boxes.
    pub fn validate(&self) -> HornfaceResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(HornfaceError::degenerate_rect(format!(
                "non-finite component in {self:?}"
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(HornfaceError::degenerate_rect(format!(
                "width {} x height {} must both be > 0",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// `min(width, height)`, the reference length for square-ish sprites.
    pub fn scale(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Convert to a `kurbo` rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Total RGBA8 byte length of a tightly packed buffer of this size.
    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Whether either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        use crate::foundation::math::mul_div255_u8;

        Self {
            r: mul_div255_u8(u16::from(r), u16::from(a)),
            g: mul_div255_u8(u16::from(g), u16::from(a)),
            b: mul_div255_u8(u16::from(b), u16::from(a)),
            a,
        }
    }

    /// Channel array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
