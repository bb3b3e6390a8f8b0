//! Face rectangle to sprite destination mapping.
//!
//! All proportions are fixed constants tuned against the bounding boxes a frontal-face
//! detector produces; they are reproduced exactly and not derived from anything.

use crate::{
    assets::registry::{AssetKind, AssetRegistry},
    foundation::core::{FaceRect, Point, Rect},
    foundation::error::{HornfaceError, HornfaceResult},
};

const HORN_WIDTH_OF_SCALE: f64 = 0.8;
const HORN_LEFT_INSET: f64 = 0.3;
const HORN_RIGHT_INSET: f64 = 0.7;
const HORN_LIFT: f64 = 0.8;

const EYE_SIDE_OF_SCALE: f64 = 0.3;
const EYE_LEFT_X: f64 = 0.25;
const EYE_RIGHT_X: f64 = 0.75;
const EYE_Y: f64 = 0.3;

const WHISKER_WIDTH_OF_FACE: f64 = 1.2;
const WHISKER_Y: f64 = 0.7;

/// Number of transforms produced per face.
pub const SPRITES_PER_FACE: usize = 5;

/// Which slot of the per-face layout a transform fills. Also the draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Left horn.
    HornLeft,
    /// Right horn.
    HornRight,
    /// Left eye.
    EyeLeft,
    /// Right eye.
    EyeRight,
    /// Whisker bar.
    Whiskers,
}

impl Slot {
    /// Sprite drawn into this slot.
    pub fn asset(self) -> AssetKind {
        match self {
            Slot::HornLeft => AssetKind::LeftHorn,
            Slot::HornRight => AssetKind::RightHorn,
            Slot::EyeLeft | Slot::EyeRight => AssetKind::Eye,
            Slot::Whiskers => AssetKind::Whiskers,
        }
    }
}

/// Destination rectangle for drawing one sprite for one face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementTransform {
    /// Layout slot, which also determines the sprite.
    pub slot: Slot,
    /// Destination left edge in canvas pixels.
    pub x: f64,
    /// Destination top edge in canvas pixels.
    pub y: f64,
    /// Destination width, always > 0.
    pub width: f64,
    /// Destination height, always > 0.
    pub height: f64,
}

impl PlacementTransform {
    fn new(slot: Slot, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            slot,
            x,
            y,
            width,
            height,
        }
    }

    /// Sprite to draw.
    pub fn asset(&self) -> AssetKind {
        self.slot.asset()
    }

    /// Destination as a `kurbo` rectangle.
    pub fn dest(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    fn is_drawable(&self) -> bool {
        let edges = [
            self.x,
            self.y,
            self.x + self.width,
            self.y + self.height,
        ];
        self.width > 0.0 && self.height > 0.0 && edges.iter().all(|v| v.is_finite())
    }

    /// Centre of the destination rectangle.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Sprite aspect ratios (`height / width`) the layout depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteAspects {
    /// Horn aspect, shared by both horns.
    pub horn: f64,
    /// Whisker bar aspect.
    pub whiskers: f64,
}

impl SpriteAspects {
    /// Read aspects from decoded sprites. Both horns use the left horn's proportions.
    pub fn from_registry(registry: &AssetRegistry) -> HornfaceResult<Self> {
        Ok(Self {
            horn: registry.get(AssetKind::LeftHorn)?.aspect_ratio(),
            whiskers: registry.get(AssetKind::Whiskers)?.aspect_ratio(),
        })
    }
}

/// Map one face rectangle to draw transforms, in draw order:
/// horn-left, horn-right, eye-left, eye-right, whiskers.
///
/// Pure: the output depends only on `rect` and `aspects`.
pub fn place(
    rect: &FaceRect,
    aspects: SpriteAspects,
) -> HornfaceResult<[PlacementTransform; SPRITES_PER_FACE]> {
    rect.validate()?;
    if !(aspects.horn > 0.0 && aspects.whiskers > 0.0) {
        return Err(HornfaceError::validation(format!(
            "sprite aspects must be > 0, got {aspects:?}"
        )));
    }

    let scale = rect.scale();

    let horn_w = scale * HORN_WIDTH_OF_SCALE;
    let horn_h = horn_w * aspects.horn;
    let horn_y = rect.y - horn_h * HORN_LIFT;

    let eye = scale * EYE_SIDE_OF_SCALE;
    let eye_y = rect.y + rect.height * EYE_Y - eye / 2.0;

    let whisker_w = rect.width * WHISKER_WIDTH_OF_FACE;
    let whisker_h = whisker_w * aspects.whiskers;

    let out = [
        PlacementTransform::new(
            Slot::HornLeft,
            rect.x - horn_w * HORN_LEFT_INSET,
            horn_y,
            horn_w,
            horn_h,
        ),
        PlacementTransform::new(
            Slot::HornRight,
            rect.x + rect.width - horn_w * HORN_RIGHT_INSET,
            horn_y,
            horn_w,
            horn_h,
        ),
        PlacementTransform::new(
            Slot::EyeLeft,
            rect.x + rect.width * EYE_LEFT_X - eye / 2.0,
            eye_y,
            eye,
            eye,
        ),
        PlacementTransform::new(
            Slot::EyeRight,
            rect.x + rect.width * EYE_RIGHT_X - eye / 2.0,
            eye_y,
            eye,
            eye,
        ),
        PlacementTransform::new(
            Slot::Whiskers,
            rect.x + rect.width / 2.0 - whisker_w / 2.0,
            rect.y + rect.height * WHISKER_Y,
            whisker_w,
            whisker_h,
        ),
    ];

    // Extreme but finite rects can still overflow or underflow once scaled.
    if !out.iter().all(PlacementTransform::is_drawable) {
        return Err(HornfaceError::degenerate_rect(format!(
            "{rect:?} does not scale to drawable sprites"
        )));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
