use super::*;
use crate::{
    assets::registry::AssetKind,
    foundation::core::FaceRect,
    layout::placement::{SpriteAspects, place},
    test_support::solid_image,
};

fn canvas(w: u32, h: u32) -> CpuCanvas {
    CpuCanvas::new(
        Canvas {
            width: w,
            height: h,
        },
        &RenderSettings::default(),
    )
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

fn eye_at(x: f64, y: f64, side: f64) -> PlacementTransform {
    // Face sized so that the left eye lands exactly where requested.
    let rect = FaceRect::new(
        x + side / 2.0 - 0.25 * (side / 0.3),
        y + side / 2.0 - 0.3 * (side / 0.3),
        side / 0.3,
        side / 0.3,
    );
    place(
        &rect,
        SpriteAspects {
            horn: 1.0,
            whiskers: 1.0,
        },
    )
    .unwrap()[2]
}

#[test]
fn clear_uses_configured_color() {
    let mut c = CpuCanvas::new(
        Canvas {
            width: 2,
            height: 2,
        },
        &RenderSettings {
            clear_rgba: Some([0, 0, 0, 255]),
        },
    );
    c.clear().unwrap();
    let out = c.readback_rgba8().unwrap();
    assert!(out.premultiplied);
    assert_eq!(out.data, [0, 0, 0, 255].repeat(4));
}

#[test]
fn same_size_background_is_copied() {
    let mut c = canvas(2, 1);
    c.clear().unwrap();
    let frame = FrameRGBA::from_straight(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 255]).unwrap();
    c.draw_background(&frame).unwrap();
    assert_eq!(c.readback_rgba8().unwrap().data, frame.data);
}

#[test]
fn background_is_stretched_to_canvas() {
    let mut c = canvas(4, 2);
    c.clear().unwrap();
    let frame = FrameRGBA::from_straight(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    c.draw_background(&frame).unwrap();
    let out = c.readback_rgba8().unwrap();
    assert_eq!(px(&out, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&out, 1, 1), [255, 0, 0, 255]);
    assert_eq!(px(&out, 2, 0), [0, 0, 255, 255]);
    assert_eq!(px(&out, 3, 1), [0, 0, 255, 255]);
}

#[test]
fn malformed_background_is_rejected() {
    let mut c = canvas(2, 2);
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 3],
        premultiplied: false,
    };
    assert!(c.draw_background(&frame).is_err());
    assert!(FrameRGBA::from_straight(2, 2, vec![0; 3]).is_err());
}

#[test]
fn sprite_fills_only_its_destination() {
    let mut c = canvas(10, 10);
    c.clear().unwrap();
    let eye = OverlayAsset::new(AssetKind::Eye, solid_image(3, 3, [0, 0, 255, 255])).unwrap();
    let t = eye_at(2.0, 4.0, 3.0);
    assert!((t.x - 2.0).abs() < 1e-9 && (t.y - 4.0).abs() < 1e-9);

    c.draw_sprite(&eye, &t).unwrap();
    let out = c.readback_rgba8().unwrap();
    assert_eq!(px(&out, 2, 4), [0, 0, 255, 255]);
    assert_eq!(px(&out, 4, 6), [0, 0, 255, 255]);
    assert_eq!(px(&out, 1, 4), [0, 0, 0, 0]);
    assert_eq!(px(&out, 5, 4), [0, 0, 0, 0]);
    assert_eq!(px(&out, 2, 7), [0, 0, 0, 0]);
}

#[test]
fn sprite_off_canvas_is_clipped_without_error() {
    let mut c = canvas(4, 4);
    c.clear().unwrap();
    let eye = OverlayAsset::new(AssetKind::Eye, solid_image(2, 2, [255, 0, 0, 255])).unwrap();

    c.draw_sprite(&eye, &eye_at(-50.0, -50.0, 3.0)).unwrap();
    assert!(c.readback_rgba8().unwrap().data.iter().all(|&b| b == 0));

    c.draw_sprite(&eye, &eye_at(-1.0, -1.0, 2.0)).unwrap();
    let out = c.readback_rgba8().unwrap();
    assert_eq!(px(&out, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&out, 1, 0), [0, 0, 0, 0]);
}

#[test]
fn transparent_sprite_pixels_keep_background() {
    let mut c = canvas(2, 2);
    c.clear().unwrap();
    let frame = FrameRGBA::from_straight(2, 2, [9, 9, 9, 255].repeat(4)).unwrap();
    c.draw_background(&frame).unwrap();
    let ghost = OverlayAsset::new(AssetKind::Eye, solid_image(1, 1, [255, 0, 0, 0])).unwrap();
    c.draw_sprite(&ghost, &eye_at(0.0, 0.0, 2.0)).unwrap();
    assert_eq!(c.readback_rgba8().unwrap().data, frame.data);
}

#[test]
fn resize_reallocates_and_rejects_empty() {
    let mut c = canvas(1, 1);
    c.resize(Canvas {
        width: 3,
        height: 2,
    })
    .unwrap();
    assert_eq!(c.readback_rgba8().unwrap().data.len(), 24);
    assert!(
        c.resize(Canvas {
            width: 0,
            height: 2
        })
        .is_err()
    );
}
