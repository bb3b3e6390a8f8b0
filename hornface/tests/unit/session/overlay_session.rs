use super::*;
use crate::{
    foundation::core::FaceRect,
    render::backend::FrameRGBA,
    source::{
        detect::ScriptedDetector,
        video::{ImageSequenceSource, StillImageSource},
    },
    test_support::{png_bytes, temp_dir, write_sprites},
};

const W: u32 = 320;
const H: u32 = 240;

fn grey_camera() -> Box<dyn VideoSource> {
    let data = [40u8, 40, 40, 255].repeat((W * H) as usize);
    Box::new(StillImageSource::from_frame(
        FrameRGBA::from_straight(W, H, data).unwrap(),
    ))
}

fn session_in(root: &Path) -> OverlaySession {
    let opts = SessionOpts {
        assets_root: root.to_path_buf(),
        ..SessionOpts::default()
    };
    OverlaySession::new(opts, grey_camera())
}

fn face() -> FaceRect {
    FaceRect::new(100.0, 80.0, 120.0, 100.0)
}

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

#[test]
fn export_before_any_render_fails() {
    let root = temp_dir("session_no_frame");
    write_sprites(&root);
    let mut session = session_in(&root);
    assert!(matches!(
        session.export_frame(),
        Err(HornfaceError::NoFrameAvailable)
    ));

    assert!(session.start().unwrap().is_ready());
    assert!(matches!(
        session.export_frame(),
        Err(HornfaceError::NoFrameAvailable)
    ));
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn render_before_start_is_rejected() {
    let root = temp_dir("session_not_started");
    write_sprites(&root);
    let mut session = session_in(&root);
    assert!(session.on_detection(&DetectionEvent::default()).is_err());
    assert_eq!(session.stats(), RenderStats::default());
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn failed_start_never_renders() {
    let root = temp_dir("session_failed");
    write_sprites(&root);
    std::fs::remove_file(root.join("items/morr.png")).unwrap();

    let mut session = session_in(&root);
    let outcome = session.start().unwrap();
    assert!(matches!(outcome, Readiness::Failed(_)));
    assert!(!session.is_started());

    let mut det = ScriptedDetector::new(vec![DetectionEvent::new(vec![face()]); 3]);
    assert!(session.run_detector(&mut det).is_err());
    assert_eq!(session.stats().frames, 0);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn export_after_render_returns_canvas_png() {
    let root = temp_dir("session_export");
    write_sprites(&root);
    let mut session = session_in(&root);
    session.start().unwrap();

    session
        .on_detection(&DetectionEvent::new(vec![face()]))
        .unwrap();
    let png = session.export_frame().unwrap();
    assert!(!png.is_empty());

    let img = decode(&png);
    assert_eq!(img.dimensions(), (W, H));
    // Idle: only the background.
    assert!(img.pixels().all(|p| p.0 == [40, 40, 40, 255]));
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn capturing_draws_sprites_at_placements() {
    let root = temp_dir("session_capture");
    write_sprites(&root);
    let mut session = session_in(&root);
    session.start().unwrap();

    assert_eq!(session.toggle_capture(), "Reset");
    session
        .on_detection(&DetectionEvent::new(vec![face()]))
        .unwrap();
    let img = decode(&session.export_frame().unwrap());

    // face {100,80,120,100}: eye side 30 centred at (130,110) and (190,110).
    assert_eq!(img.get_pixel(130, 110).0, [0, 0, 255, 255]);
    assert_eq!(img.get_pixel(190, 110).0, [0, 0, 255, 255]);
    // Whiskers: 144 wide from x=88, y from 150, drawn over the base frame.
    assert_eq!(img.get_pixel(100, 155).0, [255, 255, 0, 255]);
    // Left horn: 80 wide, 120 tall, x from 76, y from -16.
    assert_eq!(img.get_pixel(80, 10).0, [255, 0, 0, 255]);
    // Far corner untouched.
    assert_eq!(img.get_pixel(W - 1, H - 1).0, [40, 40, 40, 255]);

    assert_eq!(session.toggle_capture(), "Capture and Add Features");
    session
        .on_detection(&DetectionEvent::new(vec![face()]))
        .unwrap();
    let img = decode(&session.export_frame().unwrap());
    assert_eq!(img.get_pixel(130, 110).0, [40, 40, 40, 255]);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn run_detector_drains_all_events() {
    let root = temp_dir("session_detector");
    write_sprites(&root);
    let mut session = session_in(&root);
    session.start().unwrap();
    session.toggle_capture();

    let mut det = ScriptedDetector::new(vec![
        DetectionEvent::new(vec![face()]),
        DetectionEvent::new(vec![]),
        DetectionEvent::new(vec![face(), FaceRect::new(0.0, 0.0, 0.0, 10.0)]),
    ]);
    assert_eq!(session.run_detector(&mut det).unwrap(), 3);

    let stats = session.stats();
    assert_eq!(stats.frames, 3);
    assert_eq!(stats.placements, 3);
    assert_eq!(stats.skipped_rects, 1);
    assert_eq!(stats.sprites_drawn, 10);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn start_is_idempotent() {
    let root = temp_dir("session_restart");
    write_sprites(&root);
    let mut session = session_in(&root);
    assert!(session.canvas().is_empty());
    let a = session.start().unwrap();
    assert_eq!(
        session.canvas(),
        Canvas {
            width: W,
            height: H
        }
    );
    session
        .on_detection(&DetectionEvent::default())
        .unwrap();
    let b = session.start().unwrap();
    assert_eq!(a, b);
    assert_eq!(session.stats().frames, 1);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn save_frame_writes_default_name_into_directory() {
    let root = temp_dir("session_save");
    write_sprites(&root);
    let mut session = session_in(&root);
    session.start().unwrap();
    session
        .on_detection(&DetectionEvent::default())
        .unwrap();

    let out_dir = root.join("out");
    std::fs::create_dir_all(&out_dir).unwrap();
    let written = session.save_frame(&out_dir).unwrap();
    assert_eq!(written, out_dir.join("demon-meme.png"));
    assert_eq!(decode(&std::fs::read(&written).unwrap()).dimensions(), (W, H));
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn detector_passes_step_through_recorded_frames() {
    let root = temp_dir("session_footage");
    write_sprites(&root);
    let frames = root.join("frames");
    std::fs::create_dir_all(&frames).unwrap();
    std::fs::write(frames.join("000.png"), png_bytes(8, 6, [10, 10, 10, 255])).unwrap();
    std::fs::write(frames.join("001.png"), png_bytes(8, 6, [90, 90, 90, 255])).unwrap();

    let opts = SessionOpts {
        assets_root: root.clone(),
        ..SessionOpts::default()
    };
    let source = ImageSequenceSource::from_dir(&frames).unwrap();
    let mut session = OverlaySession::new(opts, Box::new(source));
    session.start().unwrap();

    let mut det = ScriptedDetector::new(vec![DetectionEvent::default()]);
    session.run_detector(&mut det).unwrap();
    let img = decode(&session.export_frame().unwrap());
    assert_eq!(img.get_pixel(0, 0).0, [10, 10, 10, 255]);

    let mut det = ScriptedDetector::new(vec![DetectionEvent::default(); 2]);
    assert_eq!(session.run_detector(&mut det).unwrap(), 2);
    let img = decode(&session.export_frame().unwrap());
    // Second pass drew frame 1; the third stays on the last frame.
    assert_eq!(img.get_pixel(0, 0).0, [90, 90, 90, 255]);
    std::fs::remove_dir_all(&root).ok();
}
