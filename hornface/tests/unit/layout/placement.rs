use super::*;

const EPS: f64 = 1e-9;

fn aspects() -> SpriteAspects {
    SpriteAspects {
        horn: 1.5,
        whiskers: 0.25,
    }
}

#[test]
fn worked_example_matches_reference_numbers() {
    let rect = FaceRect::new(100.0, 50.0, 200.0, 150.0);
    let out = place(&rect, aspects()).unwrap();

    let [horn_l, horn_r, eye_l, eye_r, whiskers] = out;
    assert_eq!(horn_l.width, 120.0);
    assert_eq!(horn_l.height, 180.0);
    assert!((horn_l.x - (100.0 - 36.0)).abs() < EPS);
    assert!((horn_l.y - (50.0 - 144.0)).abs() < EPS);
    assert!((horn_r.x - (300.0 - 84.0)).abs() < EPS);
    assert_eq!(horn_r.y, horn_l.y);

    assert!((eye_l.width - 45.0).abs() < EPS);
    assert!((eye_l.x - (150.0 - 22.5)).abs() < EPS);
    assert!((eye_l.y - (95.0 - 22.5)).abs() < EPS);
    assert!((eye_r.x - (250.0 - 22.5)).abs() < EPS);

    assert!((whiskers.width - 240.0).abs() < EPS);
    assert!((whiskers.height - 60.0).abs() < EPS);
    assert!((whiskers.x - 80.0).abs() < EPS);
    assert!((whiskers.y - 155.0).abs() < EPS);
}

#[test]
fn emits_five_positive_transforms_in_draw_order() {
    for rect in [
        FaceRect::new(0.0, 0.0, 1.0, 1.0),
        FaceRect::new(-40.0, 12.5, 320.0, 90.0),
        FaceRect::new(5.0, 5.0, 33.3, 700.0),
    ] {
        let out = place(&rect, aspects()).unwrap();
        assert_eq!(out.len(), SPRITES_PER_FACE);
        let slots: Vec<Slot> = out.iter().map(|t| t.slot).collect();
        assert_eq!(
            slots,
            vec![
                Slot::HornLeft,
                Slot::HornRight,
                Slot::EyeLeft,
                Slot::EyeRight,
                Slot::Whiskers
            ]
        );
        assert!(out.iter().all(|t| t.width > 0.0 && t.height > 0.0));
    }
}

#[test]
fn slots_map_to_expected_sprites() {
    let out = place(&FaceRect::new(0.0, 0.0, 10.0, 10.0), aspects()).unwrap();
    let kinds: Vec<AssetKind> = out.iter().map(PlacementTransform::asset).collect();
    assert_eq!(
        kinds,
        vec![
            AssetKind::LeftHorn,
            AssetKind::RightHorn,
            AssetKind::Eye,
            AssetKind::Eye,
            AssetKind::Whiskers
        ]
    );
}

#[test]
fn placement_is_deterministic() {
    let rect = FaceRect::new(13.7, 99.1, 187.3, 211.9);
    assert_eq!(place(&rect, aspects()).unwrap(), place(&rect, aspects()).unwrap());
}

#[test]
fn horn_preserves_asset_aspect() {
    let aspects = SpriteAspects {
        horn: 470.0 / 313.0,
        whiskers: 0.3,
    };
    let out = place(&FaceRect::new(10.0, 10.0, 123.0, 97.0), aspects).unwrap();
    for horn in &out[..2] {
        assert!((horn.height / horn.width - aspects.horn).abs() < EPS);
    }
    assert!((out[4].height / out[4].width - aspects.whiskers).abs() < EPS);
}

#[test]
fn eyes_are_square_and_symmetric() {
    let rect = FaceRect::new(31.0, 7.0, 211.0, 160.0);
    let out = place(&rect, aspects()).unwrap();
    let (l, r) = (out[2], out[3]);
    assert_eq!(l.width, l.height);
    assert_eq!(r.width, r.height);

    let mid = rect.x + rect.width / 2.0;
    assert!(((l.center().x - mid) + (r.center().x - mid)).abs() < EPS);
    assert!((l.center().y - r.center().y).abs() < EPS);
}

#[test]
fn whiskers_are_centred_on_face() {
    let rect = FaceRect::new(50.0, 0.0, 100.0, 100.0);
    let w = place(&rect, aspects()).unwrap()[4];
    assert!((w.center().x - 100.0).abs() < EPS);
    assert!((w.dest().x0 - 40.0).abs() < EPS);
}

#[test]
fn degenerate_rect_is_rejected() {
    let err = place(&FaceRect::new(0.0, 0.0, 0.0, 10.0), aspects()).unwrap_err();
    assert!(matches!(err, HornfaceError::DegenerateRect(_)));
    assert!(place(&FaceRect::new(0.0, 0.0, 10.0, -3.0), aspects()).is_err());
}

#[test]
fn aspects_come_from_registry() {
    let registry = crate::test_support::preloaded_registry();
    let a = SpriteAspects::from_registry(&registry).unwrap();
    assert!((a.horn - 1.5).abs() < EPS);
    assert!((a.whiskers - 0.25).abs() < EPS);

    let pending = AssetRegistry::new(crate::assets::registry::AssetManifest::default());
    assert!(matches!(
        SpriteAspects::from_registry(&pending),
        Err(HornfaceError::AssetNotReady(_))
    ));
}

#[test]
fn non_finite_rect_is_rejected() {
    for rect in [
        FaceRect::new(f64::NAN, 0.0, 10.0, 10.0),
        FaceRect::new(0.0, 0.0, f64::INFINITY, 10.0),
        FaceRect::new(0.0, f64::NEG_INFINITY, 10.0, 10.0),
        FaceRect::new(0.0, 0.0, 10.0, f64::NAN),
    ] {
        assert!(matches!(
            place(&rect, aspects()),
            Err(HornfaceError::DegenerateRect(_))
        ));
    }
}

#[test]
fn rect_that_overflows_when_scaled_is_rejected() {
    // Whisker width is 1.2x the face width, which no longer fits in an f64.
    let wide = FaceRect::new(0.0, 0.0, 1.7e308, 10.0);
    assert!(wide.validate().is_ok());
    assert!(matches!(
        place(&wide, aspects()),
        Err(HornfaceError::DegenerateRect(_))
    ));

    let far = FaceRect::new(1.7e308, 0.0, 1e308, 1e308);
    assert!(matches!(
        place(&far, aspects()),
        Err(HornfaceError::DegenerateRect(_))
    ));
}
