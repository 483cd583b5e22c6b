use super::*;

#[test]
fn empty_object_takes_defaults_and_validates() {
    let cfg = Config::from_json_str("{}").unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.width, 640);
    assert_eq!(cfg.length, 5);
    assert_eq!(cfg.wave_type, WaveForm::Sine);
    assert_eq!(cfg.shape_kinds(), ShapeKind::ALL);
}

#[test]
fn unknown_keys_are_ignored() {
    let cfg = Config::from_json_str(r#"{"length": 3, "not_a_key": [1, 2, 3]}"#).unwrap();
    assert_eq!(cfg.length, 3);
}

#[test]
fn names_parse_case_and_separator_insensitively() {
    assert_eq!(
        "Top-Left".parse::<TextPosition>().unwrap(),
        TextPosition::TopLeft
    );
    assert_eq!(
        "bottom_right".parse::<TextPosition>().unwrap(),
        TextPosition::BottomRight
    );
    assert_eq!("themed-word".parse::<TextMode>().unwrap(), TextMode::Word);
    assert_eq!("SAW".parse::<WaveForm>().unwrap(), WaveForm::Sawtooth);
    assert!("hexagon".parse::<ShapeKind>().is_err());
}

#[test]
fn unknown_enum_names_fall_back_instead_of_failing() {
    let cfg = Config::from_json_str(
        r#"{
            "wave_type": "theremin",
            "deformation": "extreme",
            "color_mode": "plaid",
            "text_position": "somewhere",
            "frame_mismatch": "maybe"
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.wave_type, WaveForm::Sine);
    assert_eq!(cfg.deformation, DeformationLevel::Medium);
    assert_eq!(cfg.color_mode, ColorMode::Random);
    assert_eq!(cfg.text_position, TextPosition::Random);
    assert_eq!(cfg.frame_mismatch, FrameMismatchPolicy::Reject);
}

#[test]
fn unknown_shape_names_are_skipped() {
    let cfg =
        Config::from_json_str(r#"{"allowed_shapes": ["star", "hexagon", "circle", "star"]}"#)
            .unwrap();
    assert_eq!(cfg.allowed_shapes, vec![ShapeKind::Star, ShapeKind::Circle]);

    let cfg = Config::from_json_str(r#"{"allowed_shapes": ["hexagon"]}"#).unwrap();
    assert!(cfg.allowed_shapes.is_empty());
    assert_eq!(cfg.shape_kinds(), ShapeKind::ALL);
}

#[test]
fn color_policy_resolves_with_fallbacks() {
    let cfg = Config::from_json_str(r##"{"color_mode": "solid", "solid_color": "#112233"}"##)
        .unwrap();
    assert_eq!(cfg.color_policy(), ColorPolicy::Solid(Rgb8::new(17, 34, 51)));

    let cfg = Config::from_json_str(r#"{"color_mode": "solid", "solid_color": "bogus"}"#).unwrap();
    assert_eq!(cfg.color_policy(), ColorPolicy::Solid(Rgb8::WHITE));

    let cfg =
        Config::from_json_str(r#"{"color_mode": "scheme", "color_scheme": "nope"}"#).unwrap();
    assert_eq!(cfg.color_policy(), ColorPolicy::Palette(&[Rgb8::MID_GRAY]));

    let cfg =
        Config::from_json_str(r#"{"color_mode": "scheme", "color_scheme": "ocean"}"#).unwrap();
    assert_eq!(
        cfg.color_policy(),
        ColorPolicy::Palette(palette::scheme("ocean").unwrap())
    );
}

#[test]
fn validation_rejects_broken_invariants() {
    let bad = [
        r#"{"min_shape_width": 50, "max_shape_width": 10}"#,
        r#"{"min_shape_height": 50, "max_shape_height": 10}"#,
        r#"{"min_shapes": 5, "max_shapes": 2}"#,
        r#"{"slide_duration_ms": 0}"#,
        r#"{"sample_rate": 0}"#,
        r#"{"length": 0}"#,
        r#"{"width": 641}"#,
        r#"{"height": 0}"#,
        r#"{"width": 70000}"#,
        r#"{"volume": 1.5}"#,
        r#"{"volume": 0.6}"#,
        r#"{"volume": 0.0}"#,
        r#"{"text_size": 0.0}"#,
        r#"{"tts_enabled": true, "tts_command": []}"#,
    ];
    for json in bad {
        let cfg = Config::from_json_str(json).unwrap();
        assert!(cfg.validate().is_err(), "{json}");
    }
}

#[test]
fn derived_values_follow_config() {
    let cfg = Config::from_json_str(r#"{"length": 4, "slide_duration_ms": 500}"#).unwrap();
    assert_eq!(cfg.slide_durations_ms(), vec![500; 4]);
    assert_eq!(cfg.fps().unwrap().as_f64(), 2.0);
    assert_eq!(cfg.canvas(), Canvas::new(640, 360).unwrap());
    let b = cfg.shape_bounds();
    assert_eq!((b.min_w, b.min_h, b.max_w, b.max_h), (20, 20, 200, 200));
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = Config::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, SlidewaveError::Validation(_)));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{"amount": 2}"#).unwrap();
    assert_eq!(Config::load(&path).unwrap().amount, 2);
    assert!(Config::load(&dir.path().join("missing.json")).is_err());
}

#[test]
fn volume_upper_bound_is_accepted() {
    let cfg = Config::from_json_str(r#"{"volume": 0.5}"#).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.volume, MAX_VOLUME);
}
