use rand::{SeedableRng as _, rngs::StdRng};

use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 200,
        height: 100,
    }
}

#[test]
fn random_caption_has_fixed_length_and_charset() {
    let mut rng = StdRng::seed_from_u64(1);
    let text = random_caption(&mut rng);
    assert_eq!(text.chars().count(), CAPTION_LEN);
    assert!(text.bytes().all(|b| CAPTION_CHARSET.contains(&b)));
}

#[test]
fn word_captions_use_the_topic() {
    let mut rng = StdRng::seed_from_u64(2);
    let space = words::topic("space").unwrap();
    let text = caption_text(TextMode::Word, "space", &mut rng);
    assert!(space.contains(&text.as_str()));
}

#[test]
fn anchored_positions_respect_margin() {
    let mut rng = StdRng::seed_from_u64(3);
    let (w, h) = (50.0, 20.0);
    assert_eq!(
        place_text(TextPosition::TopLeft, canvas(), w, h, &mut rng),
        Point::new(10.0, 10.0)
    );
    assert_eq!(
        place_text(TextPosition::TopRight, canvas(), w, h, &mut rng),
        Point::new(140.0, 10.0)
    );
    assert_eq!(
        place_text(TextPosition::BottomLeft, canvas(), w, h, &mut rng),
        Point::new(10.0, 70.0)
    );
    assert_eq!(
        place_text(TextPosition::BottomRight, canvas(), w, h, &mut rng),
        Point::new(140.0, 70.0)
    );
    assert_eq!(
        place_text(TextPosition::Center, canvas(), w, h, &mut rng),
        Point::new(75.0, 40.0)
    );
}

#[test]
fn random_position_rerolls_and_keeps_block_on_canvas() {
    let mut rng = StdRng::seed_from_u64(4);
    let points: Vec<Point> = (0..20)
        .map(|_| place_text(TextPosition::Random, canvas(), 50.0, 20.0, &mut rng))
        .collect();
    for p in &points {
        assert!((0.0..=150.0).contains(&p.x) && (0.0..=80.0).contains(&p.y));
    }
    assert!(points.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn oversized_text_clamps_to_origin() {
    let mut rng = StdRng::seed_from_u64(5);
    let p = place_text(TextPosition::Random, canvas(), 500.0, 500.0, &mut rng);
    assert_eq!(p, Point::new(0.0, 0.0));
}

#[test]
fn missing_explicit_font_is_a_validation_error() {
    let err = resolve_font_path(Some(Path::new("/no/such/font.ttf"))).unwrap_err();
    assert!(matches!(err, SlidewaveError::Validation(_)));
}

#[test]
fn layout_measures_text_when_a_font_is_available() {
    let Ok(bytes) = load_font(None) else {
        eprintln!("skipping: no system font available");
        return;
    };
    let mut renderer = TextRenderer::new(bytes).unwrap();
    assert!(!renderer.family_name().trim().is_empty());

    let short = renderer.layout("Slide 1", 20.0, Rgb8::BLACK).unwrap();
    let long = renderer.layout("Slide 1 with more words", 20.0, Rgb8::BLACK).unwrap();
    assert!(short.width > 0.0 && short.height > 0.0);
    assert!(long.width > short.width);
    assert!(renderer.layout("x", 0.0, Rgb8::BLACK).is_err());
}
