use super::*;

fn cfg(width: u32, height: u32, fps: Fps) -> EncodeConfig {
    default_mp4_config("out/video.mp4", width, height, fps, None)
}

fn one_fps() -> Fps {
    Fps::new(1, 1).unwrap()
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(cfg(0, 10, one_fps()).validate().is_err());
    assert!(cfg(11, 10, one_fps()).validate().is_err());
    assert!(
        cfg(
            10,
            10,
            Fps {
                num: 0,
                den: 1
            }
        )
        .validate()
        .is_err()
    );
    assert!(cfg(10, 10, one_fps()).validate().is_ok());

    let mut with_missing_audio = cfg(10, 10, one_fps());
    with_missing_audio.audio_path = Some(PathBuf::from("/no/such/track.wav"));
    assert!(with_missing_audio.validate().is_err());
}

#[test]
fn args_use_rational_rate_and_mux_audio() {
    let fps = Fps::from_slide_duration_ms(400).unwrap();
    let mut c = cfg(64, 32, fps);
    c.audio_path = Some(PathBuf::from("audio/track.wav"));
    let args = ffmpeg_args(&c);
    let joined = args.join(" ");
    assert!(joined.starts_with("-y "));
    assert!(joined.contains("-s 64x32 -r 5/2 -i pipe:0 -i audio/track.wav"));
    assert!(joined.contains("-c:a aac"));
    assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p"));
    assert!(!args.contains(&"-an".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("out/video.mp4"));
}

#[test]
fn silent_encode_disables_audio() {
    let args = ffmpeg_args(&cfg(64, 32, one_fps()));
    assert!(args.contains(&"-an".to_string()));
    assert!(!args.contains(&"aac".to_string()));
}

#[test]
fn flatten_straight_over_black_produces_expected_rgb() {
    // Straight red @ 50% alpha => rgb becomes 128,0,0 over black.
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, Rgb8::BLACK).unwrap();
    assert_eq!(dst, vec![128u8, 0, 0, 255]);
}

#[test]
fn flatten_transparent_over_white_is_white() {
    let src = vec![10u8, 20, 30, 0, 1, 2, 3, 255];
    let mut dst = vec![0u8; 8];
    flatten_to_opaque_rgba8(&mut dst, &src, Rgb8::WHITE).unwrap();
    assert_eq!(dst, vec![255u8, 255, 255, 255, 1, 2, 3, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 4];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 8], Rgb8::WHITE).is_err());
}

#[test]
fn empty_frame_list_fails_without_leaving_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("x.mp4");
    assert!(assemble_video(&[], one_fps(), None, &out).is_err());
    assert!(!out.exists());
}

#[test]
fn assembles_mp4_with_audio_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("track.wav");
    crate::audio::track::AudioTrack {
        sample_rate: 8000,
        samples: vec![0.0; 16_000],
    }
    .write_wav(&wav)
    .unwrap();

    let frames: Vec<image::RgbaImage> = (0..2u8)
        .map(|i| image::RgbaImage::from_pixel(32, 16, image::Rgba([i * 100, 0, 0, 255])))
        .collect();
    let out = dir.path().join("nested/video.mp4");
    let path = assemble_video(&frames, one_fps(), Some(&wav), &out).unwrap();
    assert_eq!(path, out);
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}
