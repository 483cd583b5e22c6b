use super::*;

fn solid(w: u32, h: u32, v: u8) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba([v, v, v, 255]))
}

#[test]
fn matching_frames_pass_unchanged() {
    let frames = vec![solid(4, 2, 1), solid(4, 2, 2)];
    let out = conform_frames(frames.clone(), FrameMismatchPolicy::Reject).unwrap();
    assert_eq!(out, frames);
}

#[test]
fn reject_policy_fails_on_mismatch() {
    let frames = vec![solid(4, 2, 1), solid(4, 2, 2), solid(6, 2, 3)];
    let err = conform_frames(frames, FrameMismatchPolicy::Reject).unwrap_err();
    assert!(matches!(err, SlidewaveError::Encode(_)));
    assert!(err.to_string().contains("frame 2 is 6x2"), "{err}");
}

#[test]
fn resize_policy_restores_first_frame_shape() {
    let frames = vec![solid(4, 2, 1), solid(8, 8, 200)];
    let out = conform_frames(frames, FrameMismatchPolicy::Resize).unwrap();
    assert_eq!(out[1].dimensions(), (4, 2));
    assert_eq!(out[1].get_pixel(0, 0).0, [200, 200, 200, 255]);
}

#[test]
fn empty_frame_list_is_an_error() {
    assert!(load_frames(&[], FrameMismatchPolicy::Resize).is_err());
}

#[test]
fn frames_load_from_disk_in_given_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = [(0u8, "slide_0000_z.png"), (1, "slide_0001_a.png"), (2, "slide_0002_b.png")]
        .into_iter()
        .map(|(v, name)| {
            let path = dir.path().join(name);
            solid(2, 2, v).save(&path).unwrap();
            path
        })
        .collect();

    let frames = load_frames(&paths, FrameMismatchPolicy::Reject).unwrap();
    let firsts: Vec<_> = frames.iter().map(|f| f.get_pixel(0, 0).0[0]).collect();
    assert_eq!(firsts, [0, 1, 2]);
}
