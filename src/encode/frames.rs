use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    config::model::FrameMismatchPolicy,
    foundation::error::{SlidewaveError, SlidewaveResult},
};

pub fn load_frame(path: &Path) -> SlidewaveResult<image::RgbaImage> {
    let img = image::open(path).with_context(|| format!("decode frame '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

/// Load every frame and make them agree with the first frame's dimensions.
pub fn load_frames(
    paths: &[PathBuf],
    policy: FrameMismatchPolicy,
) -> SlidewaveResult<Vec<image::RgbaImage>> {
    if paths.is_empty() {
        return Err(SlidewaveError::encode("no frames to assemble"));
    }
    let frames = paths
        .iter()
        .map(|p| load_frame(p))
        .collect::<SlidewaveResult<Vec<_>>>()?;
    conform_frames(frames, policy)
}

/// Check every frame against the first one. `Reject` fails on the first mismatch; `Resize`
/// rescales the offender.
pub fn conform_frames(
    mut frames: Vec<image::RgbaImage>,
    policy: FrameMismatchPolicy,
) -> SlidewaveResult<Vec<image::RgbaImage>> {
    let Some(first) = frames.first() else {
        return Ok(frames);
    };
    let (w, h) = first.dimensions();

    for (i, frame) in frames.iter_mut().enumerate().skip(1) {
        let got = frame.dimensions();
        if got == (w, h) {
            continue;
        }
        match policy {
            FrameMismatchPolicy::Reject => {
                return Err(SlidewaveError::encode(format!(
                    "frame {i} is {}x{}, expected {w}x{h}",
                    got.0, got.1
                )));
            }
            FrameMismatchPolicy::Resize => {
                tracing::warn!(
                    frame = i,
                    got_w = got.0,
                    got_h = got.1,
                    want_w = w,
                    want_h = h,
                    "frame shape mismatch, resizing; content may be distorted"
                );
                *frame =
                    image::imageops::resize(frame, w, h, image::imageops::FilterType::Triangle);
            }
        }
    }
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/frames.rs"]
mod tests;
