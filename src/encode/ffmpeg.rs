use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    foundation::core::{Fps, Rgb8},
    foundation::error::{SlidewaveError, SlidewaveResult},
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    /// WAV muxed as the second input; silent video when `None`.
    pub audio_path: Option<PathBuf>,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> SlidewaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SlidewaveError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(SlidewaveError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SlidewaveError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if let Some(audio) = &self.audio_path
            && !audio.is_file()
        {
            return Err(SlidewaveError::validation(format!(
                "audio input '{}' does not exist",
                audio.display()
            )));
        }
        Ok(())
    }
}

pub fn default_mp4_config(
    out_path: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fps: Fps,
    audio_path: Option<PathBuf>,
) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        audio_path,
        out_path: out_path.into(),
        overwrite: true,
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> SlidewaveResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Argument list for one encode, without the program name.
pub fn ffmpeg_args(cfg: &EncodeConfig) -> Vec<String> {
    let mut args = vec![String::from(if cfg.overwrite { "-y" } else { "-n" })];
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
        ]
        .map(String::from),
    );
    match &cfg.audio_path {
        Some(audio) => {
            args.push("-i".into());
            args.push(audio.to_string_lossy().into_owned());
            args.extend(
                ["-map", "0:v:0", "-map", "1:a:0", "-c:a", "aac", "-b:a", "192k"].map(String::from),
            );
        }
        None => args.push("-an".into()),
    }
    args.extend(
        [
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );
    args.push(cfg.out_path.to_string_lossy().into_owned());
    args
}

/// Streams raw RGBA frames into a system `ffmpeg` process.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    bg: Rgb8,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, bg: Rgb8) -> SlidewaveResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(SlidewaveError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(SlidewaveError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .args(ffmpeg_args(&cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SlidewaveError::encode(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SlidewaveError::encode("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            scratch: vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4],
            cfg,
            bg,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &image::RgbaImage) -> SlidewaveResult<()> {
        let (w, h) = frame.dimensions();
        if (w, h) != (self.cfg.width, self.cfg.height) {
            return Err(SlidewaveError::encode(format!(
                "frame size mismatch: got {w}x{h}, expected {}x{}",
                self.cfg.width, self.cfg.height
            )));
        }

        flatten_to_opaque_rgba8(&mut self.scratch, frame.as_raw(), self.bg)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlidewaveError::encode("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            SlidewaveError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    pub fn finish(mut self) -> SlidewaveResult<()> {
        drop(self.stdin.take());

        let output = self.child.wait_with_output().map_err(|e| {
            SlidewaveError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SlidewaveError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Mux `frames` (one per slide) with `audio` into `out_path`.
///
/// The output must exist and be non-empty afterwards. On any failure a partially written
/// output file is removed.
#[tracing::instrument(skip(frames), fields(frames = frames.len()))]
pub fn assemble_video(
    frames: &[image::RgbaImage],
    fps: Fps,
    audio: Option<&Path>,
    out_path: &Path,
) -> SlidewaveResult<PathBuf> {
    let result = encode_all(frames, fps, audio, out_path);
    if result.is_err() && out_path.exists() {
        if let Err(e) = std::fs::remove_file(out_path) {
            tracing::warn!(path = %out_path.display(), "failed to remove partial output: {e}");
        }
    }
    result?;
    tracing::info!(path = %out_path.display(), "video assembled");
    Ok(out_path.to_path_buf())
}

fn encode_all(
    frames: &[image::RgbaImage],
    fps: Fps,
    audio: Option<&Path>,
    out_path: &Path,
) -> SlidewaveResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| SlidewaveError::encode("no frames to assemble"))?;
    let (w, h) = first.dimensions();
    let cfg = default_mp4_config(out_path, w, h, fps, audio.map(Path::to_path_buf));

    let mut enc = FfmpegEncoder::new(cfg, Rgb8::WHITE)?;
    for frame in frames {
        enc.encode_frame(frame)?;
    }
    enc.finish()?;

    let len = std::fs::metadata(out_path).map(|m| m.len()).unwrap_or(0);
    if len == 0 {
        return Err(SlidewaveError::encode(format!(
            "ffmpeg finished but '{}' is missing or empty",
            out_path.display()
        )));
    }
    Ok(())
}

/// Composite straight-alpha RGBA over `bg`, producing fully opaque pixels.
fn flatten_to_opaque_rgba8(dst: &mut [u8], src: &[u8], bg: Rgb8) -> SlidewaveResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SlidewaveError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg.r);
    let bg_g = u16::from(bg.g);
    let bg_b = u16::from(bg.b);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let r = mul_div255(u16::from(s[0]), a) + mul_div255(bg_r, inv);
        let g = mul_div255(u16::from(s[1]), a) + mul_div255(bg_g, inv);
        let b = mul_div255(u16::from(s[2]), a) + mul_div255(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
