use std::{
    io::Write as _,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    audio::track::AudioTrack,
    config::model::Config,
    foundation::error::{SlidewaveError, SlidewaveResult},
};

/// Text-to-speech backend: writes an audio file for `text` somewhere under `out_dir`.
pub trait SpeechProvider {
    fn synthesize(&self, text: &str, out_dir: &Path) -> SlidewaveResult<PathBuf>;
}

pub const TEXT_PLACEHOLDER: &str = "{text}";
pub const OUT_PLACEHOLDER: &str = "{out}";
const SPEECH_FILE: &str = "speech.wav";

/// Runs an external TTS program built from an argv template.
///
/// `{out}` is replaced with the output path and `{text}` with the text. When no argument holds
/// `{text}`, the text is written to the program's stdin instead.
#[derive(Clone, Debug)]
pub struct CommandSpeech {
    argv: Vec<String>,
}

impl CommandSpeech {
    pub fn new(argv: Vec<String>) -> SlidewaveResult<Self> {
        if argv.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(SlidewaveError::validation(
                "speech command must name a program",
            ));
        }
        Ok(Self { argv })
    }

    pub fn from_config(cfg: &Config) -> SlidewaveResult<Self> {
        Self::new(cfg.tts_command.clone())
    }

    /// Substituted argv for one call.
    pub fn argv_for(&self, text: &str, out: &Path) -> Vec<String> {
        let out = out.to_string_lossy();
        self.argv
            .iter()
            .map(|a| a.replace(OUT_PLACEHOLDER, &out).replace(TEXT_PLACEHOLDER, text))
            .collect()
    }

    fn text_via_stdin(&self) -> bool {
        !self.argv.iter().any(|a| a.contains(TEXT_PLACEHOLDER))
    }
}

impl SpeechProvider for CommandSpeech {
    #[tracing::instrument(skip(self, text))]
    fn synthesize(&self, text: &str, out_dir: &Path) -> SlidewaveResult<PathBuf> {
        let out = out_dir.join(SPEECH_FILE);
        let argv = self.argv_for(text, &out);
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| SlidewaveError::audio("empty speech command"))?;

        let stdin = if self.text_via_stdin() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(stdin)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SlidewaveError::audio(format!("failed to spawn '{program}': {e}")))?;

        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(text.as_bytes())
                .context("write text to speech command stdin")?;
        }

        let output = child
            .wait_with_output()
            .context("wait for speech command")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SlidewaveError::audio(format!(
                "speech command '{program}' exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let len = std::fs::metadata(&out).map(|m| m.len()).unwrap_or(0);
        if len == 0 {
            return Err(SlidewaveError::audio(format!(
                "speech command '{program}' produced no audio at '{}'",
                out.display()
            )));
        }
        Ok(out)
    }
}

/// Load speech audio as mono `f32` at `sample_rate`.
///
/// Mono WAV files at the right rate are read directly; anything else is decoded by ffmpeg.
pub fn load_speech_samples(path: &Path, sample_rate: u32) -> SlidewaveResult<Vec<f32>> {
    if let Ok(reader) = hound::WavReader::open(path) {
        let spec = reader.spec();
        if spec.channels == 1 && spec.sample_rate == sample_rate {
            return read_wav_samples(reader, path);
        }
        tracing::debug!(
            channels = spec.channels,
            rate = spec.sample_rate,
            "speech wav needs conversion, decoding with ffmpeg"
        );
    }
    decode_audio_f32_mono(path, sample_rate)
}

fn read_wav_samples<R: std::io::Read>(
    reader: hound::WavReader<R>,
    path: &Path,
) -> SlidewaveResult<Vec<f32>> {
    let spec = reader.spec();
    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, _) => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>(),
        (hound::SampleFormat::Int, bits @ 1..=32) => {
            let scale = (1u64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()
        }
        (_, bits) => {
            return Err(SlidewaveError::audio(format!(
                "unsupported wav bit depth {bits} in '{}'",
                path.display()
            )));
        }
    };
    Ok(samples.with_context(|| format!("read wav samples '{}'", path.display()))?)
}

/// Decode any ffmpeg-readable audio file to mono `f32` at `sample_rate`.
pub fn decode_audio_f32_mono(path: &Path, sample_rate: u32) -> SlidewaveResult<Vec<f32>> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "1",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| SlidewaveError::audio(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        return Err(SlidewaveError::audio(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(SlidewaveError::audio(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let mut pcm = Vec::<f32>::with_capacity(out.stdout.len() / 4);
    for chunk in out.stdout.chunks_exact(4) {
        pcm.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(pcm)
}

/// Synthesize `text` and sum it onto `track` from the start.
pub fn mix_speech<P: SpeechProvider + ?Sized>(
    provider: &P,
    text: &str,
    work_dir: &Path,
    track: &mut AudioTrack,
) -> SlidewaveResult<()> {
    let path = provider.synthesize(text, work_dir)?;
    let speech = load_speech_samples(&path, track.sample_rate)?;
    tracing::info!(
        speech_samples = speech.len(),
        track_samples = track.len(),
        "mixing speech into track"
    );
    track.overlay(&speech);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/audio/speech.rs"]
mod tests;
