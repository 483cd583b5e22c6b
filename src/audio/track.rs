use std::path::Path;

use anyhow::Context as _;
use rand::Rng;

use crate::{
    audio::synth::Synthesizer,
    foundation::error::{SlidewaveError, SlidewaveResult},
};

/// Scale from unit float samples to 16-bit PCM.
pub const PCM16_SCALE: f32 = 32767.0;

/// Full-length mono track for one video, samples nominally in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl AudioTrack {
    /// Concatenate per-slide buffers in slide order.
    pub fn from_buffers<I>(sample_rate: u32, buffers: I) -> Self
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let mut samples = Vec::new();
        for b in buffers {
            samples.extend(b);
        }
        Self {
            sample_rate,
            samples,
        }
    }

    /// One buffer per entry of `durations_ms`, synthesized in order.
    pub fn synthesize<R: Rng + ?Sized>(
        synth: &Synthesizer,
        durations_ms: &[u32],
        rng: &mut R,
    ) -> Self {
        Self::from_buffers(
            synth.sample_rate,
            durations_ms
                .iter()
                .map(|&ms| synth.buffer(ms, None, rng).samples),
        )
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate.max(1))
    }

    /// Sum `speech` onto the track from sample 0, clamping to `[-1, 1]`.
    ///
    /// The track keeps its length; speech past the end is dropped.
    pub fn overlay(&mut self, speech: &[f32]) {
        for (dst, &src) in self.samples.iter_mut().zip(speech) {
            *dst = (*dst + src).clamp(-1.0, 1.0);
        }
    }

    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples.iter().copied().map(quantize_sample).collect()
    }

    /// Write as 16-bit mono linear PCM WAV.
    pub fn write_wav(&self, path: &Path) -> SlidewaveResult<()> {
        if self.sample_rate == 0 {
            return Err(SlidewaveError::audio("sample rate must be > 0"));
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .with_context(|| format!("create wav '{}'", path.display()))?;
        for s in self.to_pcm16() {
            writer
                .write_sample(s)
                .with_context(|| format!("write wav '{}'", path.display()))?;
        }
        writer
            .finalize()
            .with_context(|| format!("finalize wav '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), samples = self.samples.len(), "track written");
        Ok(())
    }
}

/// `round(s * 32767)`. Out-of-range input saturates at the `i16` bounds.
pub fn quantize_sample(s: f32) -> i16 {
    (s * PCM16_SCALE).round() as i16
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
