use std::f64::consts::TAU;

use rand::Rng;

use crate::{
    audio::vibe::{Vibe, WaveParams},
    config::model::{Config, WaveForm},
    foundation::math::samples_for_duration,
};

/// Tremolo rate applied on top of every waveform.
pub const TREMOLO_HZ: f64 = 0.5;
const PULSE_THRESHOLD: f64 = 0.7;
const HARMONIC_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

/// Unit-amplitude sample of `form` at phase `ft` (frequency × time, in cycles).
pub fn raw_sample<R: Rng + ?Sized>(form: WaveForm, ft: f64, rng: &mut R) -> f64 {
    let s = (TAU * ft).sin();
    match form {
        WaveForm::Sine => s,
        WaveForm::Square => {
            if s > 0.0 {
                1.0
            } else if s < 0.0 {
                -1.0
            } else {
                0.0
            }
        }
        WaveForm::Triangle => 2.0 * (2.0 * (ft - (ft + 0.5).floor())).abs() - 1.0,
        WaveForm::Sawtooth => 2.0 * (ft - (ft + 0.5).floor()),
        WaveForm::Noise => rng.gen_range(-1.0..=1.0),
        WaveForm::Pulse => {
            if s > PULSE_THRESHOLD {
                1.0
            } else {
                0.0
            }
        }
        WaveForm::Harmonic => HARMONIC_WEIGHTS
            .iter()
            .zip(1u32..)
            .map(|(w, k)| w * (TAU * ft * f64::from(k)).sin())
            .sum(),
    }
}

/// Gain of the slow tremolo at time `t` seconds.
pub fn tremolo(modulation: f64, t: f64) -> f64 {
    1.0 + modulation * (TAU * TREMOLO_HZ * t).sin()
}

/// Samples for one slide. Length is `round(duration_ms * sample_rate / 1000)`.
pub fn render_wave<R: Rng + ?Sized>(
    form: WaveForm,
    params: WaveParams,
    duration_ms: u32,
    sample_rate: u32,
    volume: f32,
    rng: &mut R,
) -> Vec<f32> {
    let n = samples_for_duration(duration_ms, sample_rate);
    let sr = f64::from(sample_rate.max(1));
    let volume = f64::from(volume);
    (0..n)
        .map(|i| {
            let t = i as f64 / sr;
            let raw = params.amplitude * raw_sample(form, params.frequency_hz * t, rng);
            (raw * tremolo(params.modulation, t) * volume) as f32
        })
        .collect()
}

/// One slide's audio together with the parameters it was drawn from.
#[derive(Clone, Debug)]
pub struct WaveBuffer {
    pub params: WaveParams,
    pub samples: Vec<f32>,
}

/// Waveform Synthesizer bound to one configuration.
#[derive(Clone, Copy, Debug)]
pub struct Synthesizer {
    pub form: WaveForm,
    pub vibe: Vibe,
    pub sample_rate: u32,
    pub volume: f32,
}

impl Synthesizer {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            form: cfg.wave_type,
            vibe: Vibe::from_name_or_random(&cfg.vibe),
            sample_rate: cfg.sample_rate,
            volume: cfg.volume,
        }
    }

    /// Synthesize `duration_ms` of audio. A given `frequency_hz` overrides the vibe's draw.
    pub fn buffer<R: Rng + ?Sized>(
        &self,
        duration_ms: u32,
        frequency_hz: Option<f64>,
        rng: &mut R,
    ) -> WaveBuffer {
        let mut params = self.vibe.draw(rng);
        if let Some(f) = frequency_hz {
            params.frequency_hz = f;
        }
        tracing::debug!(
            form = %self.form,
            frequency_hz = params.frequency_hz,
            amplitude = params.amplitude,
            modulation = params.modulation,
            "waveform parameters"
        );
        let samples = render_wave(
            self.form,
            params,
            duration_ms,
            self.sample_rate,
            self.volume,
            rng,
        );
        WaveBuffer { params, samples }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/synth.rs"]
mod tests;
