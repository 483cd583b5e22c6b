use rand::Rng;

/// Resolved parameters for one slide's waveform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub frequency_hz: f64,
    /// Peak amplitude in `[0, 1]`.
    pub amplitude: f64,
    /// Depth of the 0.5 Hz tremolo in `[0, 1]`.
    pub modulation: f64,
}

/// Named waveform parameter preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vibe {
    Calm,
    Energetic,
    Dreamy,
    Dark,
    Bright,
    Chaotic,
    /// Fresh uniform parameters on every draw.
    Random,
}

const FREQ_JITTER: f64 = 0.3;
const AMP_JITTER: f64 = 0.3;
const MOD_JITTER: f64 = 0.4;

impl Vibe {
    pub const ALL: &'static [Self] = &[
        Self::Calm,
        Self::Energetic,
        Self::Dreamy,
        Self::Dark,
        Self::Bright,
        Self::Chaotic,
        Self::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Calm => "calm",
            Self::Energetic => "energetic",
            Self::Dreamy => "dreamy",
            Self::Dark => "dark",
            Self::Bright => "bright",
            Self::Chaotic => "chaotic",
            Self::Random => "random",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(name))
    }

    /// Resolve a configured vibe name; unknown names fall back to [`Vibe::Random`].
    pub fn from_name_or_random(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(vibe = name, "unknown vibe, using random");
            Self::Random
        })
    }

    /// Centre values of the preset. `None` for [`Vibe::Random`].
    pub fn preset(self) -> Option<WaveParams> {
        let (frequency_hz, amplitude, modulation) = match self {
            Self::Calm => (220.0, 0.4, 0.2),
            Self::Energetic => (660.0, 0.8, 0.6),
            Self::Dreamy => (330.0, 0.5, 0.7),
            Self::Dark => (110.0, 0.6, 0.3),
            Self::Bright => (880.0, 0.6, 0.4),
            Self::Chaotic => (500.0, 0.9, 0.9),
            Self::Random => return None,
        };
        Some(WaveParams {
            frequency_hz,
            amplitude,
            modulation,
        })
    }

    /// Draw parameters for one slide: jittered preset, or uniform fresh values for `Random`.
    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> WaveParams {
        let Some(p) = self.preset() else {
            return WaveParams {
                frequency_hz: rng.gen_range(100.0..=1000.0),
                amplitude: rng.gen_range(0.1..=1.0),
                modulation: rng.gen_range(0.1..=1.0),
            };
        };
        WaveParams {
            frequency_hz: jitter(p.frequency_hz, FREQ_JITTER, rng),
            amplitude: jitter(p.amplitude, AMP_JITTER, rng).clamp(0.0, 1.0),
            modulation: jitter(p.modulation, MOD_JITTER, rng).clamp(0.0, 1.0),
        }
    }
}

fn jitter<R: Rng + ?Sized>(value: f64, fraction: f64, rng: &mut R) -> f64 {
    value * (1.0 + rng.gen_range(-fraction..=fraction))
}

impl std::fmt::Display for Vibe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/vibe.rs"]
mod tests;
