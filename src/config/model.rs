use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use serde::Deserialize as _;

use crate::{
    foundation::core::{Canvas, Fps, Rgb8},
    foundation::error::{SlidewaveError, SlidewaveResult},
    resources::palette,
    scene::shape::{ColorPolicy, SizeBounds},
};

/// Declares a closed, string-named config enum. The first alias is the canonical name; lookups
/// ignore case and treat `-`, `_` and spaces alike.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => [$($alias:literal),+ $(,)?]),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical config name.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => named_enum!(@first $($alias),+)),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl FromStr for $name {
            type Err = SlidewaveError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let key = normalize_name(s);
                $(
                    if [$($alias),+].iter().any(|a| normalize_name(a) == key) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(SlidewaveError::validation(format!(
                    "unknown {} '{}'",
                    stringify!($name),
                    s.trim()
                )))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(de)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
                ser.serialize_str(self.name())
            }
        }
    };
    (@first $first:literal $(, $rest:literal)*) => {
        $first
    };
}

named_enum! {
    /// Geometry family of a generated shape.
    pub enum ShapeKind {
        Rectangle => ["rectangle", "rect"],
        Ellipse => ["ellipse", "oval"],
        Polygon => ["polygon"],
        Triangle => ["triangle"],
        Circle => ["circle"],
        Star => ["star"],
    }
    default = Rectangle;
}

named_enum! {
    /// How much a shape's size may vary away from the bounds midpoint.
    pub enum DeformationLevel {
        None => ["none", "off"],
        Low => ["low"],
        Medium => ["medium", "mid"],
        High => ["high"],
    }
    default = Medium;
}

named_enum! {
    pub enum ColorMode {
        Random => ["random"],
        Scheme => ["scheme", "palette"],
        Solid => ["solid"],
    }
    default = Random;
}

named_enum! {
    /// Oscillator family used for every slide of a track.
    pub enum WaveForm {
        Sine => ["sine"],
        Square => ["square"],
        Triangle => ["triangle"],
        Sawtooth => ["sawtooth", "saw"],
        Noise => ["noise", "white_noise"],
        Pulse => ["pulse"],
        Harmonic => ["harmonic", "harmonics"],
    }
    default = Sine;
}

named_enum! {
    /// Caption source.
    pub enum TextMode {
        Random => ["random", "random_chars"],
        Word => ["word", "themed_word", "themed", "words"],
    }
    default = Word;
}

named_enum! {
    pub enum TextPosition {
        TopLeft => ["top_left"],
        TopRight => ["top_right"],
        BottomLeft => ["bottom_left"],
        BottomRight => ["bottom_right"],
        Center => ["center", "centre", "middle"],
        Random => ["random"],
    }
    default = Random;
}

named_enum! {
    /// What the assembler does when a frame's dimensions differ from the first frame's.
    pub enum FrameMismatchPolicy {
        Reject => ["reject", "strict", "fail"],
        Resize => ["resize", "reshape"],
    }
    default = Reject;
}

fn normalize_name(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Deserialize a named enum, replacing unknown names with the default.
fn lenient<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr<Err = SlidewaveError> + Default + std::fmt::Display,
{
    let raw = String::deserialize(de)?;
    Ok(raw.parse().unwrap_or_else(|e| {
        let fallback = T::default();
        tracing::warn!(value = %raw, %fallback, "{e}, using fallback");
        fallback
    }))
}

/// Deserialize a list of shape names, skipping unknown entries.
fn lenient_shapes<'de, D>(de: D) -> Result<Vec<ShapeKind>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(de)?;
    let mut out = Vec::with_capacity(raw.len());
    for name in &raw {
        match name.parse::<ShapeKind>() {
            Ok(kind) if !out.contains(&kind) => out.push(kind),
            Ok(_) => {}
            Err(e) => tracing::warn!("{e}, skipping"),
        }
    }
    Ok(out)
}

/// Upper bound on `volume`. Amplitude and tremolo depth are both at most 1, so a sample peaks at
/// `2 * volume`.
pub const MAX_VOLUME: f32 = 0.5;

/// Immutable run configuration.
///
/// Loaded from JSON; missing keys take the defaults of [`Config::default`] and unknown keys are
/// ignored.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub min_shape_width: u32,
    pub min_shape_height: u32,
    pub max_shape_width: u32,
    pub max_shape_height: u32,
    /// Slides per video.
    pub length: u32,
    /// Videos per batch.
    pub amount: u32,
    pub min_shapes: u32,
    pub max_shapes: u32,
    pub sample_rate: u32,
    pub tts_enabled: bool,
    pub tts_text: String,
    /// Speech command template; `{text}` and `{out}` are substituted per call.
    pub tts_command: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub wave_type: WaveForm,
    pub slide_duration_ms: u32,
    #[serde(deserialize_with = "lenient")]
    pub deformation: DeformationLevel,
    #[serde(deserialize_with = "lenient")]
    pub color_mode: ColorMode,
    pub color_scheme: String,
    pub solid_color: String,
    /// Empty means every kind.
    #[serde(deserialize_with = "lenient_shapes")]
    pub allowed_shapes: Vec<ShapeKind>,
    pub vibe: String,
    pub volume: f32,
    pub text_overlay: bool,
    #[serde(deserialize_with = "lenient")]
    pub text_mode: TextMode,
    pub text_color: String,
    pub text_size: f32,
    #[serde(deserialize_with = "lenient")]
    pub text_position: TextPosition,
    pub word_topic: String,
    pub font_path: Option<PathBuf>,
    pub seed: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub frame_mismatch: FrameMismatchPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            min_shape_width: 20,
            min_shape_height: 20,
            max_shape_width: 200,
            max_shape_height: 200,
            length: 5,
            amount: 1,
            min_shapes: 3,
            max_shapes: 10,
            sample_rate: 44_100,
            tts_enabled: false,
            tts_text: "hello".to_string(),
            tts_command: ["espeak-ng", "-w", "{out}", "{text}"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            wave_type: WaveForm::default(),
            slide_duration_ms: 1000,
            deformation: DeformationLevel::default(),
            color_mode: ColorMode::default(),
            color_scheme: "pastel".to_string(),
            solid_color: "#FFFFFF".to_string(),
            allowed_shapes: ShapeKind::ALL.to_vec(),
            vibe: "calm".to_string(),
            volume: 0.5,
            text_overlay: true,
            text_mode: TextMode::default(),
            text_color: "#000000".to_string(),
            text_size: 32.0,
            text_position: TextPosition::default(),
            word_topic: crate::resources::words::RANDOM_TOPIC.to_string(),
            font_path: None,
            seed: None,
            frame_mismatch: FrameMismatchPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> SlidewaveResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SlidewaveError::validation(format!("invalid config JSON: {e}")))
    }

    pub fn load(path: &Path) -> SlidewaveResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            SlidewaveError::validation(format!("invalid config '{}': {e}", path.display()))
        })
    }

    pub fn validate(&self) -> SlidewaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SlidewaveError::validation(
                "width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SlidewaveError::validation(
                "width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(SlidewaveError::validation(
                "width/height must fit in 16 bits",
            ));
        }
        if self.min_shape_width > self.max_shape_width
            || self.min_shape_height > self.max_shape_height
        {
            return Err(SlidewaveError::validation(
                "shape size bounds must satisfy min <= max",
            ));
        }
        if self.min_shapes > self.max_shapes {
            return Err(SlidewaveError::validation(
                "min_shapes must be <= max_shapes",
            ));
        }
        if self.length == 0 {
            return Err(SlidewaveError::validation("length must be > 0"));
        }
        if self.amount == 0 {
            return Err(SlidewaveError::validation("amount must be > 0"));
        }
        if self.slide_duration_ms == 0 {
            return Err(SlidewaveError::validation(
                "slide_duration_ms must be > 0",
            ));
        }
        if self.sample_rate == 0 {
            return Err(SlidewaveError::validation("sample_rate must be > 0"));
        }
        if !self.volume.is_finite() || self.volume <= 0.0 || self.volume > MAX_VOLUME {
            return Err(SlidewaveError::validation(format!(
                "volume must be in (0, {MAX_VOLUME}]"
            )));
        }
        if !self.text_size.is_finite() || self.text_size <= 0.0 {
            return Err(SlidewaveError::validation(
                "text_size must be finite and > 0",
            ));
        }
        if self.tts_enabled && self.tts_command.is_empty() {
            return Err(SlidewaveError::validation(
                "tts_command must name a program when tts is enabled",
            ));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn shape_bounds(&self) -> SizeBounds {
        SizeBounds {
            min_w: self.min_shape_width,
            min_h: self.min_shape_height,
            max_w: self.max_shape_width,
            max_h: self.max_shape_height,
        }
    }

    /// Shape kinds to draw from; every kind when the configured set is empty.
    pub fn shape_kinds(&self) -> &[ShapeKind] {
        if self.allowed_shapes.is_empty() {
            ShapeKind::ALL
        } else {
            &self.allowed_shapes
        }
    }

    pub fn color_policy(&self) -> ColorPolicy {
        match self.color_mode {
            ColorMode::Random => ColorPolicy::Random,
            ColorMode::Scheme => ColorPolicy::Palette(palette::scheme_or_gray(&self.color_scheme)),
            ColorMode::Solid => ColorPolicy::Solid(Rgb8::parse_hex_or_white(&self.solid_color)),
        }
    }

    pub fn text_rgb(&self) -> Rgb8 {
        Rgb8::parse_hex_or_white(&self.text_color)
    }

    pub fn fps(&self) -> SlidewaveResult<Fps> {
        Fps::from_slide_duration_ms(self.slide_duration_ms)
    }

    /// Per-slide durations in slide order.
    pub fn slide_durations_ms(&self) -> Vec<u32> {
        vec![self.slide_duration_ms; self.length as usize]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
