use crate::foundation::error::{SlidewaveError, SlidewaveResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> SlidewaveResult<Self> {
        if width == 0 || height == 0 {
            return Err(SlidewaveError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }
}

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const MID_GRAY: Self = Self::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional). Returns `None` on malformed input.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse `#RRGGBB`, falling back to opaque white on malformed input.
    pub fn parse_hex_or_white(s: &str) -> Self {
        Self::parse_hex(s).unwrap_or_else(|| {
            tracing::warn!(value = s, "malformed hex color, using white");
            Self::WHITE
        })
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Rational frame rate. Slides map to one frame each, so `num/den` is `1000/slide_duration_ms`
/// reduced to lowest terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> SlidewaveResult<Self> {
        if den == 0 {
            return Err(SlidewaveError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SlidewaveError::validation("Fps num must be > 0"));
        }
        let g = crate::foundation::math::gcd(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    pub fn from_slide_duration_ms(slide_duration_ms: u32) -> SlidewaveResult<Self> {
        if slide_duration_ms == 0 {
            return Err(SlidewaveError::validation(
                "slide_duration_ms must be > 0",
            ));
        }
        Self::new(1000, slide_duration_ms)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

/// Playback rate in frames per second for slides of `slide_duration_ms` each.
pub fn playback_rate(slide_duration_ms: u32) -> f64 {
    1000.0 / f64::from(slide_duration_ms)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
