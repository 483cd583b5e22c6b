use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::Rng;

use crate::{
    config::model::{TextMode, TextPosition},
    foundation::core::{Canvas, Point, Rgb8},
    foundation::error::{SlidewaveError, SlidewaveResult},
    resources::words,
};

/// Environment variable naming the font file used when the config has no `font_path`.
pub const FONT_ENV: &str = "SLIDEWAVE_FONT";

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Pick the font file: explicit path, then [`FONT_ENV`], then well-known system locations.
pub fn resolve_font_path(explicit: Option<&Path>) -> SlidewaveResult<PathBuf> {
    if let Some(p) = explicit {
        if p.is_file() {
            return Ok(p.to_path_buf());
        }
        return Err(SlidewaveError::validation(format!(
            "font_path '{}' does not exist",
            p.display()
        )));
    }
    if let Some(p) = std::env::var_os(FONT_ENV).map(PathBuf::from) {
        if p.is_file() {
            return Ok(p);
        }
        tracing::warn!(path = %p.display(), "{FONT_ENV} does not point at a file, probing system fonts");
    }
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| {
            SlidewaveError::validation(format!(
                "no font found; set font_path in the config or {FONT_ENV}"
            ))
        })
}

pub fn load_font(explicit: Option<&Path>) -> SlidewaveResult<Vec<u8>> {
    let path = resolve_font_path(explicit)?;
    tracing::debug!(path = %path.display(), "loading font");
    let bytes =
        std::fs::read(&path).with_context(|| format!("read font '{}'", path.display()))?;
    Ok(bytes)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgb8> for TextBrushRgba8 {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// A shaped single-line text block.
pub struct TextBlock {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub width: f64,
    pub height: f64,
}

/// Shapes text with one registered font and hands glyph data to the rasterizer.
pub struct TextRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextRenderer {
    pub fn new(font_bytes: Vec<u8>) -> SlidewaveResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SlidewaveError::validation("no font families registered from font bytes")
        })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SlidewaveError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub fn from_config(cfg: &crate::config::model::Config) -> SlidewaveResult<Self> {
        Self::new(load_font(cfg.font_path.as_deref())?)
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    pub fn layout(&mut self, text: &str, size_px: f32, color: Rgb8) -> SlidewaveResult<TextBlock> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SlidewaveError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(TextBlock {
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
            layout,
        })
    }
}

/// Length of a `random`-mode caption.
pub const CAPTION_LEN: usize = 30;

const CAPTION_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%&*()-_=+[]{};:,.<>?/";

pub fn random_caption<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CAPTION_LEN)
        .map(|_| char::from(CAPTION_CHARSET[rng.gen_range(0..CAPTION_CHARSET.len())]))
        .collect()
}

pub fn caption_text<R: Rng + ?Sized>(mode: TextMode, topic: &str, rng: &mut R) -> String {
    match mode {
        TextMode::Random => random_caption(rng),
        TextMode::Word => words::pick_word(topic, rng).to_string(),
    }
}

/// Distance kept between anchored text and the canvas edge.
pub const TEXT_MARGIN: f64 = 10.0;

/// Top-left origin for a `w`×`h` block. `Random` draws a fresh position each call and keeps the
/// block on the canvas when it fits.
pub fn place_text<R: Rng + ?Sized>(
    position: TextPosition,
    canvas: Canvas,
    w: f64,
    h: f64,
    rng: &mut R,
) -> Point {
    let (cw, ch) = (canvas.width_f64(), canvas.height_f64());
    let right = (cw - w - TEXT_MARGIN).max(0.0);
    let bottom = (ch - h - TEXT_MARGIN).max(0.0);
    match position {
        TextPosition::TopLeft => Point::new(TEXT_MARGIN, TEXT_MARGIN),
        TextPosition::TopRight => Point::new(right, TEXT_MARGIN),
        TextPosition::BottomLeft => Point::new(TEXT_MARGIN, bottom),
        TextPosition::BottomRight => Point::new(right, bottom),
        TextPosition::Center => Point::new(((cw - w) / 2.0).max(0.0), ((ch - h) / 2.0).max(0.0)),
        TextPosition::Random => Point::new(
            rng.gen_range(0.0..=(cw - w).max(0.0)),
            rng.gen_range(0.0..=(ch - h).max(0.0)),
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/text.rs"]
mod tests;
