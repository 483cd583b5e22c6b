use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::{Rng, distributions::Alphanumeric};

use crate::{
    config::model::{Config, TextMode, TextPosition},
    foundation::core::{Canvas, Point, Rgb8},
    foundation::error::SlidewaveResult,
    scene::raster::Raster,
    scene::shape::{Shape, ShapeSpec},
    scene::text::{self, TextRenderer},
};

/// Size of the tag and slide-index overlays.
pub const DIAGNOSTIC_SIZE_PX: f32 = 18.0;
const SUFFIX_LEN: usize = 6;

/// A text string as drawn on a slide.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextOverlay {
    pub text: String,
    pub origin: Point,
    pub size_px: f32,
    pub color: Rgb8,
}

/// One rendered frame of a video.
pub struct Slide {
    pub index: u32,
    pub image: image::RgbaImage,
    pub shapes: Vec<Shape>,
    pub overlays: Vec<TextOverlay>,
}

impl Slide {
    /// `slide_0007_k3x9qa.png`: sorts by index, suffix keeps repeated runs from colliding.
    pub fn file_name<R: Rng + ?Sized>(index: u32, rng: &mut R) -> String {
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
            .collect();
        format!("slide_{index:04}_{suffix}.png")
    }

    /// Write into `dir` under [`Slide::file_name`].
    pub fn save<R: Rng + ?Sized>(&self, dir: &Path, rng: &mut R) -> SlidewaveResult<PathBuf> {
        let path = dir.join(Self::file_name(self.index, rng));
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&self, path: &Path) -> SlidewaveResult<()> {
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write slide '{}'", path.display()))?;
        tracing::debug!(index = self.index, path = %path.display(), "slide written");
        Ok(())
    }
}

/// Caption settings resolved once from the config.
#[derive(Clone, Debug)]
struct CaptionStyle {
    enabled: bool,
    mode: TextMode,
    topic: String,
    color: Rgb8,
    size_px: f32,
    position: TextPosition,
}

/// Draws complete slides: background, shapes, caption and diagnostic overlays.
pub struct SceneComposer {
    canvas: Canvas,
    shapes: ShapeSpec,
    shape_count: (u32, u32),
    caption: CaptionStyle,
    text: TextRenderer,
}

impl SceneComposer {
    pub fn new(cfg: &Config, text: TextRenderer) -> Self {
        Self {
            canvas: cfg.canvas(),
            shapes: ShapeSpec::from_config(cfg),
            shape_count: (cfg.min_shapes, cfg.max_shapes.max(cfg.min_shapes)),
            caption: CaptionStyle {
                enabled: cfg.text_overlay,
                mode: cfg.text_mode,
                topic: cfg.word_topic.clone(),
                color: cfg.text_rgb(),
                size_px: cfg.text_size,
                position: cfg.text_position,
            },
            text,
        }
    }

    pub fn from_config(cfg: &Config) -> SlidewaveResult<Self> {
        Ok(Self::new(cfg, TextRenderer::from_config(cfg)?))
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    #[tracing::instrument(skip(self, rng))]
    pub fn compose<R: Rng + ?Sized>(
        &mut self,
        index: u32,
        tag: &str,
        rng: &mut R,
    ) -> SlidewaveResult<Slide> {
        let mut raster = Raster::new(self.canvas)?;
        raster.fill_background(Rgb8::WHITE);

        let (lo, hi) = self.shape_count;
        let count = rng.gen_range(lo..=hi);
        let mut shapes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let shape = self.shapes.generate(rng);
            raster.fill_path(&shape.to_path(), shape.color);
            shapes.push(shape);
        }

        let mut overlays = Vec::with_capacity(3);
        if self.caption.enabled {
            let caption = text::caption_text(self.caption.mode, &self.caption.topic, rng);
            let style = (self.caption.size_px, self.caption.color);
            overlays.push(self.draw_text(
                &mut raster,
                caption,
                self.caption.position,
                style,
                rng,
            )?);
        }

        overlays.push(self.draw_text(
            &mut raster,
            format!("{tag}.mp4"),
            TextPosition::BottomLeft,
            (DIAGNOSTIC_SIZE_PX, Rgb8::BLACK),
            rng,
        )?);
        overlays.push(self.draw_text(
            &mut raster,
            format!("Slide {index}"),
            TextPosition::TopRight,
            (DIAGNOSTIC_SIZE_PX, Rgb8::BLACK),
            rng,
        )?);

        tracing::debug!(index, shapes = shapes.len(), "slide composed");
        Ok(Slide {
            index,
            image: raster.finish()?,
            shapes,
            overlays,
        })
    }

    fn draw_text<R: Rng + ?Sized>(
        &mut self,
        raster: &mut Raster,
        text: String,
        position: TextPosition,
        (size_px, color): (f32, Rgb8),
        rng: &mut R,
    ) -> SlidewaveResult<TextOverlay> {
        let block = self.text.layout(&text, size_px, color)?;
        let origin = text::place_text(position, self.canvas, block.width, block.height, rng);
        raster.draw_text(&self.text, &block, origin);
        Ok(TextOverlay {
            text,
            origin,
            size_px,
            color,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composer.rs"]
mod tests;
