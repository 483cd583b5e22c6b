use crate::{
    foundation::core::{Affine, BezPath, Canvas, Point, Rgb8},
    foundation::error::{SlidewaveError, SlidewaveResult},
    scene::text::{TextBlock, TextRenderer},
};

/// One slide being painted on the CPU.
///
/// Draw calls are recorded into a `vello_cpu` context and rasterized by [`Raster::finish`].
pub struct Raster {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
}

impl Raster {
    pub fn new(canvas: Canvas) -> SlidewaveResult<Self> {
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fill_background(&mut self, color: Rgb8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            self.canvas.width_f64(),
            self.canvas.height_f64(),
        ));
    }

    pub fn fill_path(&mut self, path: &BezPath, color: Rgb8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint(color));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Draw a shaped block with its top-left corner at `origin`.
    pub fn draw_text(&mut self, renderer: &TextRenderer, block: &TextBlock, origin: Point) {
        let font = renderer.font();
        self.ctx
            .set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));

        for line in block.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize everything drawn so far into straight RGBA8.
    ///
    /// Slides are painted over an opaque background, so the premultiplied pixmap bytes are
    /// already straight alpha.
    pub fn finish(mut self) -> SlidewaveResult<image::RgbaImage> {
        let (w, h) = canvas_u16(self.canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let bytes = pixmap.data_as_u8_slice().to_vec();
        image::RgbaImage::from_raw(self.canvas.width, self.canvas.height, bytes)
            .ok_or_else(|| SlidewaveError::render("rasterized pixmap has unexpected size"))
    }
}

fn canvas_u16(canvas: Canvas) -> SlidewaveResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| SlidewaveError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| SlidewaveError::render("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(SlidewaveError::render("canvas width and height must be > 0"));
    }
    Ok((w, h))
}

fn paint(color: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/scene/raster.rs"]
mod tests;
