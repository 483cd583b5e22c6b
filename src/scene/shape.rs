use kurbo::Shape as _;
use rand::{Rng, seq::SliceRandom as _};

use crate::{
    config::model::{DeformationLevel, ShapeKind},
    foundation::core::{BezPath, Canvas, Point, Rect, Rgb8},
};

const CURVE_TOLERANCE: f64 = 0.1;

/// Shape bounding-box limits in pixels. Invariant (checked by config validation): `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SizeBounds {
    pub min_w: u32,
    pub min_h: u32,
    pub max_w: u32,
    pub max_h: u32,
}

impl SizeBounds {
    /// Size every shape gets under [`DeformationLevel::None`].
    pub fn midpoint(self) -> ShapeSize {
        ShapeSize {
            w: self.min_w + (self.max_w - self.min_w) / 2,
            h: self.min_h + (self.max_h - self.min_h) / 2,
        }
    }

    /// Inclusive sampling range `(lo, hi)` for one axis under `level`.
    fn axis_range(level: DeformationLevel, min: u32, max: u32) -> (u32, u32) {
        let span = max.saturating_sub(min);
        match level {
            DeformationLevel::None => {
                let mid = min + span / 2;
                (mid, mid)
            }
            DeformationLevel::Low => (min, min + span / 4),
            DeformationLevel::Medium => (min, min + span / 2),
            DeformationLevel::High => (min, max),
        }
    }

    pub fn sample<R: Rng + ?Sized>(self, level: DeformationLevel, rng: &mut R) -> ShapeSize {
        if level == DeformationLevel::None {
            return self.midpoint();
        }
        let (w_lo, w_hi) = Self::axis_range(level, self.min_w, self.max_w);
        let (h_lo, h_hi) = Self::axis_range(level, self.min_h, self.max_h);
        ShapeSize {
            w: rng.gen_range(w_lo..=w_hi),
            h: rng.gen_range(h_lo..=h_hi),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ShapeSize {
    pub w: u32,
    pub h: u32,
}

/// Where shape colors come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Independent uniform channels.
    Random,
    /// Uniform pick from a palette (an unknown scheme resolves to a mid-gray palette).
    Palette(&'static [Rgb8]),
    Solid(Rgb8),
}

impl ColorPolicy {
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> Rgb8 {
        match self {
            Self::Random => Rgb8::new(rng.r#gen(), rng.r#gen(), rng.r#gen()),
            Self::Palette(colors) => colors.choose(rng).copied().unwrap_or(Rgb8::MID_GRAY),
            Self::Solid(c) => c,
        }
    }
}

/// One generated shape. Never mutated after generation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub anchor: Point,
    pub size: ShapeSize,
    pub color: Rgb8,
    /// Outline for triangle, polygon and star; empty for box-derived kinds.
    pub vertices: Vec<Point>,
}

impl Shape {
    /// Axis-aligned box anchored at the top-left `anchor`.
    pub fn bounding_box(&self) -> Rect {
        Rect::new(
            self.anchor.x,
            self.anchor.y,
            self.anchor.x + f64::from(self.size.w),
            self.anchor.y + f64::from(self.size.h),
        )
    }

    pub fn circle_radius(&self) -> f64 {
        f64::from(self.size.w.min(self.size.h)) / 2.0
    }

    /// Fillable outline in canvas coordinates.
    pub fn to_path(&self) -> BezPath {
        match self.kind {
            ShapeKind::Rectangle => self.bounding_box().to_path(CURVE_TOLERANCE),
            ShapeKind::Ellipse => {
                kurbo::Ellipse::from_rect(self.bounding_box()).to_path(CURVE_TOLERANCE)
            }
            ShapeKind::Circle => {
                kurbo::Circle::new(self.anchor, self.circle_radius()).to_path(CURVE_TOLERANCE)
            }
            ShapeKind::Triangle | ShapeKind::Polygon | ShapeKind::Star => {
                polygon_path(&self.vertices)
            }
        }
    }
}

fn polygon_path(vertices: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut it = vertices.iter();
    if let Some(&first) = it.next() {
        path.move_to(first);
        for &p in it {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

/// Everything the generator needs, resolved once per batch from the config.
#[derive(Clone, Debug)]
pub struct ShapeSpec {
    pub canvas: Canvas,
    pub bounds: SizeBounds,
    pub deformation: DeformationLevel,
    pub color: ColorPolicy,
    /// Falls back to every kind when empty.
    pub kinds: Vec<ShapeKind>,
}

impl ShapeSpec {
    pub fn from_config(cfg: &crate::config::model::Config) -> Self {
        Self {
            canvas: cfg.canvas(),
            bounds: cfg.shape_bounds(),
            deformation: cfg.deformation,
            color: cfg.color_policy(),
            kinds: cfg.shape_kinds().to_vec(),
        }
    }

    /// Produce one random shape. Total for any canvas and bounds.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        let kind = self
            .kinds
            .choose(rng)
            .copied()
            .or_else(|| ShapeKind::ALL.choose(rng).copied())
            .unwrap_or_default();
        let anchor = self.random_point(rng);
        let size = self.bounds.sample(self.deformation, rng);
        let color = self.color.pick(rng);

        let vertices = match kind {
            ShapeKind::Rectangle | ShapeKind::Ellipse | ShapeKind::Circle => Vec::new(),
            ShapeKind::Triangle => triangle_vertices(anchor, size, rng),
            ShapeKind::Polygon => {
                let n = rng.gen_range(3..=6);
                (0..n).map(|_| self.random_point(rng)).collect()
            }
            ShapeKind::Star => star_vertices(anchor, size),
        };

        Shape {
            kind,
            anchor,
            size,
            color,
            vertices,
        }
    }

    fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(
            f64::from(rng.gen_range(0..self.canvas.width.max(1))),
            f64::from(rng.gen_range(0..self.canvas.height.max(1))),
        )
    }
}

/// Anchor plus two corners jittered inside the `size` box below-right of it.
fn triangle_vertices<R: Rng + ?Sized>(anchor: Point, size: ShapeSize, rng: &mut R) -> Vec<Point> {
    let (w, h) = (f64::from(size.w), f64::from(size.h));
    vec![
        anchor,
        Point::new(anchor.x + w, anchor.y + h * rng.gen_range(0.0..=1.0)),
        Point::new(anchor.x + w * rng.gen_range(0.0..=1.0), anchor.y + h),
    ]
}

/// Five-point star: 10 vertices alternating between the outer radius (the smaller side of
/// `size`) and half of it, starting straight up from the anchor.
fn star_vertices(anchor: Point, size: ShapeSize) -> Vec<Point> {
    let outer = f64::from(size.w.min(size.h));
    let inner = outer / 2.0;
    (0..10u32)
        .map(|i| {
            let angle = f64::from(i) * std::f64::consts::PI / 5.0 - std::f64::consts::FRAC_PI_2;
            let r = if i % 2 == 0 { outer } else { inner };
            Point::new(anchor.x + r * angle.cos(), anchor.y + r * angle.sin())
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/shape.rs"]
mod tests;
