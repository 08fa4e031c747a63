//! Quad compositing, the backend of `gsquare`.
//!
//! Solid quads are filled as polygons. Image quads are an axis-aligned
//! approximation: the source bounding box is scaled onto the destination
//! bounding box, there is no projective mapping. Four-corner gradients are
//! rasterized on the CPU, inverting the bilinear map of the quad at every
//! pixel center, and uploaded as one bitmap.

use crate::geom::{IRect, Point, Transform};
use crate::render::{Bitmap, BitmapUsage, Blit, CompositeOp, Context, Paint};
use crate::{ColorU8, Error, Quad, QuadColors, color};

const NEWTON_MAX_ITER: usize = 10;
const NEWTON_TOLERANCE: f32 = 0.01;
const SINGULAR_DET: f32 = 1e-9;

/// Draws quads into a render target through a drawing context
pub struct QuadCompositor<'a> {
    ctx: &'a mut dyn Context,
    target: &'a mut Bitmap,
}

impl std::fmt::Debug for QuadCompositor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadCompositor")
            .field("target", &self.target.size())
            .field("drawing", &self.ctx.is_drawing())
            .finish_non_exhaustive()
    }
}

impl<'a> QuadCompositor<'a> {
    pub fn new(ctx: &'a mut dyn Context, target: &'a mut Bitmap) -> Self {
        QuadCompositor { ctx, target }
    }

    /// Fill the polygon of the quad with a color (winding rule)
    pub fn fill_quad(&mut self, quad: &Quad, color: ColorU8) {
        if let Some(path) = quad.to_path() {
            self.ctx
                .fill_path(self.target, &path, &Paint::solid(color), Transform::identity());
        }
    }

    /// Copy the bounding box of `src_quad` in `src` onto the bounding box of `dst_quad`.
    ///
    /// `blit` provides the compositing; its source rect and transform are replaced.
    pub fn blit_quad(
        &mut self,
        src: &Bitmap,
        src_quad: &Quad,
        dst_quad: &Quad,
        blit: &Blit,
    ) -> Result<(), Error> {
        let Some(src_rect) = src_quad.bounds().intersect(&src.rect()) else {
            return Ok(());
        };
        let dst = dst_quad.bounds();
        if dst.is_empty() {
            return Ok(());
        }
        let sx = dst.width() as f32 / src_rect.width() as f32;
        let sy = dst.height() as f32 / src_rect.height() as f32;
        let blit = Blit {
            src_rect,
            transform: Transform::from_scale(sx, sy).post_translate(dst.x() as f32, dst.y() as f32),
            ..*blit
        };
        self.ctx.draw_bitmap(self.target, src, &blit)
    }

    /// Fill the quad with the bilinear interpolation of the four vertex colors
    pub fn gradient_quad(&mut self, quad: &Quad, colors: &QuadColors) -> Result<(), Error> {
        let Some((rect, pixels)) = rasterize_gradient(quad, colors, self.target.rect()) else {
            return Ok(());
        };
        let bitmap = Bitmap::from_colors(rect.width(), rect.height(), BitmapUsage::SOURCE, &pixels)?;
        let blit = Blit {
            op: CompositeOp::SourceOver,
            ..Blit::copy(bitmap.rect(), rect.x(), rect.y())
        };
        self.ctx.draw_bitmap(self.target, &bitmap, &blit)
    }
}

/// Rasterize a four-corner gradient over the bounding box of the quad, clipped to `clip`.
///
/// Returns the rasterized rectangle and its pixels in row order. Pixels outside
/// of the quad, or where the bilinear map can't be inverted, are transparent.
pub fn rasterize_gradient(
    quad: &Quad,
    colors: &QuadColors,
    clip: IRect,
) -> Option<(IRect, Vec<ColorU8>)> {
    let rect = quad.bounds().intersect(&clip)?;
    let pts = quad.points();
    let mut pixels = Vec::with_capacity((rect.width() * rect.height()) as usize);
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            let p = Point::from_xy(x as f32 + 0.5, y as f32 + 0.5);
            let px = if point_in_quad(&pts, p) {
                inverse_bilinear(&pts, p).map(|(u, v)| colors.sample(u, v))
            } else {
                None
            };
            pixels.push(px.unwrap_or(color::TRANSPARENT));
        }
    }
    Some((rect, pixels))
}

/// Whether a point is inside a convex quad.
///
/// All edge cross products must share the same sign. A point on an edge is inside.
pub fn point_in_quad(pts: &[Point; 4], p: Point) -> bool {
    let mut pos = false;
    let mut neg = false;
    for i in 0..4 {
        let a = pts[i];
        let b = pts[(i + 1) % 4];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross > 0.0 {
            pos = true;
        } else if cross < 0.0 {
            neg = true;
        }
    }
    !(pos && neg)
}

fn bilinear(pts: &[Point; 4], u: f32, v: f32) -> Point {
    let w = [(1.0 - u) * (1.0 - v), u * (1.0 - v), u * v, (1.0 - u) * v];
    let mut p = Point::zero();
    for (pt, w) in pts.iter().zip(w) {
        p.x += pt.x * w;
        p.y += pt.y * w;
    }
    p
}

/// Find `(u, v)` in `[0, 1]²` such that the bilinear map of the quad at `(u, v)` is `p`.
///
/// Newton-Raphson from the quad center, clamping `(u, v)` at each step.
/// `None` if the jacobian is singular or the iteration does not converge.
pub fn inverse_bilinear(pts: &[Point; 4], p: Point) -> Option<(f32, f32)> {
    let [p0, p1, p2, p3] = *pts;
    let (mut u, mut v) = (0.5f32, 0.5f32);
    for _ in 0..NEWTON_MAX_ITER {
        let q = bilinear(pts, u, v);
        let (fx, fy) = (q.x - p.x, q.y - p.y);
        if fx.hypot(fy) < NEWTON_TOLERANCE {
            return Some((u, v));
        }
        // partial derivatives of the map
        let du_x = (1.0 - v) * (p1.x - p0.x) + v * (p2.x - p3.x);
        let du_y = (1.0 - v) * (p1.y - p0.y) + v * (p2.y - p3.y);
        let dv_x = (1.0 - u) * (p3.x - p0.x) + u * (p2.x - p1.x);
        let dv_y = (1.0 - u) * (p3.y - p0.y) + u * (p2.y - p1.y);
        let det = du_x * dv_y - du_y * dv_x;
        if det.abs() < SINGULAR_DET {
            return None;
        }
        u = (u - (fx * dv_y - fy * dv_x) / det).clamp(0.0, 1.0);
        v = (v - (du_x * fy - du_y * fx) / det).clamp(0.0, 1.0);
    }
    let q = bilinear(pts, u, v);
    ((q.x - p.x).hypot(q.y - p.y) < NEWTON_TOLERANCE).then_some((u, v))
}
