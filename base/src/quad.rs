//! Quadrilaterals used by `gsquare` fills and blits.

use crate::color::ColorU8;
use crate::geom::{IPoint, IRect, Path, PathBuilder, Point};

/// Four integer vertices.
///
/// By convention the winding is top-left, top-right, bottom-right, bottom-left,
/// but any order is accepted: solid fills treat the quad as a general polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quad(pub [IPoint; 4]);

impl Quad {
    pub const fn new(tl: IPoint, tr: IPoint, br: IPoint, bl: IPoint) -> Self {
        Quad([tl, tr, br, bl])
    }

    /// Build a quad from separate X and Y coordinate arrays, the way
    /// legacy programs pass them.
    pub const fn from_xy(xs: [i32; 4], ys: [i32; 4]) -> Self {
        Quad([
            IPoint::new(xs[0], ys[0]),
            IPoint::new(xs[1], ys[1]),
            IPoint::new(xs[2], ys[2]),
            IPoint::new(xs[3], ys[3]),
        ])
    }

    /// Axis aligned quad covering a rectangle
    pub const fn from_rect(rect: &IRect) -> Self {
        let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
        Quad([
            IPoint::new(l, t),
            IPoint::new(r, t),
            IPoint::new(r, b),
            IPoint::new(l, b),
        ])
    }

    pub const fn vertices(&self) -> &[IPoint; 4] {
        &self.0
    }

    /// Vertices as floating point coordinates
    pub fn points(&self) -> [Point; 4] {
        self.0.map(|p| Point::from_xy(p.x as f32, p.y as f32))
    }

    /// Smallest integer rectangle enclosing the four vertices
    pub fn bounds(&self) -> IRect {
        let mut l = i32::MAX;
        let mut t = i32::MAX;
        let mut r = i32::MIN;
        let mut b = i32::MIN;
        for p in &self.0 {
            l = l.min(p.x);
            t = t.min(p.y);
            r = r.max(p.x);
            b = b.max(p.y);
        }
        IRect::from_ltrb(l, t, r, b)
    }

    /// Closed polygon path through the vertices, in order
    pub fn to_path(&self) -> Option<Path> {
        let [p0, p1, p2, p3] = self.points();
        let mut pb = PathBuilder::new();
        pb.move_to(p0.x, p0.y);
        pb.line_to(p1.x, p1.y);
        pb.line_to(p2.x, p2.y);
        pb.line_to(p3.x, p3.y);
        pb.close();
        pb.finish()
    }
}

/// One color per [`Quad`] vertex, in the same order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadColors(pub [ColorU8; 4]);

impl QuadColors {
    pub const fn new(tl: ColorU8, tr: ColorU8, br: ColorU8, bl: ColorU8) -> Self {
        QuadColors([tl, tr, br, bl])
    }

    /// Bilinear interpolation of the vertex colors at normalized
    /// quad parameters `(u, v)`, both in `[0, 1]`.
    pub fn sample(&self, u: f32, v: f32) -> ColorU8 {
        let weights = [
            (1.0 - u) * (1.0 - v),
            u * (1.0 - v),
            u * v,
            (1.0 - u) * v,
        ];
        ColorU8::weighted4(&self.0, weights)
    }
}
