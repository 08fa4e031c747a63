/*!
 * Geometric primitives.
 *
 * Paths and transforms are publicly imported from tiny-skia-path.
 * Legacy commands address pixels with integer coordinates, which is what
 * [`IPoint`] and [`IRect`] are for. Floating point [`Rect`] is used when
 * shapes are handed to a drawing context.
 *
 * Y low coordinates are at the top.
 */

use strict_num::{FiniteF32, PositiveF32};
pub use tiny_skia_path::{Path, PathBuilder, Point, Transform};

/// A rectangle in 2D space reprensented by x, y, width and height
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    x: FiniteF32,
    y: FiniteF32,
    w: PositiveF32,
    h: PositiveF32,
}

impl Rect {
    /// Build a rectangle from x, y, width and height.
    ///
    /// Negative sizes are clamped to zero, non finite values give `None`.
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Option<Self> {
        Some(Rect {
            x: FiniteF32::new(x)?,
            y: FiniteF32::new(y)?,
            w: PositiveF32::new(w.max(0.0))?,
            h: PositiveF32::new(h.max(0.0))?,
        })
    }

    /// Build a rectangle from two corner points, in any order
    pub fn from_corners(p1: Point, p2: Point) -> Option<Self> {
        let left = p1.x.min(p2.x);
        let top = p1.y.min(p2.y);
        Rect::from_xywh(left, top, (p1.x - p2.x).abs(), (p1.y - p2.y).abs())
    }

    /// The X coordinate of the left side
    pub const fn x(&self) -> f32 {
        self.x.get()
    }

    /// The Y coordinate of the top side
    pub const fn y(&self) -> f32 {
        self.y.get()
    }

    /// The width of the rectangle
    pub const fn width(&self) -> f32 {
        self.w.get()
    }

    /// The height of the rectangle
    pub const fn height(&self) -> f32 {
        self.h.get()
    }

    /// The right X coordinate
    pub const fn right(&self) -> f32 {
        self.x.get() + self.w.get()
    }

    /// The bottom Y coordinate
    pub const fn bottom(&self) -> f32 {
        self.y.get() + self.h.get()
    }

    /// Whether the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Build a path from the rectangle, `None` if the rectangle is empty
    pub fn to_path(&self) -> Option<Path> {
        let rect = tiny_skia_path::Rect::from_xywh(self.x(), self.y(), self.width(), self.height())?;
        Some(PathBuilder::from_rect(rect))
    }

    /// Build an ellipse path inscribed in the rectangle
    pub fn to_oval_path(&self) -> Option<Path> {
        let rect = tiny_skia_path::Rect::from_xywh(self.x(), self.y(), self.width(), self.height())?;
        PathBuilder::from_oval(rect)
    }
}

/// An integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        IPoint { x, y }
    }
}

impl From<(i32, i32)> for IPoint {
    fn from((x, y): (i32, i32)) -> Self {
        IPoint { x, y }
    }
}

/// An integer pixel rectangle.
///
/// Width and height can be zero, in which case the rectangle is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IRect {
    x: i32,
    y: i32,
    w: u32,
    h: u32,
}

impl IRect {
    pub const fn from_xywh(x: i32, y: i32, w: u32, h: u32) -> Self {
        IRect { x, y, w, h }
    }

    /// Rectangle covering a `width x height` area at the origin
    pub const fn from_size(w: u32, h: u32) -> Self {
        IRect { x: 0, y: 0, w, h }
    }

    /// Rectangle from top-left (inclusive) and bottom-right (exclusive) corners.
    /// The corners are reordered when needed.
    pub fn from_ltrb(l: i32, t: i32, r: i32, b: i32) -> Self {
        let (l, r) = if l <= r { (l, r) } else { (r, l) };
        let (t, b) = if t <= b { (t, b) } else { (b, t) };
        IRect {
            x: l,
            y: t,
            w: (r as i64 - l as i64) as u32,
            h: (b as i64 - t as i64) as u32,
        }
    }

    pub const fn x(&self) -> i32 {
        self.x
    }

    pub const fn y(&self) -> i32 {
        self.y
    }

    pub const fn width(&self) -> u32 {
        self.w
    }

    pub const fn height(&self) -> u32 {
        self.h
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive right bound
    pub const fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    /// Exclusive bottom bound
    pub const fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }

    pub const fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub const fn contains(&self, p: IPoint) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Intersection of two rectangles, `None` if they do not overlap
    pub fn intersect(&self, other: &IRect) -> Option<IRect> {
        let l = self.left().max(other.left());
        let t = self.top().max(other.top());
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if l < r && t < b {
            Some(IRect::from_ltrb(l, t, r, b))
        } else {
            None
        }
    }

    /// Floating point version of this rectangle
    pub fn to_rect(&self) -> Option<Rect> {
        Rect::from_xywh(self.x as f32, self.y as f32, self.w as f32, self.h as f32)
    }
}
