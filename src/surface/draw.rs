//! Drawing primitives

use bitflags::bitflags;

use super::Surface;
use crate::geom::{IPoint, IRect, PathBuilder, Point, Rect, Transform};
use crate::render::{Paint, Shader};
use crate::text::TextBlock;
use crate::{ColorU8, color};

bitflags! {
    /// Options of [`Surface::mes`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MesOptions: u32 {
        /// Keep the cursor on the line, right after the text
        const NO_CR = 1;
        /// Translucent black copy, 1 pixel down-right, under the text
        const SHADOW = 2;
        /// White copies in the eight 1 pixel directions, under the text
        const OUTLINE = 4;
    }
}

const OUTLINE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const SHADOW_COLOR: ColorU8 = ColorU8::from_rgba(0, 0, 0, 128);

impl Surface {
    /// Fill the rectangle between two corners, both inclusive
    pub fn boxf(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let rect = IRect::from_ltrb(x1.min(x2), y1.min(y2), x1.max(x2) + 1, y1.max(y2) + 1);
        let Some(path) = rect.to_rect().and_then(|r| r.to_path()) else {
            return;
        };
        self.draw(|ctx, target, state| {
            ctx.fill_path(target, &path, &Paint::solid(state.color), Transform::identity());
        });
    }

    /// Draw a line between two points. The cursor moves to the end point.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.stroke_line(IPoint::new(x1, y1), IPoint::new(x2, y2));
    }

    /// Draw a line from the cursor. The cursor moves to the end point.
    pub fn line_to(&mut self, x: i32, y: i32) {
        self.stroke_line(self.cursor(), IPoint::new(x, y));
    }

    fn stroke_line(&mut self, start: IPoint, end: IPoint) {
        self.core.state.cursor = end;
        let mut pb = PathBuilder::new();
        pb.move_to(start.x as f32 + 0.5, start.y as f32 + 0.5);
        pb.line_to(end.x as f32 + 0.5, end.y as f32 + 0.5);
        let Some(path) = pb.finish() else {
            return;
        };
        self.draw(|ctx, target, state| {
            ctx.stroke_path(
                target,
                &path,
                &Paint::solid(state.color),
                1.0,
                Transform::identity(),
            );
        });
    }

    /// Draw the ellipse inscribed in a rectangle, filled or as a 1 pixel outline
    pub fn circle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, fill: bool) {
        let p1 = Point::from_xy(x1 as f32, y1 as f32);
        let p2 = Point::from_xy(x2 as f32, y2 as f32);
        let Some(rect) = Rect::from_corners(p1, p2) else {
            return;
        };
        if fill {
            let Some(path) = rect.to_oval_path() else {
                return;
            };
            self.draw(|ctx, target, state| {
                ctx.fill_path(target, &path, &Paint::solid(state.color), Transform::identity());
            });
        } else {
            let inset = Rect::from_xywh(
                rect.x() + 0.5,
                rect.y() + 0.5,
                rect.width() - 1.0,
                rect.height() - 1.0,
            );
            let Some(path) = inset.and_then(|r| r.to_oval_path()) else {
                return;
            };
            self.draw(|ctx, target, state| {
                ctx.stroke_path(
                    target,
                    &path,
                    &Paint::solid(state.color),
                    1.0,
                    Transform::identity(),
                );
            });
        }
    }

    /// Set one pixel to the current color
    pub fn pset(&mut self, x: i32, y: i32) {
        let Some(path) = IRect::from_xywh(x, y, 1, 1)
            .to_rect()
            .and_then(|r| r.to_path())
        else {
            return;
        };
        self.draw(|ctx, target, state| {
            ctx.fill_path(target, &path, &Paint::solid(state.color), Transform::identity());
        });
    }

    /// Render text at the cursor, left aligned.
    ///
    /// The cursor moves below the text, or right after its last line with
    /// [`MesOptions::NO_CR`]. If the text cannot be laid out (e.g. no font
    /// available), nothing is drawn, the cursor stays and [`mes_size`](Surface::mes_size)
    /// is `(0, 0)`.
    pub fn mes(&mut self, text: &str, opts: MesOptions) {
        let block = match TextBlock::new(text, &self.core.state.font, self.core.fonts.database()) {
            Ok(block) => block,
            Err(err) => {
                log::warn!("mes: {err}");
                self.core.state.mes_size = (0, 0);
                return;
            }
        };

        let cursor = self.core.state.cursor;
        if let Some(path) = block.outline(self.core.fonts.database()) {
            let anti_alias = self.core.state.font.antialias();
            let at = |dx: i32, dy: i32| {
                Transform::from_translate((cursor.x + dx) as f32, (cursor.y + dy) as f32)
            };
            self.draw(|ctx, target, state| {
                if opts.contains(MesOptions::SHADOW) {
                    let paint = Paint::solid(SHADOW_COLOR).with_anti_alias(anti_alias);
                    ctx.fill_path(target, &path, &paint, at(1, 1));
                }
                if opts.contains(MesOptions::OUTLINE) {
                    let paint = Paint::solid(color::WHITE).with_anti_alias(anti_alias);
                    for (dx, dy) in OUTLINE_OFFSETS {
                        ctx.fill_path(target, &path, &paint, at(dx, dy));
                    }
                }
                let paint = Paint::solid(state.color).with_anti_alias(anti_alias);
                ctx.fill_path(target, &path, &paint, at(0, 0));
            });
        }

        let (w, h) = block.last_line_size();
        self.core.state.mes_size = (w, h);
        let lines = block.lines().len().max(1) as i32;
        let line_height = block.line_height() as i32;
        self.core.state.cursor = if opts.contains(MesOptions::NO_CR) {
            IPoint::new(cursor.x + w as i32, cursor.y + (lines - 1) * line_height)
        } else {
            IPoint::new(cursor.x, cursor.y + lines * line_height)
        };
    }

    /// Fill a rectangle with a two colors linear gradient,
    /// from left to right, or top to bottom if `vertical`
    #[allow(clippy::too_many_arguments)]
    pub fn gradf(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        vertical: bool,
        start_color: ColorU8,
        end_color: ColorU8,
    ) {
        let rect = IRect::from_xywh(x, y, width.max(1), height.max(1));
        let Some(path) = rect.to_rect().and_then(|r| r.to_path()) else {
            return;
        };
        let start = (rect.left() as f32, rect.top() as f32);
        let end = if vertical {
            (rect.left() as f32, rect.bottom() as f32)
        } else {
            (rect.right() as f32, rect.top() as f32)
        };
        let paint = Paint {
            shader: Shader::LinearGradient {
                start,
                end,
                start_color: start_color.without_opacity(),
                end_color: end_color.without_opacity(),
            },
            anti_alias: false,
        };
        self.draw(|ctx, target, _| {
            ctx.fill_path(target, &path, &paint, Transform::identity());
        });
    }

    /// Fill a rectangle of the given size, rotated by `angle` radians around its center.
    /// Blending follows the copy mode.
    pub fn grect(&mut self, cx: i32, cy: i32, angle: f32, width: u32, height: u32) {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        let Some(path) = Rect::from_xywh(-w / 2.0, -h / 2.0, w, h).and_then(|r| r.to_path())
        else {
            return;
        };
        let transform = Transform::from_rotate(angle.to_degrees())
            .post_translate(cx as f32, cy as f32);
        self.draw(|ctx, target, state| {
            let color = state.gmode.fill_color(state.color);
            ctx.fill_path(target, &path, &Paint::solid(color), transform);
        });
    }

    /// Clear the surface with a color of the legacy palette
    /// (0: white, 1: light gray, 2: gray, 3: dark gray, 4: black).
    ///
    /// The cursor, color, font and copy mode are reset.
    pub fn cls(&mut self, mode: i32) {
        let clear = color::CLS_PALETTE[mode.clamp(0, 4) as usize];
        self.draw(|ctx, target, _| ctx.clear(target, clear));
        self.core.reset_state();
    }
}
