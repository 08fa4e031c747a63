//! Copy modes and blit commands (`gcopy`, `gzoom`, `grotate`, `gsquare`)

use super::Surface;
use crate::geom::{IRect, Transform};
use crate::quad::QuadCompositor;
use crate::render::{Bitmap, Blit, CompositeOp, Interpolation};
use crate::{ColorU8, Quad, QuadColors, color};

/// Copy mode of blits, as selected by the legacy `gmode`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CopyMode {
    /// Opaque copy (0)
    #[default]
    Copy,
    /// Opaque copy between memory buffers (1)
    MemCopy,
    /// Black source pixels are skipped (2)
    Transparent,
    /// Alpha blending (3)
    Blend,
    /// Source pixels of the current color are skipped, alpha blending (4)
    ColorKey,
    /// Additive blending (5)
    Add,
    /// Subtractive blending (6)
    Subtract,
}

impl CopyMode {
    /// Mode of a legacy `gmode` number. Unknown numbers are [`CopyMode::Copy`].
    pub fn from_legacy(mode: i32) -> Self {
        match mode {
            1 => CopyMode::MemCopy,
            2 => CopyMode::Transparent,
            3 => CopyMode::Blend,
            4 => CopyMode::ColorKey,
            5 => CopyMode::Add,
            6 => CopyMode::Subtract,
            _ => CopyMode::Copy,
        }
    }

    fn uses_alpha(&self) -> bool {
        matches!(
            self,
            CopyMode::Blend | CopyMode::ColorKey | CopyMode::Add | CopyMode::Subtract
        )
    }
}

/// Copy state of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GMode {
    pub mode: CopyMode,
    /// Default size of `gcopy`, and size of the `grotate` region
    pub copy_size: (u32, u32),
    /// Blend alpha in `0..=256`
    pub alpha: u32,
}

impl Default for GMode {
    fn default() -> Self {
        GMode {
            mode: CopyMode::Copy,
            copy_size: (32, 32),
            alpha: 256,
        }
    }
}

impl GMode {
    pub fn new(mode: CopyMode, copy_size: (u32, u32), alpha: i32) -> Self {
        GMode {
            mode,
            copy_size: (copy_size.0.max(1), copy_size.1.max(1)),
            alpha: alpha.clamp(0, 256) as u32,
        }
    }

    pub fn opacity(&self) -> f32 {
        if self.mode.uses_alpha() {
            self.alpha as f32 / 256.0
        } else {
            1.0
        }
    }

    /// Blit of a source region at a transform, composited per this mode.
    /// `color` is the current color, the key of [`CopyMode::ColorKey`].
    pub fn blit(&self, src_rect: IRect, transform: Transform, color: ColorU8) -> Blit {
        let (op, color_key) = match self.mode {
            CopyMode::Copy | CopyMode::MemCopy => (CompositeOp::Copy, None),
            CopyMode::Transparent => (CompositeOp::SourceOver, Some(color::BLACK)),
            CopyMode::Blend => (CompositeOp::SourceOver, None),
            CopyMode::ColorKey => (CompositeOp::SourceOver, Some(color)),
            CopyMode::Add => (CompositeOp::Add, None),
            CopyMode::Subtract => (CompositeOp::Subtract, None),
        };
        Blit {
            src_rect,
            transform,
            interpolation: Interpolation::Nearest,
            op,
            opacity: self.opacity(),
            color_key,
        }
    }

    /// Color of solid fills (`grect`, `gsquare`) under this mode
    pub fn fill_color(&self, color: ColorU8) -> ColorU8 {
        let a = (self.opacity() * 255.0).round() as u8;
        color.with_alpha(a)
    }
}

/// Source of a blit command
#[derive(Debug, Clone, Copy)]
pub enum BlitSource<'a> {
    /// The surface itself, copied through a snapshot of its target
    Own,
    Bitmap(&'a Bitmap),
}

impl<'a> From<&'a Bitmap> for BlitSource<'a> {
    fn from(bitmap: &'a Bitmap) -> Self {
        BlitSource::Bitmap(bitmap)
    }
}

impl Surface {
    fn resolve_source<'a>(&self, src: BlitSource<'a>, snapshot: &'a mut Option<Bitmap>) -> Option<&'a Bitmap> {
        match src {
            BlitSource::Bitmap(bitmap) => Some(bitmap),
            BlitSource::Own => {
                *snapshot = self.snapshot();
                snapshot.as_ref()
            }
        }
    }

    fn blit_with(&mut self, src: &Bitmap, blit: Blit) {
        self.draw(|ctx, target, _| {
            if let Err(err) = ctx.draw_bitmap(target, src, &blit) {
                log::warn!("blit failed: {err}");
            }
        });
    }

    /// Copy a region of a source at the cursor, with the copy mode.
    /// `size` defaults to the copy size.
    pub fn gcopy<'a>(
        &mut self,
        src: impl Into<BlitSource<'a>>,
        sx: i32,
        sy: i32,
        size: Option<(u32, u32)>,
    ) {
        let mut snapshot = None;
        let Some(src) = self.resolve_source(src.into(), &mut snapshot) else {
            return;
        };
        let state = self.state();
        let (w, h) = size.unwrap_or(state.gmode.copy_size);
        let src_rect = IRect::from_xywh(sx, sy, w.max(1), h.max(1));
        let transform = Transform::from_translate(state.cursor.x as f32, state.cursor.y as f32);
        let blit = state.gmode.blit(src_rect, transform, state.color);
        self.blit_with(src, blit);
    }

    /// Scale a source region to `dst_w x dst_h` at the cursor.
    /// Sampling is nearest-neighbour unless `smooth`.
    #[allow(clippy::too_many_arguments)]
    pub fn gzoom<'a>(
        &mut self,
        dst_w: u32,
        dst_h: u32,
        src: impl Into<BlitSource<'a>>,
        sx: i32,
        sy: i32,
        sw: u32,
        sh: u32,
        smooth: bool,
    ) {
        let mut snapshot = None;
        let Some(src) = self.resolve_source(src.into(), &mut snapshot) else {
            return;
        };
        let (sw, sh) = (sw.max(1), sh.max(1));
        let (dst_w, dst_h) = (dst_w.max(1), dst_h.max(1));
        let state = self.state();
        let transform = Transform::from_scale(dst_w as f32 / sw as f32, dst_h as f32 / sh as f32)
            .post_translate(state.cursor.x as f32, state.cursor.y as f32);
        let mut blit = state
            .gmode
            .blit(IRect::from_xywh(sx, sy, sw, sh), transform, state.color);
        if smooth {
            blit.interpolation = Interpolation::Linear;
        }
        self.blit_with(src, blit);
    }

    /// Rotate the copy-size region of a source by `angle` radians,
    /// scaled to `dst_w x dst_h`, its center at the cursor.
    pub fn grotate<'a>(
        &mut self,
        src: impl Into<BlitSource<'a>>,
        sx: i32,
        sy: i32,
        angle: f32,
        dst_w: u32,
        dst_h: u32,
    ) {
        let mut snapshot = None;
        let Some(src) = self.resolve_source(src.into(), &mut snapshot) else {
            return;
        };
        let state = self.state();
        let (cw, ch) = state.gmode.copy_size;
        let (cw, ch) = (cw as f32, ch as f32);
        let transform = Transform::from_translate(-cw / 2.0, -ch / 2.0)
            .post_scale(dst_w.max(1) as f32 / cw, dst_h.max(1) as f32 / ch)
            .post_concat(Transform::from_rotate(angle.to_degrees()))
            .post_translate(state.cursor.x as f32, state.cursor.y as f32);
        let mut blit = state.gmode.blit(
            IRect::from_xywh(sx, sy, state.gmode.copy_size.0, state.gmode.copy_size.1),
            transform,
            state.color,
        );
        blit.interpolation = Interpolation::Linear;
        self.blit_with(src, blit);
    }

    /// Fill a quad with the current color
    pub fn gsquare(&mut self, quad: &Quad) {
        self.draw(|ctx, target, state| {
            QuadCompositor::new(ctx, target).fill_quad(quad, state.gmode.fill_color(state.color));
        });
    }

    /// Copy the bounding box of a source quad onto the bounding box of a destination quad
    pub fn gsquare_image<'a>(&mut self, quad: &Quad, src: impl Into<BlitSource<'a>>, src_quad: &Quad) {
        let mut snapshot = None;
        let Some(src) = self.resolve_source(src.into(), &mut snapshot) else {
            return;
        };
        self.draw(|ctx, target, state| {
            let blit = state.gmode.blit(src.rect(), Transform::identity(), state.color);
            if let Err(err) = QuadCompositor::new(ctx, target).blit_quad(src, src_quad, quad, &blit) {
                log::warn!("gsquare: {err}");
            }
        });
    }

    /// Fill a quad with a four-corner gradient
    pub fn gsquare_gradient(&mut self, quad: &Quad, colors: &QuadColors) {
        self.draw(|ctx, target, _| {
            if let Err(err) = QuadCompositor::new(ctx, target).gradient_quad(quad, colors) {
                log::warn!("gsquare: {err}");
            }
        });
    }
}
