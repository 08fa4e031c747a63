use hspgfx::geom::{IRect, Path, Transform};
use hspgfx::render::{
    Bitmap, BitmapUsage, Blit, CompositeOp, Context, Interpolation, Paint, Shader,
};
use hspgfx::{ColorU8, Error};
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, GradientStop, LinearGradient, LineCap, Pixmap, PixmapMut,
    PixmapPaint, SpreadMode,
};

use crate::{Liveness, ts_color};

/// Drawing context of a [`PxlDevice`](crate::PxlDevice)
#[derive(Debug)]
pub struct PxlContext {
    drawing: bool,
    hq: bool,
    liveness: Liveness,
}

impl PxlContext {
    pub(crate) fn new(hq: bool, liveness: Liveness) -> Self {
        PxlContext {
            drawing: false,
            hq,
            liveness,
        }
    }

    fn ts_paint(&self, paint: &Paint) -> tiny_skia::Paint<'static> {
        let mut ts = tiny_skia::Paint::default();
        match paint.shader {
            Shader::Solid(color) => ts.set_color(ts_color(color)),
            Shader::LinearGradient {
                start,
                end,
                start_color,
                end_color,
            } => {
                let shader = LinearGradient::new(
                    tiny_skia::Point::from_xy(start.0, start.1),
                    tiny_skia::Point::from_xy(end.0, end.1),
                    vec![
                        GradientStop::new(0.0, ts_color(start_color)),
                        GradientStop::new(1.0, ts_color(end_color)),
                    ],
                    SpreadMode::Pad,
                    Transform::identity(),
                );
                match shader {
                    Some(shader) => ts.shader = shader,
                    // start and end points are the same
                    None => ts.set_color(ts_color(start_color)),
                }
            }
        }
        ts.anti_alias = paint.anti_alias;
        ts.force_hq_pipeline = self.hq;
        ts
    }
}

fn pixmap_mut(target: &mut Bitmap) -> Option<PixmapMut<'_>> {
    let (w, h) = target.size();
    PixmapMut::from_bytes(target.data_mut(), w, h)
}

/// Copy a region of a bitmap into a new pixmap, keyed pixels made transparent
fn crop(src: &Bitmap, rect: IRect, key: Option<ColorU8>) -> Result<Pixmap, Error> {
    let mut region = Pixmap::new(rect.width(), rect.height())
        .ok_or(Error::InvalidSize(rect.width(), rect.height()))?;
    let stride = src.width() as usize * 4;
    let row_len = rect.width() as usize * 4;
    for (y, row) in region.data_mut().chunks_exact_mut(row_len).enumerate() {
        let start = (rect.y() as usize + y) * stride + rect.x() as usize * 4;
        row.copy_from_slice(&src.data()[start..start + row_len]);
    }
    if let Some(key) = key {
        for px in region.data_mut().chunks_exact_mut(4) {
            let c = ColorU8::from_premultiplied([px[0], px[1], px[2], px[3]]);
            if c.alpha() > 0 && c.same_rgb(&key) {
                px.fill(0);
            }
        }
    }
    Ok(region)
}

/// Subtractive blit: the transformed source is rendered on a layer,
/// then subtracted channel-wise, destination alpha unchanged.
fn subtract(
    target: &mut Bitmap,
    region: &Pixmap,
    opacity: f32,
    quality: FilterQuality,
    transform: Transform,
) -> Result<(), Error> {
    let (w, h) = target.size();
    let mut layer = Pixmap::new(w, h).ok_or(Error::InvalidSize(w, h))?;
    let paint = PixmapPaint {
        opacity,
        blend_mode: BlendMode::SourceOver,
        quality,
    };
    layer.draw_pixmap(0, 0, region.as_ref(), &paint, transform, None);
    for (dst, src) in target
        .data_mut()
        .chunks_exact_mut(4)
        .zip(layer.data().chunks_exact(4))
    {
        for i in 0..3 {
            dst[i] = dst[i].saturating_sub(src[i]);
        }
    }
    Ok(())
}

impl Context for PxlContext {
    fn begin_draw(&mut self) {
        self.drawing = true;
    }

    fn end_draw(&mut self) -> Result<(), Error> {
        self.drawing = false;
        if self.liveness.is_lost() {
            log::debug!("pxl device lost");
            return Err(Error::RecreateTarget);
        }
        Ok(())
    }

    fn is_drawing(&self) -> bool {
        self.drawing
    }

    fn clear(&mut self, target: &mut Bitmap, color: ColorU8) {
        if !self.drawing {
            return;
        }
        if let Some(mut px) = pixmap_mut(target) {
            px.fill(ts_color(color));
        }
    }

    fn fill_path(&mut self, target: &mut Bitmap, path: &Path, paint: &Paint, transform: Transform) {
        if !self.drawing {
            return;
        }
        let paint = self.ts_paint(paint);
        if let Some(mut px) = pixmap_mut(target) {
            px.fill_path(path, &paint, FillRule::Winding, transform, None);
        }
    }

    fn stroke_path(
        &mut self,
        target: &mut Bitmap,
        path: &Path,
        paint: &Paint,
        width: f32,
        transform: Transform,
    ) {
        if !self.drawing {
            return;
        }
        let paint = self.ts_paint(paint);
        let stroke = tiny_skia::Stroke {
            width,
            line_cap: LineCap::Butt,
            ..Default::default()
        };
        if let Some(mut px) = pixmap_mut(target) {
            px.stroke_path(path, &paint, &stroke, transform, None);
        }
    }

    fn draw_bitmap(&mut self, target: &mut Bitmap, src: &Bitmap, blit: &Blit) -> Result<(), Error> {
        if !src.usage().contains(BitmapUsage::SOURCE) {
            return Err(Error::NotASource);
        }
        if !self.drawing {
            return Ok(());
        }
        let Some(rect) = blit.src_rect.intersect(&src.rect()) else {
            return Ok(());
        };
        let region = crop(src, rect, blit.color_key)?;
        let transform = blit.transform.pre_translate(
            (rect.x() - blit.src_rect.x()) as f32,
            (rect.y() - blit.src_rect.y()) as f32,
        );
        let quality = match blit.interpolation {
            Interpolation::Nearest => FilterQuality::Nearest,
            Interpolation::Linear => FilterQuality::Bilinear,
        };
        let opacity = blit.opacity.clamp(0.0, 1.0);
        let blend_mode = match blit.op {
            CompositeOp::Copy => BlendMode::Source,
            CompositeOp::SourceOver => BlendMode::SourceOver,
            CompositeOp::Add => BlendMode::Plus,
            CompositeOp::Subtract => {
                return subtract(target, &region, opacity, quality, transform);
            }
        };
        let paint = PixmapPaint {
            opacity,
            blend_mode,
            quality,
        };
        let (w, h) = target.size();
        let mut px = pixmap_mut(target).ok_or(Error::InvalidSize(w, h))?;
        px.draw_pixmap(0, 0, region.as_ref(), &paint, transform, None);
        Ok(())
    }

    fn read_pixels(&self, target: &Bitmap, rect: IRect) -> Result<Vec<ColorU8>, Error> {
        if self.drawing {
            return Err(Error::FrameOpen);
        }
        let mut pixels = Vec::with_capacity(rect.width() as usize * rect.height() as usize);
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                pixels.push(target.pixel(x, y).unwrap_or_default());
            }
        }
        Ok(pixels)
    }
}
