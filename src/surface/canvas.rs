//! Drawing state and frame management shared by every surface kind

use std::path::Path;
use std::rc::Rc;

use crate::geom::{IPoint, IRect};
use crate::image::ImageCodec;
use crate::redraw::{FrameState, RedrawMode, should_auto_manage};
use crate::render::{Bitmap, BitmapUsage, Context};
use crate::surface::GMode;
use crate::text::{FontDb, TextFormat};
use crate::{ColorU8, DeviceManager, Error, color};

/// Mutable drawing state of a surface
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    /// Position of the next text or blit
    pub cursor: IPoint,
    /// Current color, always opaque
    pub color: ColorU8,
    pub font: TextFormat,
    pub redraw: RedrawMode,
    pub gmode: GMode,
    /// Size of the last line rendered by `mes`
    pub mes_size: (u32, u32),
}

impl DrawState {
    fn new(font: TextFormat, redraw: RedrawMode) -> Self {
        DrawState {
            cursor: IPoint::new(0, 0),
            color: color::BLACK,
            font,
            redraw,
            gmode: GMode::default(),
            mes_size: (0, 0),
        }
    }
}

/// The device side of a surface: drawing context, render target and state.
pub(crate) struct Canvas {
    pub(crate) ctx: Option<Box<dyn Context>>,
    pub(crate) target: Option<Bitmap>,
    pub(crate) fonts: FontDb,
    pub(crate) codec: Option<Rc<dyn ImageCodec>>,
    pub(crate) state: DrawState,
    pub(crate) default_font: TextFormat,
    size: (u32, u32),
    frame: FrameState,
    device_lost: bool,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("size", &self.size)
            .field("usable", &self.is_usable())
            .field("frame", &self.frame)
            .field("device_lost", &self.device_lost)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Create the canvas, cleared to white.
    /// Missing resources leave it inert.
    pub(crate) fn new(devices: &DeviceManager, width: u32, height: u32) -> Self {
        let size = (width.max(1), height.max(1));
        let ctx = devices.create_drawing_context();
        let usage = BitmapUsage::TARGET | BitmapUsage::SOURCE | BitmapUsage::CPU_READ;
        let target = devices
            .device()
            .and_then(|device| match device.create_bitmap(size.0, size.1, usage) {
                Ok(bitmap) => Some(bitmap),
                Err(err) => {
                    log::warn!("could not create {}x{} render target: {err}", size.0, size.1);
                    None
                }
            });
        let opts = devices.options();
        let mut canvas = Canvas {
            ctx,
            target,
            fonts: devices.fonts().cloned().unwrap_or_default(),
            codec: devices.codec().cloned(),
            state: DrawState::new(opts.default_font.clone(), opts.redraw_mode),
            default_font: opts.default_font.clone(),
            size,
            frame: FrameState::Idle,
            device_lost: false,
        };
        if canvas.begin_frame() {
            if let (Some(ctx), Some(target)) = (canvas.ctx.as_deref_mut(), canvas.target.as_mut()) {
                ctx.clear(target, color::WHITE);
            }
            let _ = canvas.end_frame();
        } else {
            log::warn!("{}x{} surface is inert: device not initialized", size.0, size.1);
        }
        canvas
    }

    pub(crate) fn size(&self) -> (u32, u32) {
        self.size
    }

    pub(crate) fn is_usable(&self) -> bool {
        self.ctx.is_some() && self.target.is_some()
    }

    pub(crate) fn frame_state(&self) -> FrameState {
        self.frame
    }

    pub(crate) fn device_lost(&self) -> bool {
        self.device_lost
    }

    pub(crate) fn mark_device_lost(&mut self) {
        if !self.device_lost {
            log::error!(
                "{}x{} surface: device lost, the surface must be recreated",
                self.size.0,
                self.size.1
            );
        }
        self.device_lost = true;
    }

    /// Open a frame. Returns whether a frame was opened by this call.
    pub(crate) fn begin_frame(&mut self) -> bool {
        if self.frame == FrameState::FrameOpen || self.target.is_none() {
            return false;
        }
        let Some(ctx) = self.ctx.as_deref_mut() else {
            return false;
        };
        ctx.begin_draw();
        self.frame = FrameState::FrameOpen;
        true
    }

    /// Close the open frame, if any
    pub(crate) fn end_frame(&mut self) -> Result<(), Error> {
        if self.frame != FrameState::FrameOpen {
            return Ok(());
        }
        self.frame = FrameState::Idle;
        let Some(ctx) = self.ctx.as_deref_mut() else {
            return Ok(());
        };
        match ctx.end_draw() {
            Err(Error::RecreateTarget) => {
                self.mark_device_lost();
                Err(Error::RecreateTarget)
            }
            res => res,
        }
    }

    /// Run a drawing operation within a frame.
    ///
    /// In immediate mode the frame is opened here, and the return value tells
    /// the caller it must close it. Without a frame the operation is skipped.
    pub(crate) fn draw<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut dyn Context, &mut Bitmap, &DrawState),
    {
        let auto = should_auto_manage(self.state.redraw, self.frame) && self.begin_frame();
        if self.frame == FrameState::FrameOpen {
            if let (Some(ctx), Some(target)) = (self.ctx.as_deref_mut(), self.target.as_mut()) {
                f(ctx, target, &self.state);
            }
        }
        auto
    }

    /// Read one pixel back. The frame must be closed.
    pub(crate) fn read_pixel(&self, x: i32, y: i32) -> Option<ColorU8> {
        let (ctx, target) = (self.ctx.as_deref()?, self.target.as_ref()?);
        if !target.rect().contains(IPoint::new(x, y)) {
            return None;
        }
        match ctx.read_pixels(target, IRect::from_xywh(x, y, 1, 1)) {
            Ok(px) => px.first().copied(),
            Err(err) => {
                log::warn!("pixel readback failed: {err}");
                None
            }
        }
    }

    /// Read back the whole target and encode it. The frame must be closed.
    pub(crate) fn save(&self, path: &Path) -> Result<(), Error> {
        let (Some(ctx), Some(target), Some(codec)) =
            (self.ctx.as_deref(), self.target.as_ref(), self.codec.as_ref())
        else {
            return Err(Error::NotInitialized);
        };
        let pixels = ctx.read_pixels(target, target.rect())?;
        let (w, h) = target.size();
        let bitmap = Bitmap::from_colors(w, h, BitmapUsage::SOURCE | BitmapUsage::CPU_READ, &pixels)?;
        codec.save_image(&bitmap, path)
    }

    /// Reset the drawing state the way `cls` does. The redraw mode is kept.
    pub(crate) fn reset_state(&mut self) {
        let redraw = self.state.redraw;
        self.state = DrawState::new(self.default_font.clone(), redraw);
    }
}
