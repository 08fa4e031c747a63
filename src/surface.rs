//! Drawing surfaces.
//!
//! A [`Surface`] is one drawable target: a window (with a swap chain) or an
//! offscreen buffer. Every drawing command follows the same pattern:
//!
//!  1. in [`RedrawMode::Immediate`] with no open frame, open one;
//!  2. without a frame (inert surface), do nothing;
//!  3. draw with the current color, font and cursor;
//!  4. if the frame was opened in 1, close it, and present window surfaces.

use std::path::Path;
use std::rc::Rc;

use crate::geom::IPoint;
use crate::redraw::{FrameState, RedrawMode, Suspend};
use crate::render::{Bitmap, Context};
use crate::text::{FontStyle, StockFont, TextFormat};
use crate::window::{EventResponse, WindowDesc, WindowEvent, WindowHost, WindowSurface};
use crate::{ColorU8, DeviceManager, Error, color};

mod blit;
mod canvas;
mod draw;

pub use blit::{BlitSource, CopyMode, GMode};
pub(crate) use canvas::Canvas;
pub use canvas::DrawState;
pub use draw::MesOptions;

/// Offscreen part of an offscreen [`Surface`].
///
/// The render target is also a blit source, and there is nothing to present.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffscreenSurface;

/// The kinds of surfaces
#[derive(Debug)]
pub enum SurfaceKind {
    Window(WindowSurface),
    Offscreen(OffscreenSurface),
}

/// Mode of `picload`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PicloadMode {
    /// Clear to white, then draw the image
    #[default]
    Clear,
    /// Draw the image over the current content
    Overlay,
    /// Clear to black, then draw the image
    ClearBlack,
}

impl PicloadMode {
    pub fn from_legacy(code: i32) -> Self {
        match code {
            1 => PicloadMode::Overlay,
            2 => PicloadMode::ClearBlack,
            _ => PicloadMode::Clear,
        }
    }

    fn clear_color(&self) -> Option<ColorU8> {
        match self {
            PicloadMode::Clear => Some(color::WHITE),
            PicloadMode::Overlay => None,
            PicloadMode::ClearBlack => Some(color::BLACK),
        }
    }
}

/// A drawable target
#[derive(Debug)]
pub struct Surface {
    core: Canvas,
    kind: SurfaceKind,
}

impl Surface {
    /// Create a window surface.
    ///
    /// Fails only if the host cannot create the window. Without an
    /// initialized device the surface is created inert.
    pub fn window(
        devices: &DeviceManager,
        host: Rc<dyn WindowHost>,
        desc: &WindowDesc,
    ) -> Result<Self, Error> {
        let window = WindowSurface::new(devices, host, desc)?;
        let core = Canvas::new(devices, desc.width, desc.height);
        let mut surface = Surface {
            core,
            kind: SurfaceKind::Window(window),
        };
        surface.present();
        Ok(surface)
    }

    /// Create an offscreen surface. Without an initialized device the surface is inert.
    pub fn offscreen(devices: &DeviceManager, width: u32, height: u32) -> Self {
        log::debug!("created {width}x{height} offscreen surface");
        Surface {
            core: Canvas::new(devices, width, height),
            kind: SurfaceKind::Offscreen(OffscreenSurface),
        }
    }

    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    pub fn as_window(&self) -> Option<&WindowSurface> {
        match &self.kind {
            SurfaceKind::Window(window) => Some(window),
            SurfaceKind::Offscreen(_) => None,
        }
    }

    pub fn is_window(&self) -> bool {
        matches!(self.kind, SurfaceKind::Window(_))
    }

    /// Size of the render target, fixed at creation
    pub fn size(&self) -> (u32, u32) {
        self.core.size()
    }

    pub fn width(&self) -> u32 {
        self.core.size().0
    }

    pub fn height(&self) -> u32 {
        self.core.size().1
    }

    /// Whether the surface has a drawing context and a render target
    pub fn is_usable(&self) -> bool {
        self.core.is_usable()
    }

    /// Whether the device was lost and the surface must be recreated
    pub fn needs_recreate(&self) -> bool {
        self.core.device_lost()
    }

    pub fn state(&self) -> &DrawState {
        &self.core.state
    }

    pub fn cursor(&self) -> IPoint {
        self.core.state.cursor
    }

    pub fn color(&self) -> ColorU8 {
        self.core.state.color
    }

    pub fn text_format(&self) -> &TextFormat {
        &self.core.state.font
    }

    pub fn redraw_mode(&self) -> RedrawMode {
        self.core.state.redraw
    }

    pub fn frame_state(&self) -> FrameState {
        self.core.frame_state()
    }

    pub fn gmode(&self) -> &GMode {
        &self.core.state.gmode
    }

    /// Pixel size of the last line rendered by [`mes`](Surface::mes)
    pub fn mes_size(&self) -> (u32, u32) {
        self.core.state.mes_size
    }

    /// The render target, usable as blit source
    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.core.target.as_ref()
    }

    /// A copy of the render target
    pub fn snapshot(&self) -> Option<Bitmap> {
        self.core.target.clone()
    }

    /// Move the cursor
    pub fn pos(&mut self, x: i32, y: i32) {
        self.core.state.cursor = IPoint::new(x, y);
    }

    /// Set the current color. Alpha is ignored.
    pub fn set_color(&mut self, color: ColorU8) {
        self.core.state.color = color.without_opacity();
    }

    /// Set the current color from integer components, clamped to `0..=255`
    pub fn set_rgb(&mut self, r: i32, g: i32, b: i32) {
        self.core.state.color = ColorU8::from_rgb_clamped(r, g, b);
    }

    /// Set the current color from the legacy HSV model
    pub fn hsvcolor(&mut self, h: i32, s: i32, v: i32) {
        self.core.state.color = ColorU8::from_hsv(h, s, v);
    }

    /// Select a font
    pub fn font(&mut self, family: &str, size: i32, style: FontStyle) {
        self.core.state.font = TextFormat::from_legacy(family, size, style);
    }

    /// Select a stock font
    pub fn sysfont(&mut self, kind: StockFont) {
        self.core.state.font = kind.resolve(self.core.fonts.database());
    }

    /// Set the copy mode of blits. `size` defaults the copy size, `alpha` is clamped to `0..=256`.
    pub fn set_gmode(&mut self, mode: CopyMode, size: (u32, u32), alpha: i32) {
        self.core.state.gmode = GMode::new(mode, size, alpha);
    }

    /// Switch the redraw mode.
    ///
    /// Entering [`RedrawMode::Manual`] opens a frame. Going back to
    /// [`RedrawMode::Immediate`] closes it and presents window surfaces.
    pub fn redraw(&mut self, mode: RedrawMode) {
        self.core.state.redraw = mode;
        match mode {
            RedrawMode::Manual => {
                self.core.begin_frame();
            }
            RedrawMode::Immediate => {
                // a lost device is flagged by the canvas
                let _ = self.end_draw_and_present();
            }
        }
    }

    /// Explicitly open a frame. Returns whether a frame was opened.
    pub fn begin_draw(&mut self) -> bool {
        self.core.begin_frame()
    }

    /// Close the open frame and present window surfaces.
    /// Device loss is reported as [`Error::RecreateTarget`].
    pub fn end_draw_and_present(&mut self) -> Result<(), Error> {
        self.core.end_frame()?;
        self.present();
        Ok(())
    }

    /// Present the backing bitmap of window surfaces. No-op for offscreen surfaces.
    pub fn present(&mut self) {
        if let SurfaceKind::Window(window) = &mut self.kind {
            window.present(&mut self.core);
        }
    }

    /// Read a pixel back and make it the current color.
    /// Returns the current color, unchanged if the pixel could not be read.
    pub fn pget(&mut self, x: i32, y: i32) -> ColorU8 {
        let px = {
            let canvas = Suspend::new(&mut self.core);
            canvas.read_pixel(x, y)
        };
        if let Some(px) = px {
            self.core.state.color = px.without_opacity();
        }
        self.core.state.color
    }

    /// Load an image and draw it at the cursor.
    ///
    /// The surface is cleared first, depending on the mode. On decode failure,
    /// returns `false` and nothing else is changed.
    pub fn picload(&mut self, path: impl AsRef<Path>, mode: PicloadMode) -> bool {
        let path = path.as_ref();
        if !self.is_usable() {
            log::warn!("picload {}: surface is inert", path.display());
            return false;
        }
        if let Some(clear) = mode.clear_color() {
            self.draw(|ctx, target, _| ctx.clear(target, clear));
        }
        let Some(codec) = self.core.codec.clone() else {
            return false;
        };
        let image = match codec.load_image(path) {
            Ok(image) => image,
            Err(err) => {
                log::warn!("picload {}: {err}", path.display());
                return false;
            }
        };
        let cursor = self.core.state.cursor;
        self.draw(|ctx, target, _| {
            let blit = crate::render::Blit::copy(image.rect(), cursor.x, cursor.y);
            if let Err(err) = ctx.draw_bitmap(target, &image, &blit) {
                log::warn!("picload: {err}");
            }
        });
        true
    }

    /// Save the surface content as an uncompressed bitmap.
    /// An open frame is flushed first and reopened afterwards.
    pub fn bmpsave(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let canvas = Suspend::new(&mut self.core);
        match canvas.save(path) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("bmpsave {}: {err}", path.display());
                false
            }
        }
    }

    /// Set the client size of a window surface, clamped to `1..=size()`.
    /// Returns the clamped size, `None` for offscreen surfaces.
    pub fn set_client_size(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let SurfaceKind::Window(window) = &mut self.kind else {
            return None;
        };
        Some(window.set_client_size(width, height))
    }

    /// The window of this surface was resized by the host.
    /// An open frame is suspended around the swap chain recreation.
    pub fn on_size(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let SurfaceKind::Window(window) = &mut self.kind else {
            return None;
        };
        let _canvas = Suspend::new(&mut self.core);
        Some(window.on_size(width, height))
    }

    /// Scroll the client area of a window surface over its backing bitmap.
    /// The offset is clamped to `[0, w-1] x [0, h-1]`.
    pub fn set_scroll(&mut self, x: i32, y: i32) -> Option<IPoint> {
        let SurfaceKind::Window(window) = &mut self.kind else {
            return None;
        };
        Some(window.set_scroll(x, y))
    }

    /// Rename the window of a window surface
    pub fn title(&mut self, title: &str) {
        if let SurfaceKind::Window(window) = &mut self.kind {
            window.set_title(title);
        }
    }

    /// When enabled, a close request is recorded instead of allowed
    pub fn set_close_intercept(&mut self, intercept: bool) {
        if let SurfaceKind::Window(window) = &mut self.kind {
            window.set_close_intercept(intercept);
        }
    }

    /// Whether a close request was deferred since last call
    pub fn take_close_pending(&mut self) -> bool {
        match &mut self.kind {
            SurfaceKind::Window(window) => window.take_close_pending(),
            SurfaceKind::Offscreen(_) => false,
        }
    }

    pub fn handle_event(&mut self, event: WindowEvent) -> EventResponse {
        let SurfaceKind::Window(window) = &mut self.kind else {
            return EventResponse::Handled;
        };
        match event {
            WindowEvent::Paint => {
                window.present(&mut self.core);
                EventResponse::Handled
            }
            WindowEvent::Close => window.on_close(),
            WindowEvent::Resize { width, height } => {
                let _canvas = Suspend::new(&mut self.core);
                window.on_size(width, height);
                EventResponse::Handled
            }
        }
    }

    /// Run a drawing operation following the redraw protocol
    fn draw<F>(&mut self, f: F)
    where
        F: FnOnce(&mut dyn Context, &mut Bitmap, &DrawState),
    {
        if self.core.draw(f) {
            let _ = self.end_draw_and_present();
        }
    }
}
