//! Window surfaces and the window host interface.

use std::rc::Rc;

use crate::geom::{IPoint, IRect};
use crate::render::{Bitmap, Blit, SwapChain};
use crate::surface::Canvas;
use crate::{ColorU8, DeviceManager, Error};

/// Opaque identifier of a host window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

/// Description of a window to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDesc {
    pub title: String,
    /// Client width, also the width of the backing bitmap
    pub width: u32,
    /// Client height, also the height of the backing bitmap
    pub height: u32,
}

impl Default for WindowDesc {
    fn default() -> Self {
        WindowDesc {
            title: "hspgfx".to_string(),
            width: 640,
            height: 480,
        }
    }
}

impl WindowDesc {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        WindowDesc {
            title: title.into(),
            width,
            height,
        }
    }
}

/// Events dispatched to window surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window content must be repainted
    Paint,
    /// The user asks to close the window
    Close,
    /// The client area was resized by the user
    Resize { width: u32, height: u32 },
}

/// Answer of a surface to a [`WindowEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResponse {
    Handled,
    /// The window may be closed
    Allow,
    /// Closing is deferred to the program
    Deferred,
}

/// The windowing system.
///
/// Methods take `&self`: hosts are shared by every window surface,
/// implementations use interior mutability.
pub trait WindowHost {
    fn create_window(&self, desc: &WindowDesc) -> Result<WindowHandle, Error>;

    fn destroy_window(&self, window: WindowHandle);

    /// Outer window size needed for a client area size
    fn adjust_window_rect(&self, window: WindowHandle, client: (u32, u32)) -> (u32, u32);

    fn set_outer_size(&self, window: WindowHandle, size: (u32, u32));

    fn set_title(&self, window: WindowHandle, title: &str);

    /// Drain the pending events of all windows
    fn pump_messages(&self) -> Vec<(WindowHandle, WindowEvent)>;
}

/// Window part of a window [`Surface`](crate::Surface).
///
/// The surface draws into a backing bitmap of immutable size.
/// The window shows a client area at most as large, scrolled over the backing
/// bitmap, through a swap chain of the client size.
pub struct WindowSurface {
    handle: WindowHandle,
    host: Rc<dyn WindowHost>,
    swap_chain: Option<Box<dyn SwapChain>>,
    back_buffer: Option<Bitmap>,
    backing: (u32, u32),
    client: (u32, u32),
    scroll: IPoint,
    title: String,
    margin_color: ColorU8,
    sync_interval: u32,
    close_intercept: bool,
    close_pending: bool,
}

impl std::fmt::Debug for WindowSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowSurface")
            .field("handle", &self.handle)
            .field("title", &self.title)
            .field("backing", &self.backing)
            .field("client", &self.client)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

impl WindowSurface {
    pub(crate) fn new(
        devices: &DeviceManager,
        host: Rc<dyn WindowHost>,
        desc: &WindowDesc,
    ) -> Result<Self, Error> {
        let backing = (desc.width.max(1), desc.height.max(1));
        let desc = WindowDesc {
            width: backing.0,
            height: backing.1,
            ..desc.clone()
        };
        let handle = host.create_window(&desc)?;

        let mut swap_chain = match devices.device() {
            Some(device) => match device.create_swap_chain(handle, backing.0, backing.1) {
                Ok(sc) => Some(sc),
                Err(err) => {
                    log::warn!("window \"{}\": no swap chain ({err})", desc.title);
                    None
                }
            },
            None => None,
        };
        let back_buffer = swap_chain
            .as_deref_mut()
            .and_then(|sc| sc.acquire_buffer().ok());

        let opts = devices.options();
        log::debug!(
            "created window \"{}\" ({}x{})",
            desc.title,
            backing.0,
            backing.1
        );
        Ok(WindowSurface {
            handle,
            host,
            swap_chain,
            back_buffer,
            backing,
            client: backing,
            scroll: IPoint::new(0, 0),
            title: desc.title,
            margin_color: opts.margin_color,
            sync_interval: opts.sync_interval,
            close_intercept: false,
            close_pending: false,
        })
    }

    pub fn handle(&self) -> WindowHandle {
        self.handle
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn client_size(&self) -> (u32, u32) {
        self.client
    }

    pub fn scroll(&self) -> IPoint {
        self.scroll
    }

    /// Whether the window can present
    pub fn can_present(&self) -> bool {
        self.swap_chain.is_some() && self.back_buffer.is_some()
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.host.set_title(self.handle, title);
    }

    /// Copy the visible part of the backing bitmap to the swap chain and present it.
    pub(crate) fn present(&mut self, canvas: &mut Canvas) {
        let (Some(sc), Some(back)) = (self.swap_chain.as_deref_mut(), self.back_buffer.as_mut())
        else {
            return;
        };
        let lost = {
            let (Some(ctx), Some(backing)) = (canvas.ctx.as_deref_mut(), canvas.target.as_ref())
            else {
                return;
            };
            if ctx.is_drawing() {
                log::debug!("window \"{}\": present skipped, frame open", self.title);
                return;
            }

            let visible = IRect::from_xywh(self.scroll.x, self.scroll.y, self.client.0, self.client.1);
            ctx.begin_draw();
            ctx.clear(back, self.margin_color);
            if let Some(src) = visible.intersect(&backing.rect()) {
                if let Err(err) = ctx.draw_bitmap(back, backing, &Blit::copy(src, 0, 0)) {
                    log::warn!("window \"{}\": could not copy backing bitmap: {err}", self.title);
                }
            }
            matches!(ctx.end_draw(), Err(Error::RecreateTarget))
        };
        if lost {
            canvas.mark_device_lost();
            return;
        }
        if let Err(err) = sc.present(back, self.sync_interval) {
            log::warn!("window \"{}\": present failed: {err}", self.title);
        }
    }

    /// Set the logical client size, clamped to the backing size, and resize the window.
    pub(crate) fn set_client_size(&mut self, width: u32, height: u32) -> (u32, u32) {
        let client = self.clamp_client(width, height);
        let outer = self.host.adjust_window_rect(self.handle, client);
        self.host.set_outer_size(self.handle, outer);
        self.resize_swap_chain(client);
        client
    }

    /// The window was resized by the host
    pub(crate) fn on_size(&mut self, width: u32, height: u32) -> (u32, u32) {
        let client = self.clamp_client(width, height);
        self.resize_swap_chain(client);
        client
    }

    pub(crate) fn set_scroll(&mut self, x: i32, y: i32) -> IPoint {
        self.scroll = IPoint::new(
            x.clamp(0, self.backing.0 as i32 - 1),
            y.clamp(0, self.backing.1 as i32 - 1),
        );
        self.scroll
    }

    pub(crate) fn set_close_intercept(&mut self, intercept: bool) {
        self.close_intercept = intercept;
    }

    /// Whether a close was deferred, and reset the flag
    pub(crate) fn take_close_pending(&mut self) -> bool {
        std::mem::take(&mut self.close_pending)
    }

    pub(crate) fn on_close(&mut self) -> EventResponse {
        if self.close_intercept {
            self.close_pending = true;
            EventResponse::Deferred
        } else {
            EventResponse::Allow
        }
    }

    fn clamp_client(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.clamp(1, self.backing.0),
            height.clamp(1, self.backing.1),
        )
    }

    fn resize_swap_chain(&mut self, client: (u32, u32)) {
        self.client = client;
        let Some(sc) = self.swap_chain.as_deref_mut() else {
            return;
        };
        if let Some(buffer) = self.back_buffer.take() {
            sc.release_buffer(buffer);
        }
        if let Err(err) = sc.resize_buffers(client.0, client.1) {
            log::warn!("window \"{}\": could not resize swap chain: {err}", self.title);
        }
        match sc.acquire_buffer() {
            Ok(buffer) => self.back_buffer = Some(buffer),
            Err(err) => log::warn!("window \"{}\": no back buffer: {err}", self.title),
        }
        log::debug!(
            "window \"{}\": swap chain resized to {}x{}",
            self.title,
            client.0,
            client.1
        );
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        if let (Some(sc), Some(buffer)) = (self.swap_chain.as_deref_mut(), self.back_buffer.take()) {
            sc.release_buffer(buffer);
        }
        self.swap_chain = None;
        self.host.destroy_window(self.handle);
        log::debug!("destroyed window \"{}\"", self.title);
    }
}
