//! Software device for hspgfx, rasterizing with tiny-skia.
//!
//! Bitmaps are premultiplied RGBA8, which is the native pixmap format of
//! tiny-skia: targets are wrapped in a [`PixmapMut`](tiny_skia::PixmapMut)
//! for each draw call, without copy.
//!
//! The "hardware" device uses the low precision pipeline of tiny-skia when it
//! applies, the "software" device forces the high precision pipeline.
//! [`HeadlessHost`] stands in for a windowing system and [`PxlBackend::frames`]
//! gives access to the presented images.

use std::cell::Cell;
use std::rc::Rc;

use hspgfx::render::{Backend, Context, Device, DeviceKind, SwapChain};
use hspgfx::window::WindowHandle;
use hspgfx::{ColorU8, Error, ImageCodec};

mod codec;
mod context;
mod host;
mod swap_chain;

pub use codec::PxlCodec;
pub use context::PxlContext;
pub use host::HeadlessHost;
pub use swap_chain::{Frames, PxlSwapChain};

/// Device backend of this crate
#[derive(Debug, Clone, Default)]
pub struct PxlBackend {
    software_only: bool,
    generation: Rc<Cell<u64>>,
    frames: Frames,
}

/// Whether a device is still alive.
///
/// Losing the device bumps the generation of the backend. Devices created
/// before stay lost, devices created afterwards are healthy.
#[derive(Debug, Clone, Default)]
pub(crate) struct Liveness {
    generation: Rc<Cell<u64>>,
    created: u64,
}

impl Liveness {
    pub(crate) fn is_lost(&self) -> bool {
        self.generation.get() != self.created
    }
}

impl PxlBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that refuses to create hardware devices
    pub fn software_only() -> Self {
        PxlBackend {
            software_only: true,
            ..Self::default()
        }
    }

    /// Front buffers of every window presented through this backend
    pub fn frames(&self) -> Frames {
        self.frames.clone()
    }

    /// Simulate a device loss.
    /// Every frame closed by a context of the current devices reports it,
    /// until the devices are recreated.
    pub fn lose_device(&self) {
        log::debug!("device loss requested");
        self.generation.set(self.generation.get() + 1);
    }
}

impl Backend for PxlBackend {
    fn name(&self) -> &str {
        "pxl"
    }

    fn create_device(&self, kind: DeviceKind) -> Result<Rc<dyn Device>, Error> {
        if kind == DeviceKind::Hardware && self.software_only {
            return Err(Error::DeviceCreation(
                "hardware device disabled".to_string(),
            ));
        }
        Ok(Rc::new(PxlDevice {
            kind,
            liveness: Liveness {
                generation: self.generation.clone(),
                created: self.generation.get(),
            },
            frames: self.frames.clone(),
        }))
    }

    fn create_codec(&self) -> Rc<dyn ImageCodec> {
        Rc::new(PxlCodec)
    }
}

/// A tiny-skia device
#[derive(Debug)]
pub struct PxlDevice {
    kind: DeviceKind,
    liveness: Liveness,
    frames: Frames,
}

impl Device for PxlDevice {
    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn create_context(&self) -> Result<Box<dyn Context>, Error> {
        let hq = self.kind == DeviceKind::Software;
        Ok(Box::new(PxlContext::new(hq, self.liveness.clone())))
    }

    fn create_swap_chain(
        &self,
        window: WindowHandle,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn SwapChain>, Error> {
        let sc = PxlSwapChain::new(window, width, height, self.frames.clone())?;
        Ok(Box::new(sc))
    }
}

fn ts_color(color: ColorU8) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.red(), color.green(), color.blue(), color.alpha())
}
