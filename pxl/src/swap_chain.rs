use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use hspgfx::Error;
use hspgfx::render::{Bitmap, BitmapUsage, SwapChain};
use hspgfx::window::WindowHandle;

#[derive(Debug, Default)]
struct Frame {
    image: Option<Bitmap>,
    count: usize,
}

/// The front buffers of the windows, i.e. what a screen would show.
#[derive(Debug, Clone, Default)]
pub struct Frames(Rc<RefCell<HashMap<WindowHandle, Frame>>>);

impl Frames {
    /// Last image presented to a window
    pub fn last(&self, window: WindowHandle) -> Option<Bitmap> {
        self.0.borrow().get(&window).and_then(|f| f.image.clone())
    }

    /// Number of presents to a window
    pub fn count(&self, window: WindowHandle) -> usize {
        self.0.borrow().get(&window).map_or(0, |f| f.count)
    }

    fn push(&self, window: WindowHandle, image: &Bitmap) {
        let mut frames = self.0.borrow_mut();
        let frame = frames.entry(window).or_default();
        frame.image = Some(image.clone().with_usage(BitmapUsage::SOURCE | BitmapUsage::CPU_READ));
        frame.count += 1;
    }
}

/// Single back buffer swap chain, presenting to [`Frames`]
#[derive(Debug)]
pub struct PxlSwapChain {
    window: WindowHandle,
    size: (u32, u32),
    back: Option<Bitmap>,
    frames: Frames,
}

fn back_buffer(width: u32, height: u32) -> Result<Bitmap, Error> {
    Bitmap::new(width, height, BitmapUsage::TARGET | BitmapUsage::PRESENT)
}

impl PxlSwapChain {
    pub(crate) fn new(
        window: WindowHandle,
        width: u32,
        height: u32,
        frames: Frames,
    ) -> Result<Self, Error> {
        Ok(PxlSwapChain {
            window,
            size: (width, height),
            back: Some(back_buffer(width, height)?),
            frames,
        })
    }
}

impl SwapChain for PxlSwapChain {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn acquire_buffer(&mut self) -> Result<Bitmap, Error> {
        self.back.take().ok_or(Error::BuffersInUse)
    }

    fn release_buffer(&mut self, buffer: Bitmap) {
        if buffer.size() == self.size {
            self.back = Some(buffer);
        } else {
            log::warn!("released buffer does not match the swap chain size");
        }
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if self.back.is_none() {
            return Err(Error::BuffersInUse);
        }
        self.back = Some(back_buffer(width, height)?);
        self.size = (width, height);
        Ok(())
    }

    fn present(&mut self, buffer: &Bitmap, sync_interval: u32) -> Result<(), Error> {
        if buffer.size() != self.size {
            return Err(Error::InvalidSize(buffer.width(), buffer.height()));
        }
        log::trace!("present {:?} (sync interval {sync_interval})", self.window);
        self.frames.push(self.window, buffer);
        Ok(())
    }
}
