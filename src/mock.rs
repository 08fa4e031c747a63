//! Recording mock device for unit tests.
//!
//! Fills are rasterized as their bounding box, which is exact for the
//! axis-aligned rectangles used by the tests. Other operations are only counted.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::geom::{IRect, Path, Transform};
use crate::image::{BmpCodec, ImageCodec};
use crate::render::{
    Backend, Bitmap, Blit, BitmapUsage, Context, Device, DeviceKind, Paint, Shader, SwapChain,
};
use crate::window::{WindowDesc, WindowEvent, WindowHandle, WindowHost};
use crate::{ColorU8, DeviceManager, Error, Options, Surface};

#[derive(Debug, Default)]
pub struct Calls {
    pub begins: usize,
    pub ends: usize,
    pub clears: usize,
    pub fills: usize,
    pub strokes: usize,
    pub blits: usize,
    pub presents: usize,
    pub resizes: Vec<(u32, u32)>,
    /// While set, every `end_draw` reports a lost device
    pub lose_device: bool,
}

pub type Log = Rc<RefCell<Calls>>;

#[derive(Debug, Default)]
pub struct MockBackend {
    no_hardware: bool,
    created: Rc<Cell<usize>>,
    log: Log,
}

impl MockBackend {
    pub fn without_hardware() -> Self {
        MockBackend {
            no_hardware: true,
            ..Default::default()
        }
    }

    pub fn created_devices(&self) -> Rc<Cell<usize>> {
        self.created.clone()
    }

    pub fn log(&self) -> Log {
        self.log.clone()
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn create_device(&self, kind: DeviceKind) -> Result<Rc<dyn Device>, Error> {
        if kind == DeviceKind::Hardware && self.no_hardware {
            return Err(Error::DeviceCreation("no hardware".to_string()));
        }
        self.created.set(self.created.get() + 1);
        Ok(Rc::new(MockDevice {
            kind,
            log: self.log.clone(),
        }))
    }

    fn create_codec(&self) -> Rc<dyn ImageCodec> {
        Rc::new(BmpCodec)
    }
}

struct MockDevice {
    kind: DeviceKind,
    log: Log,
}

impl Device for MockDevice {
    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn create_context(&self) -> Result<Box<dyn Context>, Error> {
        Ok(Box::new(MockContext {
            drawing: false,
            log: self.log.clone(),
        }))
    }

    fn create_swap_chain(
        &self,
        _window: WindowHandle,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn SwapChain>, Error> {
        Ok(Box::new(MockSwapChain {
            size: (width, height),
            outstanding: false,
            log: self.log.clone(),
        }))
    }
}

struct MockContext {
    drawing: bool,
    log: Log,
}

fn fill_rect(target: &mut Bitmap, rect: IRect, color: ColorU8) {
    let Some(rect) = rect.intersect(&target.rect()) else {
        return;
    };
    let w = target.width() as usize;
    let px = color.premultiply();
    let data = target.data_mut();
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            let i = (y as usize * w + x as usize) * 4;
            data[i..i + 4].copy_from_slice(&px);
        }
    }
}

impl Context for MockContext {
    fn begin_draw(&mut self) {
        self.drawing = true;
        self.log.borrow_mut().begins += 1;
    }

    fn end_draw(&mut self) -> Result<(), Error> {
        self.drawing = false;
        let mut log = self.log.borrow_mut();
        log.ends += 1;
        if log.lose_device {
            return Err(Error::RecreateTarget);
        }
        Ok(())
    }

    fn is_drawing(&self) -> bool {
        self.drawing
    }

    fn clear(&mut self, target: &mut Bitmap, color: ColorU8) {
        if self.drawing {
            self.log.borrow_mut().clears += 1;
            fill_rect(target, target.rect(), color);
        }
    }

    fn fill_path(&mut self, target: &mut Bitmap, path: &Path, paint: &Paint, transform: Transform) {
        if !self.drawing {
            return;
        }
        self.log.borrow_mut().fills += 1;
        let (Shader::Solid(color), Some(path)) = (paint.shader, path.clone().transform(transform))
        else {
            return;
        };
        let b = path.bounds();
        let rect = IRect::from_ltrb(
            b.left().round() as i32,
            b.top().round() as i32,
            b.right().round() as i32,
            b.bottom().round() as i32,
        );
        fill_rect(target, rect, color);
    }

    fn stroke_path(
        &mut self,
        _target: &mut Bitmap,
        _path: &Path,
        _paint: &Paint,
        _width: f32,
        _transform: Transform,
    ) {
        if self.drawing {
            self.log.borrow_mut().strokes += 1;
        }
    }

    fn draw_bitmap(&mut self, _target: &mut Bitmap, src: &Bitmap, _blit: &Blit) -> Result<(), Error> {
        if !src.usage().contains(BitmapUsage::SOURCE) {
            return Err(Error::NotASource);
        }
        if self.drawing {
            self.log.borrow_mut().blits += 1;
        }
        Ok(())
    }

    fn read_pixels(&self, target: &Bitmap, rect: IRect) -> Result<Vec<ColorU8>, Error> {
        if self.drawing {
            return Err(Error::FrameOpen);
        }
        let mut px = Vec::with_capacity((rect.width() * rect.height()) as usize);
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                px.push(target.pixel(x, y).unwrap_or_default());
            }
        }
        Ok(px)
    }
}

struct MockSwapChain {
    size: (u32, u32),
    outstanding: bool,
    log: Log,
}

impl SwapChain for MockSwapChain {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn acquire_buffer(&mut self) -> Result<Bitmap, Error> {
        self.outstanding = true;
        Bitmap::new(self.size.0, self.size.1, BitmapUsage::TARGET | BitmapUsage::PRESENT)
    }

    fn release_buffer(&mut self, _buffer: Bitmap) {
        self.outstanding = false;
    }

    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if self.outstanding {
            return Err(Error::BuffersInUse);
        }
        self.size = (width, height);
        self.log.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn present(&mut self, _buffer: &Bitmap, _sync_interval: u32) -> Result<(), Error> {
        self.log.borrow_mut().presents += 1;
        Ok(())
    }
}

/// Window host recording window sizes and titles
#[derive(Debug, Default)]
pub struct MockHost {
    next: Cell<u64>,
    pub windows: RefCell<BTreeMap<WindowHandle, (String, (u32, u32))>>,
    pub events: RefCell<Vec<(WindowHandle, WindowEvent)>>,
}

impl MockHost {
    /// Number of windows created so far
    pub fn created(&self) -> u64 {
        self.next.get()
    }
}

/// Border added by [`MockHost::adjust_window_rect`]
pub const BORDER: (u32, u32) = (16, 39);

impl WindowHost for MockHost {
    fn create_window(&self, desc: &WindowDesc) -> Result<WindowHandle, Error> {
        let handle = WindowHandle(self.next.get());
        self.next.set(handle.0 + 1);
        let outer = self.adjust_window_rect(handle, (desc.width, desc.height));
        self.windows
            .borrow_mut()
            .insert(handle, (desc.title.clone(), outer));
        Ok(handle)
    }

    fn destroy_window(&self, window: WindowHandle) {
        self.windows.borrow_mut().remove(&window);
    }

    fn adjust_window_rect(&self, _window: WindowHandle, client: (u32, u32)) -> (u32, u32) {
        (client.0 + BORDER.0, client.1 + BORDER.1)
    }

    fn set_outer_size(&self, window: WindowHandle, size: (u32, u32)) {
        if let Some(w) = self.windows.borrow_mut().get_mut(&window) {
            w.1 = size;
        }
    }

    fn set_title(&self, window: WindowHandle, title: &str) {
        if let Some(w) = self.windows.borrow_mut().get_mut(&window) {
            w.0 = title.to_string();
        }
    }

    fn pump_messages(&self) -> Vec<(WindowHandle, WindowEvent)> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

pub fn options() -> Options {
    Options::default().with_system_fonts(false)
}

pub fn devices() -> (Log, DeviceManager) {
    let backend = MockBackend::default();
    let log = backend.log();
    let mut devices = DeviceManager::new(backend, options());
    devices.initialize().unwrap();
    (log, devices)
}

/// A usable offscreen surface, with the log reset after creation
pub fn offscreen(width: u32, height: u32) -> (Log, Surface) {
    let (log, devices) = devices();
    let surf = Surface::offscreen(&devices, width, height);
    *log.borrow_mut() = Calls::default();
    (log, surf)
}

/// An offscreen surface created without initialized device
pub fn inert_offscreen(width: u32, height: u32) -> Surface {
    let devices = DeviceManager::new(MockBackend::default(), options());
    Surface::offscreen(&devices, width, height)
}

/// A usable window surface, with the log reset after creation
pub fn window(width: u32, height: u32) -> (Log, Rc<MockHost>, Surface) {
    let (log, devices) = devices();
    let host = Rc::new(MockHost::default());
    let desc = WindowDesc::new("test", width, height);
    let surf = Surface::window(&devices, host.clone(), &desc).unwrap();
    *log.borrow_mut() = Calls::default();
    (log, host, surf)
}
