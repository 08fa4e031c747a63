//! Render module: abstraction over the 2D device capability.
//!
//! The runtime never rasterizes anything itself. It talks to a [`Device`],
//! draws through [`Context`]s into [`Bitmap`]s and presents window contents
//! through [`SwapChain`]s. Devices are created by a [`Backend`].
//! See the `hspgfx-pxl` crate for the tiny-skia implementation.

use std::rc::Rc;

use bitflags::bitflags;

use crate::geom::{IRect, Path, Transform};
use crate::image::ImageCodec;
use crate::window::WindowHandle;
use crate::{ColorU8, Error};

bitflags! {
    /// How a bitmap can be used by the device
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BitmapUsage: u32 {
        /// Can be bound as render target of a context
        const TARGET = 1;
        /// Can be used as the source of a blit
        const SOURCE = 2;
        /// Swap chain buffer, presented to a window
        const PRESENT = 4;
        /// Pixels can be read back
        const CPU_READ = 8;
    }
}

/// A device bitmap, in premultiplied RGBA8
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    usage: BitmapUsage,
    data: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    /// Create a transparent bitmap
    pub fn new(width: u32, height: u32, usage: BitmapUsage) -> Result<Self, Error> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|&n| n > 0)
            .ok_or(Error::InvalidSize(width, height))?;
        Ok(Bitmap {
            width,
            height,
            usage,
            data: vec![0; len],
        })
    }

    /// Create a bitmap from unpremultiplied colors, in row order
    pub fn from_colors(
        width: u32,
        height: u32,
        usage: BitmapUsage,
        colors: &[ColorU8],
    ) -> Result<Self, Error> {
        let mut bitmap = Bitmap::new(width, height, usage)?;
        if colors.len() != (width * height) as usize {
            return Err(Error::InvalidSize(width, height));
        }
        for (px, c) in bitmap.data.chunks_exact_mut(4).zip(colors) {
            px.copy_from_slice(&c.premultiply());
        }
        Ok(bitmap)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn rect(&self) -> IRect {
        IRect::from_size(self.width, self.height)
    }

    pub fn usage(&self) -> BitmapUsage {
        self.usage
    }

    /// The same pixels with another usage
    pub fn with_usage(self, usage: BitmapUsage) -> Self {
        Bitmap { usage, ..self }
    }

    /// Unpremultiplied color of a pixel, `None` when out of bounds
    pub fn pixel(&self, x: i32, y: i32) -> Option<ColorU8> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        Some(ColorU8::from_premultiplied(px))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Shader of a [`Paint`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shader {
    /// Solid color fill
    Solid(ColorU8),
    /// Two stops linear gradient between two points, padded outside
    LinearGradient {
        start: (f32, f32),
        end: (f32, f32),
        start_color: ColorU8,
        end_color: ColorU8,
    },
}

/// Describes how a path is filled or stroked
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub shader: Shader,
    pub anti_alias: bool,
}

impl Paint {
    /// Aliased solid color
    pub fn solid(color: ColorU8) -> Self {
        Paint {
            shader: Shader::Solid(color),
            anti_alias: false,
        }
    }

    pub fn with_anti_alias(self, anti_alias: bool) -> Self {
        Paint { anti_alias, ..self }
    }
}

impl From<ColorU8> for Paint {
    fn from(value: ColorU8) -> Self {
        Paint::solid(value)
    }
}

/// Compositing operator of a blit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeOp {
    /// Destination pixels are replaced
    #[default]
    Copy,
    /// Source is alpha blended over the destination
    SourceOver,
    /// Source is added to the destination
    Add,
    /// Source is subtracted from the destination
    Subtract,
}

/// Sampling of scaled or rotated blits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Nearest,
    Linear,
}

/// A bitmap copy operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    /// Region of the source bitmap that is copied
    pub src_rect: IRect,
    /// Transform from the source region (its top-left at origin) to the target
    pub transform: Transform,
    pub interpolation: Interpolation,
    pub op: CompositeOp,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Source pixels of this color are skipped
    pub color_key: Option<ColorU8>,
}

impl Blit {
    /// Opaque 1:1 copy of a source region at a target position
    pub fn copy(src_rect: IRect, x: i32, y: i32) -> Self {
        Blit {
            src_rect,
            transform: Transform::from_translate(x as f32, y as f32),
            interpolation: Interpolation::Nearest,
            op: CompositeOp::Copy,
            opacity: 1.0,
            color_key: None,
        }
    }
}

/// A drawing context, bound to a device.
///
/// Drawing happens only between [`begin_draw`](Context::begin_draw)
/// and [`end_draw`](Context::end_draw).
/// Draw calls issued outside a frame are ignored by the device.
pub trait Context {
    /// Open a frame
    fn begin_draw(&mut self);

    /// Close the frame and flush.
    /// Returns [`Error::RecreateTarget`] when the device was lost.
    fn end_draw(&mut self) -> Result<(), Error>;

    /// Whether a frame is open
    fn is_drawing(&self) -> bool;

    /// Fill the whole target with a color, ignoring blending
    fn clear(&mut self, target: &mut Bitmap, color: ColorU8);

    /// Fill a path with the winding rule
    fn fill_path(&mut self, target: &mut Bitmap, path: &Path, paint: &Paint, transform: Transform);

    /// Stroke a path with a butt-capped line of the given width
    fn stroke_path(
        &mut self,
        target: &mut Bitmap,
        path: &Path,
        paint: &Paint,
        width: f32,
        transform: Transform,
    );

    /// Copy a region of a source bitmap.
    /// The source must carry [`BitmapUsage::SOURCE`].
    fn draw_bitmap(&mut self, target: &mut Bitmap, src: &Bitmap, blit: &Blit) -> Result<(), Error>;

    /// Read back pixels of a target region, in row order.
    /// Not allowed while a frame is open.
    fn read_pixels(&self, target: &Bitmap, rect: IRect) -> Result<Vec<ColorU8>, Error>;
}

/// A swap chain presenting bitmaps to a window
pub trait SwapChain {
    fn size(&self) -> (u32, u32);

    /// Acquire the back buffer.
    /// It must be given back with [`release_buffer`](SwapChain::release_buffer)
    /// before the swap chain can be resized.
    fn acquire_buffer(&mut self) -> Result<Bitmap, Error>;

    /// Give back a buffer acquired earlier
    fn release_buffer(&mut self, buffer: Bitmap);

    /// Resize the buffers. Fails with [`Error::BuffersInUse`] while a buffer is acquired.
    fn resize_buffers(&mut self, width: u32, height: u32) -> Result<(), Error>;

    /// Present the content of the back buffer
    fn present(&mut self, buffer: &Bitmap, sync_interval: u32) -> Result<(), Error>;
}

/// Kind of device to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    Hardware,
    /// Software reference rasterizer
    Software,
}

/// A 2D device
pub trait Device {
    fn kind(&self) -> DeviceKind;

    fn create_context(&self) -> Result<Box<dyn Context>, Error>;

    fn create_swap_chain(
        &self,
        window: WindowHandle,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn SwapChain>, Error>;

    /// Create a bitmap owned by this device
    fn create_bitmap(&self, width: u32, height: u32, usage: BitmapUsage) -> Result<Bitmap, Error> {
        Bitmap::new(width, height, usage)
    }
}

/// Entry point of a device implementation
pub trait Backend {
    fn name(&self) -> &str;

    fn create_device(&self, kind: DeviceKind) -> Result<Rc<dyn Device>, Error>;

    fn create_codec(&self) -> Rc<dyn ImageCodec>;
}
