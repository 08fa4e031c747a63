#![warn(missing_debug_implementations)]
/*!
 * # hspgfx
 * _the graphics runtime of a legacy BASIC-like language, on a modern 2D device_.
 *
 * hspgfx reimplements the drawing, surface and window semantics of the legacy
 * graphics commands (`boxf`, `mes`, `circle`, `gcopy`, `gzoom`, `grotate`,
 * `gsquare`, ...) on top of an abstracted 2D device with double buffering and
 * swap-chain presentation.
 *
 * ## Get started
 *
 * A runtime needs a device backend (here `hspgfx-pxl`, a tiny-skia software
 * device with a headless window host):
 *
 * ```text
 * cargo add hspgfx
 * cargo add hspgfx-pxl
 * ```
 *
 * ```ignore
 * use std::rc::Rc;
 * use hspgfx::{DeviceManager, Options, Screens, color};
 * use hspgfx_pxl::{HeadlessHost, PxlBackend};
 *
 * let mut devices = DeviceManager::new(PxlBackend::new(), Options::default());
 * devices.initialize()?;
 *
 * let mut screens = Screens::new(devices, Rc::new(HeadlessHost::new()));
 * let main = screens.cur()?;
 * main.set_color(color::RED);
 * main.boxf(10, 10, 100, 60);
 * main.pos(10, 80);
 * main.mes("hello", Default::default());
 * ```
 *
 * ## Notes about the design
 *
 * The [`DeviceManager`] owns the shared device, the font database and the
 * image codec. It is an explicit object passed to surface constructors.
 *
 * A [`Surface`] is a window or an offscreen buffer. All drawing goes through
 * a frame of its drawing context: in [`RedrawMode::Immediate`] each command
 * opens and closes its own frame and windows present it right away; in
 * [`RedrawMode::Manual`] commands are batched until the frame is closed.
 * See the [`redraw`] module.
 *
 * Devices implement the traits of the [`render`] module and live in separate
 * crates. They never see text or quads: text is shaped and outlined to paths
 * by `hspgfx-text`, and quads are turned into paths and bitmaps by the [`quad`]
 * module.
 *
 * [`Screens`] is the table of surfaces of a program, addressed by the legacy
 * numeric ids, with the event pump and the frame pacing waits.
 */

pub mod device;
mod error;
pub mod image;
pub mod options;
pub mod quad;
pub mod redraw;
pub mod render;
pub mod screen;
pub mod surface;
pub mod window;

#[cfg(test)]
mod mock;

pub use device::DeviceManager;
pub use error::Error;
pub use image::{BmpCodec, ImageCodec};
pub use options::{DevicePreference, Options};
pub use quad::QuadCompositor;
pub use redraw::{FrameState, RedrawMode, should_auto_manage};
pub use screen::Screens;
pub use surface::{
    BlitSource, CopyMode, GMode, MesOptions, PicloadMode, Surface, SurfaceKind,
};
pub use window::{EventResponse, WindowDesc, WindowEvent, WindowHandle, WindowHost};

/// Rexports of [`hspgfx_base::color`] items
pub mod color {
    pub use hspgfx_base::color::*;
}
pub use color::ColorU8;

/// Rexports of [`hspgfx_base::geom`] items
pub mod geom {
    pub use hspgfx_base::geom::*;
}

pub use hspgfx_base::{Quad, QuadColors};

/// Rexports of [`hspgfx_text`] items
pub mod text {
    pub use hspgfx_text::*;
}
pub use text::fontdb;
