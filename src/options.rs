//! Runtime configuration

use std::path::PathBuf;

use crate::redraw::RedrawMode;
use crate::text::{FontSources, TextFormat, stock};
use crate::window::WindowDesc;
use crate::{ColorU8, color};

/// Which device the [`DeviceManager`](crate::DeviceManager) creates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DevicePreference {
    /// Hardware device, falling back to the software device when unavailable
    #[default]
    HardwareWithFallback,
    /// Software device only
    SoftwareOnly,
}

/// Options of the graphics runtime
#[derive(Debug, Clone)]
pub struct Options {
    /// Redraw mode of new surfaces
    pub redraw_mode: RedrawMode,
    /// Color presented outside the backing bitmap of windows
    pub margin_color: ColorU8,
    /// Sync interval passed to swap chains on present
    pub sync_interval: u32,
    /// Text format of new surfaces, and after `cls`
    pub default_font: TextFormat,
    /// Where fonts are loaded from
    pub fonts: FontSources,
    pub device: DevicePreference,
    /// Description of the main window, created on first use
    pub main_window: WindowDesc,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            redraw_mode: RedrawMode::Immediate,
            margin_color: color::BLACK,
            sync_interval: 0,
            default_font: TextFormat::new(stock::DEFAULT_FAMILY, stock::DEFAULT_SIZE),
            fonts: FontSources {
                system: true,
                ..Default::default()
            },
            device: DevicePreference::default(),
            main_window: WindowDesc::default(),
        }
    }
}

impl Options {
    /// Effectively the same as `Options::default()`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the redraw mode of new surfaces and return self for chaining
    pub fn with_redraw_mode(self, redraw_mode: RedrawMode) -> Self {
        Self {
            redraw_mode,
            ..self
        }
    }

    pub fn with_margin_color(self, margin_color: ColorU8) -> Self {
        Self {
            margin_color,
            ..self
        }
    }

    pub fn with_sync_interval(self, sync_interval: u32) -> Self {
        Self {
            sync_interval,
            ..self
        }
    }

    pub fn with_default_font(self, default_font: TextFormat) -> Self {
        Self {
            default_font,
            ..self
        }
    }

    /// Enable or disable loading of the fonts installed on the system
    pub fn with_system_fonts(mut self, system: bool) -> Self {
        self.fonts.system = system;
        self
    }

    /// Add a directory scanned for font files
    pub fn with_font_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts.dirs.push(dir.into());
        self
    }

    /// Add an in-memory font file
    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        self.fonts.data.push(std::sync::Arc::new(data));
        self
    }

    pub fn with_device(self, device: DevicePreference) -> Self {
        Self { device, ..self }
    }

    /// Set the description of the main window and return self for chaining
    pub fn with_main_window(self, main_window: WindowDesc) -> Self {
        Self {
            main_window,
            ..self
        }
    }
}
