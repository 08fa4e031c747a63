//! Stock font categories of the legacy `sysfont` command

use crate::font::{self, TextFormat};
use crate::fontdb::{self, Family, Query};

/// Family of the legacy default font
pub const DEFAULT_FAMILY: &str = "MS Gothic";
/// Pixel size of the legacy default font
pub const DEFAULT_SIZE: f32 = 18.0;

/// Stock font categories, identified by their legacy codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StockFont {
    /// Runtime default (code 0)
    #[default]
    Default,
    /// OEM fixed-width (code 10)
    OemFixed,
    /// ANSI fixed-width (code 11)
    AnsiFixed,
    /// ANSI variable-width (code 12)
    AnsiVariable,
    /// System fixed-width (code 13)
    SystemFixed,
    /// Device default (code 14)
    DeviceDefault,
    /// System (code 16)
    System,
    /// GUI default (code 17)
    GuiDefault,
}

impl StockFont {
    /// Map a legacy code to a category. Unknown codes map to [`StockFont::Default`].
    pub fn from_code(code: i32) -> Self {
        match code {
            10 => StockFont::OemFixed,
            11 => StockFont::AnsiFixed,
            12 => StockFont::AnsiVariable,
            13 => StockFont::SystemFixed,
            14 => StockFont::DeviceDefault,
            16 => StockFont::System,
            17 => StockFont::GuiDefault,
            _ => StockFont::Default,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            StockFont::Default => 0,
            StockFont::OemFixed => 10,
            StockFont::AnsiFixed => 11,
            StockFont::AnsiVariable => 12,
            StockFont::SystemFixed => 13,
            StockFont::DeviceDefault => 14,
            StockFont::System => 16,
            StockFont::GuiDefault => 17,
        }
    }

    fn is_fixed_width(&self) -> bool {
        matches!(
            self,
            StockFont::OemFixed | StockFont::AnsiFixed | StockFont::SystemFixed
        )
    }

    fn size(&self) -> f32 {
        match self {
            StockFont::Default => DEFAULT_SIZE,
            StockFont::OemFixed | StockFont::AnsiFixed | StockFont::SystemFixed => 13.0,
            StockFont::AnsiVariable | StockFont::DeviceDefault | StockFont::System => 16.0,
            StockFont::GuiDefault => 12.0,
        }
    }

    /// Resolve the category to a concrete format, by querying the database
    /// for a generic family of the right kind.
    ///
    /// Falls back to the legacy default family and size when no face name
    /// can be resolved.
    pub fn resolve(&self, db: &fontdb::Database) -> TextFormat {
        if *self == StockFont::Default {
            return TextFormat::new(DEFAULT_FAMILY, DEFAULT_SIZE);
        }
        let family = if self.is_fixed_width() {
            Family::Monospace
        } else {
            Family::SansSerif
        };
        let query = Query {
            families: &[family],
            ..Query::default()
        };
        match db.query(&query).and_then(|id| font::face_family_name(db, id)) {
            Some(name) => TextFormat::new(name, self.size()),
            None => {
                log::debug!("no face for stock font {:?}, using the default font", self);
                TextFormat::new(DEFAULT_FAMILY, DEFAULT_SIZE)
            }
        }
    }
}
