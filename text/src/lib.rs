//! Text layout for hspgfx.
//!
//! This crate is the text-layout factory of the graphics runtime:
//! it owns the font database, resolves legacy font requests (`font`, `sysfont`)
//! into [`TextFormat`]s, shapes text with rustybuzz and turns it into paths.
//! Surfaces never see glyphs, only paths and metrics.

use std::fmt;
use std::sync::Arc;

use hspgfx_base::geom;
use ttf_parser as ttf;

pub mod block;
pub mod font;
pub mod line;
pub mod stock;

pub use block::TextBlock;
pub use font::{FontStyle, ScaledMetrics, Slant, TextFormat, Weight};
pub use line::{LineText, ScriptDir};
pub use stock::StockFont;

pub use fontdb;

#[derive(Debug, Clone)]
pub enum Error {
    NoSuchFont(String),
    FaceParsingError(ttf::FaceParsingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchFont(family) => write!(f, "Could not find a face for \"{}\"", family),
            Error::FaceParsingError(err) => err.fmt(f),
        }
    }
}

impl From<ttf::FaceParsingError> for Error {
    fn from(err: ttf::FaceParsingError) -> Self {
        Error::FaceParsingError(err)
    }
}

impl std::error::Error for Error {}

/// Where fonts are loaded from when building a [`FontDb`]
#[derive(Debug, Clone, Default)]
pub struct FontSources {
    /// Load the fonts installed on the system
    pub system: bool,
    /// Additional directories scanned for font files
    pub dirs: Vec<std::path::PathBuf>,
    /// In-memory font files
    pub data: Vec<Arc<Vec<u8>>>,
}

/// Shared font database.
///
/// Cheap to clone, every surface of a runtime holds one.
#[derive(Debug, Clone)]
pub struct FontDb(Arc<fontdb::Database>);

impl FontDb {
    pub fn new(db: fontdb::Database) -> Self {
        FontDb(Arc::new(db))
    }

    /// Build the database from the given sources
    pub fn load(sources: &FontSources) -> Self {
        let mut db = fontdb::Database::new();
        #[cfg(feature = "fs")]
        {
            if sources.system {
                db.load_system_fonts();
            }
            for dir in &sources.dirs {
                db.load_fonts_dir(dir);
            }
        }
        #[cfg(not(feature = "fs"))]
        if sources.system || !sources.dirs.is_empty() {
            log::warn!("filesystem font loading is disabled, only in-memory fonts are used");
        }
        for data in &sources.data {
            db.load_font_data(data.as_ref().clone());
        }
        log::debug!("font database loaded with {} faces", db.len());
        FontDb::new(db)
    }

    pub fn database(&self) -> &fontdb::Database {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FontDb {
    fn default() -> Self {
        FontDb::new(fontdb::Database::new())
    }
}

/// Returns `Some(true)` if the first strong character of the text is right-to-left,
/// `Some(false)` if it is left-to-right, and `None` if there is no strong character.
pub(crate) fn script_is_rtl(text: &str) -> Option<bool> {
    use unicode_bidi::{BidiClass, bidi_class};
    let mut in_doubt_rtl = false;
    for c in text.chars() {
        match bidi_class(c) {
            BidiClass::L | BidiClass::LRE | BidiClass::LRO | BidiClass::LRI => {
                return Some(false);
            }
            BidiClass::R | BidiClass::AL | BidiClass::RLE | BidiClass::RLO | BidiClass::RLI => {
                return Some(true);
            }
            BidiClass::AN => {
                // arabic number, can be in both contexts, but if we have only those, we chose RTL
                in_doubt_rtl = true;
            }
            _ => (),
        }
    }
    if in_doubt_rtl { Some(true) } else { None }
}

struct Outliner<'a>(&'a mut geom::PathBuilder);

impl ttf::OutlineBuilder for Outliner<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}
