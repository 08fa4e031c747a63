//! Text formats and face resolution.

use bitflags::bitflags;
use fontdb::{Database, Family, ID, Query};
use ttf_parser as ttf;

bitflags! {
    /// Style flags of the legacy `font` command
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FontStyle: u32 {
        const BOLD = 1;
        const ITALIC = 2;
        const UNDERLINE = 4;
        const STRIKEOUT = 8;
        const ANTIALIAS = 16;
    }
}

/// Specifies the weight of glyphs in the font, their degree of blackness or stroke thickness.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Debug, Hash)]
pub struct Weight(pub u16);

impl Default for Weight {
    fn default() -> Weight {
        Weight::NORMAL
    }
}

impl Weight {
    /// Normal (400).
    pub const NORMAL: Weight = Weight(400);
    /// Bold weight (700).
    pub const BOLD: Weight = Weight(700);

    /// Returns a numeric representation of a weight suitable for font variations
    pub fn to_var_value(&self) -> f32 {
        self.0 as f32
    }
}

/// Upright or slanted faces
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum Slant {
    #[default]
    Normal,
    Italic,
}

/// A resolved font request: what `mes` renders with.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFormat {
    family: String,
    size: f32,
    weight: Weight,
    slant: Slant,
    underline: bool,
    strikeout: bool,
    antialias: bool,
}

impl TextFormat {
    /// Build a format with normal weight and slant.
    /// The size is in pixels, clamped to at least 1.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        TextFormat {
            family: family.into(),
            size: size.max(1.0),
            weight: Weight::NORMAL,
            slant: Slant::Normal,
            underline: false,
            strikeout: false,
            antialias: false,
        }
    }

    /// Build a format from the arguments of the legacy `font` command
    pub fn from_legacy(family: impl Into<String>, size: i32, style: FontStyle) -> Self {
        let weight = if style.contains(FontStyle::BOLD) {
            Weight::BOLD
        } else {
            Weight::NORMAL
        };
        let slant = if style.contains(FontStyle::ITALIC) {
            Slant::Italic
        } else {
            Slant::Normal
        };
        TextFormat::new(family, size as f32)
            .with_weight(weight)
            .with_slant(slant)
            .with_underline(style.contains(FontStyle::UNDERLINE))
            .with_strikeout(style.contains(FontStyle::STRIKEOUT))
            .with_antialias(style.contains(FontStyle::ANTIALIAS))
    }

    pub fn with_weight(self, weight: Weight) -> Self {
        TextFormat { weight, ..self }
    }

    pub fn with_slant(self, slant: Slant) -> Self {
        TextFormat { slant, ..self }
    }

    pub fn with_underline(self, underline: bool) -> Self {
        TextFormat { underline, ..self }
    }

    pub fn with_strikeout(self, strikeout: bool) -> Self {
        TextFormat { strikeout, ..self }
    }

    pub fn with_antialias(self, antialias: bool) -> Self {
        TextFormat { antialias, ..self }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn slant(&self) -> Slant {
        self.slant
    }

    pub fn underline(&self) -> bool {
        self.underline
    }

    pub fn strikeout(&self) -> bool {
        self.strikeout
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    /// The legacy style flags equivalent to this format
    pub fn style(&self) -> FontStyle {
        let mut style = FontStyle::empty();
        style.set(FontStyle::BOLD, self.weight >= Weight::BOLD);
        style.set(FontStyle::ITALIC, self.slant == Slant::Italic);
        style.set(FontStyle::UNDERLINE, self.underline);
        style.set(FontStyle::STRIKEOUT, self.strikeout);
        style.set(FontStyle::ANTIALIAS, self.antialias);
        style
    }
}

/// Select the face matching a format.
///
/// When no requested family is installed, the sans-serif family is tried,
/// then any face at all, so that text is always rendered when the database
/// is not empty.
pub fn select_face(db: &Database, format: &TextFormat) -> Option<ID> {
    let families = parse_font_family(format.family());
    let weight = fontdb::Weight(format.weight().0);
    let style = match format.slant() {
        Slant::Normal => fontdb::Style::Normal,
        Slant::Italic => fontdb::Style::Italic,
    };
    let query = Query {
        families: &families,
        weight,
        stretch: fontdb::Stretch::Normal,
        style,
    };
    if let Some(id) = db.query(&query) {
        return Some(id);
    }

    let fallback = Query {
        families: &[Family::SansSerif],
        ..query
    };
    let id = db
        .query(&fallback)
        .or_else(|| db.faces().next().map(|f| f.id))?;
    log::warn!(
        "no face for font family \"{}\", falling back to \"{}\"",
        format.family(),
        face_family_name(db, id).unwrap_or_default()
    );
    Some(id)
}

/// The first family name of a face
pub fn face_family_name(db: &Database, id: ID) -> Option<String> {
    db.face(id)
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone())
}

pub(crate) fn apply_variations(face: &mut ttf::Face, format: &TextFormat) {
    if face.is_variable() && face.weight().to_number() != format.weight().0 {
        let _ = face.set_variation(ttf::Tag::from_bytes(b"wght"), format.weight().to_var_value());
    }
}

/// Face metrics, scaled to a font size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledMetrics {
    pub scale: f32,
    pub ascent: f32,
    /// Negative, below the baseline
    pub descent: f32,
    pub line_gap: f32,
    /// Underline position (relative to the baseline, negative below) and thickness
    pub uline: (f32, f32),
    /// Strikeout position (relative to the baseline) and thickness
    pub strikeout: (f32, f32),
}

impl ScaledMetrics {
    /// Height of a line box, from the top of the ascender to the next line
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent + self.line_gap
    }
}

pub(crate) fn face_metrics(face: &ttf::Face, size: f32) -> ScaledMetrics {
    let scale = size / face.units_per_em() as f32;
    let ascent = face.ascender() as f32 * scale;
    let descent = face.descender() as f32 * scale;
    let line_gap = face.line_gap() as f32 * scale;
    let uline = face
        .underline_metrics()
        .map(|m| (m.position as f32 * scale, m.thickness as f32 * scale))
        .unwrap_or((descent / 2.0, size / 14.0));
    let strikeout = face
        .strikeout_metrics()
        .map(|m| (m.position as f32 * scale, m.thickness as f32 * scale))
        .unwrap_or((ascent / 3.0, size / 14.0));
    ScaledMetrics {
        scale,
        ascent,
        descent,
        line_gap,
        uline,
        strikeout,
    }
}

fn parse_font_family(input: &str) -> Vec<Family<'_>> {
    let mut families = Vec::new();
    let parts = input.split(',').map(|s| s.trim());

    for part in parts {
        let family = match part {
            "serif" => Family::Serif,
            "sans-serif" => Family::SansSerif,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            "monospace" => Family::Monospace,
            _ => {
                // Remove surrounding quotes if present
                let name = part.trim_matches('\'').trim_matches('"');
                Family::Name(name)
            }
        };
        families.push(family);
    }

    families
}
