//! Multi-line text blocks, as rendered by `mes`

use hspgfx_base::geom;

use crate::font::TextFormat;
use crate::line::LineText;
use crate::{Error, fontdb};

/// A block of left aligned lines.
///
/// Lines are split on `\n` and `\r\n`. Each line advances by the line height
/// of the face, rounded up to whole pixels.
#[derive(Debug, Clone)]
pub struct TextBlock {
    lines: Vec<LineText>,
    line_height: f32,
}

impl TextBlock {
    pub fn new(text: &str, format: &TextFormat, db: &fontdb::Database) -> Result<Self, Error> {
        let lines = split_lines(text)
            .map(|l| LineText::new(l.to_string(), format, db))
            .collect::<Result<Vec<_>, _>>()?;
        let line_height = lines
            .first()
            .map_or(format.size(), |l| l.height())
            .ceil();
        Ok(TextBlock { lines, line_height })
    }

    pub fn lines(&self) -> &[LineText] {
        &self.lines
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Width of the widest line
    pub fn width(&self) -> f32 {
        self.lines.iter().map(|l| l.width()).fold(0.0, f32::max)
    }

    pub fn height(&self) -> f32 {
        self.line_height * self.lines.len() as f32
    }

    /// Pixel size of the last line, rounded up
    pub fn last_line_size(&self) -> (u32, u32) {
        let w = self.lines.last().map_or(0.0, |l| l.width());
        (w.ceil() as u32, self.line_height as u32)
    }

    /// Pixel size of the whole block, rounded up
    pub fn size(&self) -> (u32, u32) {
        (self.width().ceil() as u32, self.height() as u32)
    }

    /// Outline of the whole block, with its top-left corner at the origin.
    /// `None` if no line produced any outline (e.g. only spaces).
    pub fn outline(&self, db: &fontdb::Database) -> Option<geom::Path> {
        let mut pb = geom::PathBuilder::new();
        for (i, line) in self.lines.iter().enumerate() {
            line.outline_into(db, i as f32 * self.line_height, &mut pb);
        }
        pb.finish()
    }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}
