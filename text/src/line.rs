//! Module that contains a simple single line text layout engine

use hspgfx_base::geom;
use ttf_parser as ttf;

use crate::font::{self, ScaledMetrics, TextFormat};
use crate::{Error, fontdb};

/// Direction of the main script of a line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScriptDir {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// A single shaped line of text.
///
/// The glyphs are laid out so that the origin point (0, 0) is the top-left
/// corner of the line box, and the baseline is at `y = ascent`.
#[derive(Debug, Clone)]
pub struct LineText {
    text: String,
    format: TextFormat,
    face_id: fontdb::ID,
    main_dir: ScriptDir,
    metrics: ScaledMetrics,
    width: f32,
    glyphs: Vec<Glyph>,
}

/// A glyph in a shaped line
#[derive(Debug, Clone, Copy)]
struct Glyph {
    id: ttf::GlyphId,
    ts: geom::Transform,
}

impl LineText {
    /// Shape a line of text.
    ///
    /// The whole line is shaped with a single face, selected from the format.
    pub fn new(text: String, format: &TextFormat, db: &fontdb::Database) -> Result<Self, Error> {
        let face_id = font::select_face(db, format)
            .ok_or_else(|| Error::NoSuchFont(format.family().to_string()))?;

        let main_dir = match crate::script_is_rtl(&text) {
            Some(true) => ScriptDir::RightToLeft,
            _ => ScriptDir::LeftToRight,
        };

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(&text);
        buffer.set_direction(match main_dir {
            ScriptDir::LeftToRight => rustybuzz::Direction::LeftToRight,
            ScriptDir::RightToLeft => rustybuzz::Direction::RightToLeft,
        });
        buffer.guess_segment_properties();

        let (shape, metrics) = db
            .with_face_data(face_id, |data, index| -> Result<_, Error> {
                let mut face = ttf::Face::parse(data, index)?;
                font::apply_variations(&mut face, format);
                let metrics = font::face_metrics(&face, format.size());
                let hbface = rustybuzz::Face::from_face(face);
                Ok((rustybuzz::shape(&hbface, &[], buffer), metrics))
            })
            .ok_or_else(|| Error::NoSuchFont(format.family().to_string()))??;

        let y_flip = geom::Transform::from_scale(1.0, -1.0);
        let scale_ts = geom::Transform::from_scale(metrics.scale, metrics.scale);

        let mut x_cursor = 0.0;
        let mut y_cursor = metrics.ascent;
        let mut glyphs = Vec::with_capacity(shape.len());
        for (i, p) in shape.glyph_infos().iter().zip(shape.glyph_positions()) {
            let x = x_cursor + p.x_offset as f32 * metrics.scale;
            let y = y_cursor - p.y_offset as f32 * metrics.scale;
            let pos_ts = geom::Transform::from_translate(x, y);
            glyphs.push(Glyph {
                id: ttf::GlyphId(i.glyph_id as u16),
                ts: y_flip.post_concat(scale_ts).post_concat(pos_ts),
            });
            x_cursor += p.x_advance as f32 * metrics.scale;
            y_cursor -= p.y_advance as f32 * metrics.scale;
        }

        Ok(LineText {
            text,
            format: format.clone(),
            face_id,
            main_dir,
            metrics,
            width: x_cursor,
            glyphs,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> &TextFormat {
        &self.format
    }

    pub fn main_dir(&self) -> ScriptDir {
        self.main_dir
    }

    pub fn metrics(&self) -> ScaledMetrics {
        self.metrics
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height of the line box (ascent to descent plus line gap)
    #[inline]
    pub fn height(&self) -> f32 {
        self.metrics.line_height()
    }

    /// Add the glyph outlines of this line to a path builder,
    /// with the line box top-left corner at `(0, dy)`.
    ///
    /// Underline and strikeout bars are added when the format asks for them.
    pub fn outline_into(&self, db: &fontdb::Database, dy: f32, pb: &mut geom::PathBuilder) {
        let offset = geom::Transform::from_translate(0.0, dy);
        db.with_face_data(self.face_id, |data, index| {
            let Ok(mut face) = ttf::Face::parse(data, index) else {
                log::warn!("could not parse face for \"{}\"", self.format.family());
                return;
            };
            font::apply_variations(&mut face, &self.format);

            let mut gl_pb = geom::PathBuilder::new();
            for gl in &self.glyphs {
                {
                    let mut builder = crate::Outliner(&mut gl_pb);
                    face.outline_glyph(gl.id, &mut builder);
                }

                if let Some(path) = gl_pb.finish() {
                    if let Some(path) = path.clone().transform(gl.ts.post_concat(offset)) {
                        pb.push_path(&path);
                    }
                    gl_pb = path.clear();
                } else {
                    gl_pb = geom::PathBuilder::new();
                }
            }
        });

        if self.width <= 0.0 {
            return;
        }
        let baseline = dy + self.metrics.ascent;
        if self.format.underline() {
            let (pos, thickness) = self.metrics.uline;
            self.push_bar(pb, baseline - pos, thickness);
        }
        if self.format.strikeout() {
            let (pos, thickness) = self.metrics.strikeout;
            self.push_bar(pb, baseline - pos, thickness);
        }
    }

    fn push_bar(&self, pb: &mut geom::PathBuilder, y_center: f32, thickness: f32) {
        let thickness = thickness.max(1.0);
        let bar = geom::Rect::from_xywh(0.0, y_center - thickness / 2.0, self.width, thickness);
        if let Some(path) = bar.and_then(|r| r.to_path()) {
            pb.push_path(&path);
        }
    }
}
