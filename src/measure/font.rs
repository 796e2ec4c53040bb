use super::TextMetrics;
use crate::error::FlowError;
use crate::units::Pt;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};

/// A parsed TrueType or OpenType face used for measuring text.
///
/// Only metrics are read from the face: glyph advances for line breaking and
/// the ascender, descender and line gap for line height.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, FlowError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    /// Load a font file from disk
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Font, FlowError> {
        Font::load(std::fs::read(path)?)
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// Obtain the family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.name_entry(owned_ttf_parser::name_id::FAMILY)
    }

    fn name_entry(&self, id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given
    /// font size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the
    /// given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// Calculate the leading (extra space between lines) for the given font size
    pub fn leading(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().line_gap() as f32
    }

    /// Glyph for `ch`, falling back to the replacement character and then `?`
    fn glyph(&self, ch: char) -> Option<GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }
}

impl TextMetrics for Font {
    fn advance(&self, ch: char, size: Pt) -> Pt {
        let units = self
            .glyph(ch)
            .and_then(|gid| self.face.as_face_ref().glyph_hor_advance(gid))
            .unwrap_or_default();
        self.scaling(size) * units as f32
    }

    /// The default line height of the font: how much to vertically offset a
    /// second row of text below a first row of text.
    fn line_height(&self, size: Pt) -> Pt {
        self.leading(size) + self.ascent(size) - self.descent(size)
    }
}
