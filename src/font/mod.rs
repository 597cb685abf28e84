//! Fonts embedded into a document
//!
//! A [`FontResource`] owns the encoding of one font within one document.
//! Codes are handed out on first use and never change afterwards, so the
//! font dictionary is only complete once all text has been laid out.

use std::{collections::BTreeMap, io, sync::Arc};

use pdf_create::{
    common::ObjKey,
    write::{Formatter, PdfObject},
};
use serde::Deserialize;
use smallvec::{smallvec, SmallVec};

use crate::{
    cmap::{CodeWidth, ToUnicodeCMap},
    config::Settings,
};

pub mod encoding;
pub mod outline;
pub mod program;

mod cid;
mod type3;

use encoding::{glyph_name, winansi_code};
use outline::{transcribe, GlyphProgram};
use program::{FontProgram, GlyphId};

/// Index of a font within a document
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub(crate) usize);

/// How a font program is embedded
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
pub enum Embedding {
    /// A Type 3 font with one drawing procedure per used glyph
    #[default]
    Type3,
    /// A Type 0 font with the complete font file and 2-byte glyph codes
    Cid,
}

/// The codes that show a single character
pub type Code = SmallVec<[u8; 2]>;

/// A font program and its encoding within a document
pub struct FontResource {
    pub(crate) key: ObjKey,
    program: Arc<dyn FontProgram>,
    embedding: Embedding,
    codes: BTreeMap<char, u8>,
    /// `'\0'` marks an unused code
    runes: [char; 256],
    char_procs: BTreeMap<String, GlyphProgram>,
    /// The glyphs used with [`Embedding::Cid`], and the first character for each
    glyphs: BTreeMap<u16, char>,
}

impl std::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontResource")
            .field("name", &self.program.postscript_name())
            .field("embedding", &self.embedding)
            .field("codes", &self.codes)
            .finish()
    }
}

impl FontResource {
    pub(crate) fn new(key: ObjKey, program: Arc<dyn FontProgram>, embedding: Embedding) -> Self {
        Self {
            key,
            program,
            embedding,
            codes: BTreeMap::new(),
            runes: ['\0'; 256],
            char_procs: BTreeMap::new(),
            glyphs: BTreeMap::new(),
        }
    }

    /// The font program
    pub fn program(&self) -> &dyn FontProgram {
        self.program.as_ref()
    }

    /// The embedding of this font
    pub fn embedding(&self) -> Embedding {
        self.embedding
    }

    /// The character for a code, if it was allocated
    pub fn rune(&self, code: u8) -> Option<char> {
        match self.runes[usize::from(code)] {
            '\0' => None,
            chr => Some(chr),
        }
    }

    /// The allocated codes, in code order
    pub fn used_codes(&self) -> impl Iterator<Item = (u8, char)> + '_ {
        (1..=255u8).filter_map(move |code| self.rune(code).map(|chr| (code, chr)))
    }

    /// The Type 3 glyph program with the given name
    pub fn char_proc(&self, name: &str) -> Option<&GlyphProgram> {
        self.char_procs.get(name)
    }

    fn is_free(&self, code: u8) -> bool {
        self.runes[usize::from(code)] == '\0'
    }

    fn spill_code(&self) -> Option<u8> {
        let found = (1..=31u8)
            .rev()
            .find(|&code| self.is_free(code))
            .or_else(|| (127..=255u8).find(|&code| self.is_free(code)));
        if found == Some(1) {
            // prefer the printable range over the last control code
            if let Some(code) = (33..=126u8).rev().find(|&code| self.is_free(code)) {
                return Some(code);
            }
        }
        found
    }

    /// Get the single byte code for a character, allocating one if needed
    ///
    /// Characters keep the code of the base encoding while it is free.
    /// Returns `None` when all 255 codes are in use.
    pub fn encode_rune(&mut self, chr: char) -> Option<u8> {
        if chr == '\0' {
            return None;
        }
        if let Some(code) = self.codes.get(&chr) {
            return Some(*code);
        }
        let code = match winansi_code(chr) {
            Some(code) if self.is_free(code) => code,
            _ => match self.spill_code() {
                Some(code) => code,
                None => {
                    log::warn!(
                        "No code left in {} for {:?}",
                        self.program.postscript_name(),
                        chr
                    );
                    return None;
                }
            },
        };
        self.codes.insert(chr, code);
        self.runes[usize::from(code)] = chr;
        self.add_char_proc(chr);
        Some(code)
    }

    fn glyph(&self, chr: char) -> GlyphId {
        self.program.glyph_index(chr).unwrap_or_else(|| {
            log::debug!("No glyph for {:?}, using .notdef", chr);
            GlyphId(0)
        })
    }

    fn add_char_proc(&mut self, chr: char) {
        let name = glyph_name(chr).into_owned();
        if self.char_procs.contains_key(&name) {
            return;
        }
        let glyph = self.glyph(chr);
        let width = self.advance(glyph);
        let segments = self.program.outline(glyph).unwrap_or_else(|| {
            log::debug!("No outline for glyph {}", glyph.0);
            Vec::new()
        });
        self.char_procs.insert(name, transcribe(width, &segments));
    }

    /// Encode a character for a show operator
    ///
    /// Returns the bytes and the glyph that the bytes select.
    pub fn encode_char(&mut self, chr: char) -> Option<(Code, GlyphId)> {
        match self.embedding {
            Embedding::Type3 => {
                let code = self.encode_rune(chr)?;
                Some((smallvec![code], self.glyph(chr)))
            }
            Embedding::Cid => {
                let glyph = self.glyph(chr);
                self.glyphs.entry(glyph.0).or_insert(chr);
                Some((SmallVec::from_slice(&glyph.0.to_be_bytes()), glyph))
            }
        }
    }

    /// Encode a string, dropping the characters that can't be encoded
    pub fn encode_str(&mut self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for chr in text.chars() {
            if let Some((code, _)) = self.encode_char(chr) {
                out.extend_from_slice(&code);
            }
        }
        out
    }

    /// The advance of a glyph in 1/1000 em
    pub fn advance(&self, glyph: GlyphId) -> i32 {
        match self.program.advance(glyph) {
            Some(advance) => advance.round() as i32,
            None => {
                log::debug!("No advance for glyph {}", glyph.0);
                0
            }
        }
    }

    /// The kerning between two glyphs in 1/1000 em
    pub fn kerning(&self, left: GlyphId, right: GlyphId) -> i32 {
        self.program
            .kerning(left, right)
            .map_or(0, |kern| kern.round() as i32)
    }

    fn to_unicode(&self) -> ToUnicodeCMap {
        match self.embedding {
            Embedding::Type3 => ToUnicodeCMap::from_pairs(
                CodeWidth::One,
                self.used_codes().map(|(code, chr)| (u16::from(code), chr)),
            ),
            Embedding::Cid => ToUnicodeCMap::from_pairs(
                CodeWidth::Two,
                self.glyphs.iter().map(|(glyph, chr)| (*glyph, *chr)),
            ),
        }
    }
}

fn cmap_error(e: std::fmt::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

/// The font dictionary of a [`FontResource`]
pub(crate) struct FontObject<'a> {
    pub font: &'a FontResource,
    pub settings: &'a Settings,
}

impl<'a> PdfObject<'a> for FontObject<'a> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        match self.font.embedding {
            Embedding::Type3 => type3::write_font(self.font, self.settings, f),
            Embedding::Cid => cid::write_font(self.font, self.settings, f),
        }
    }
}
