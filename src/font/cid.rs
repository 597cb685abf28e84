//! Type 0 fonts with an embedded font file
//!
//! The text is encoded with `Identity-H`, i.e. every code is the 2-byte
//! glyph index of the font file.

use std::io;

use pdf_create::{
    common::{CidSystemInfo, FontDescriptor, FontFile, FontFlags},
    stream::{FlatePolicy, Stream, StreamMetadata},
    util::Real,
    write::{Formatter, PdfName, PdfNameBuf, PdfObject, Serialize},
};

use super::{
    cmap_error,
    program::{FontKind, GlyphId},
    FontResource,
};
use crate::config::Settings;

/// Dominant stem width, which is not part of the font tables
const STEM_V: i32 = 80;

/// A run of glyph widths in a `W` array
#[derive(Debug, PartialEq, Eq)]
struct WidthRun {
    first: u16,
    widths: Vec<i32>,
}

fn width_runs(font: &FontResource) -> Vec<WidthRun> {
    let mut runs: Vec<WidthRun> = Vec::new();
    for glyph in font.glyphs.keys().copied() {
        let width = font.advance(GlyphId(glyph));
        match runs.last_mut() {
            Some(run) if usize::from(run.first) + run.widths.len() == usize::from(glyph) => {
                run.widths.push(width);
            }
            _ => runs.push(WidthRun {
                first: glyph,
                widths: vec![width],
            }),
        }
    }
    runs
}

struct Widths<'r>(&'r [WidthRun]);

impl Serialize for Widths<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let mut arr = f.pdf_arr();
        for run in self.0 {
            arr.entry(&run.first)?.entry(&run.widths)?;
        }
        arr.finish()
    }
}

/// The font descriptor, which owns the font file
struct Descriptor<'a> {
    font: &'a FontResource,
    flate: FlatePolicy,
}

impl<'a> PdfObject<'a> for Descriptor<'a> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        let program = self.font.program();
        let data = program.data().to_vec();
        let font_file = match program.kind() {
            FontKind::TrueType => {
                let meta = StreamMetadata::TrueTypeProgram { length1: data.len() };
                FontFile::TrueType(f.insert(Stream::with_data(data, self.flate, meta)))
            }
            FontKind::OpenTypeCff => {
                let meta = StreamMetadata::OpenTypeProgram;
                FontFile::OpenType(f.insert(Stream::with_data(data, self.flate, meta)))
            }
        };

        let metrics = program.metrics();
        let mut flags = FontFlags::SYMBOLIC;
        if metrics.fixed_pitch {
            flags |= FontFlags::FIXED_PITCH;
        }
        if metrics.italic_angle != 0.0 {
            flags |= FontFlags::ITALIC;
        }
        let descriptor = FontDescriptor {
            font_name: PdfNameBuf::from(program.postscript_name()),
            flags,
            font_bbox: metrics.bbox,
            italic_angle: Real(metrics.italic_angle),
            ascent: metrics.ascent,
            descent: metrics.descent,
            cap_height: metrics.cap_height,
            stem_v: STEM_V,
            font_file: Some(font_file),
        };
        descriptor.write(f)
    }
}

/// The descendant CIDFont
struct CidFont<'a> {
    font: &'a FontResource,
    flate: FlatePolicy,
}

impl<'a> PdfObject<'a> for CidFont<'a> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        let descriptor = f.insert(Descriptor {
            font: self.font,
            flate: self.flate,
        });
        let program = self.font.program();
        let kind = program.kind();
        let subtype = match kind {
            FontKind::TrueType => "CIDFontType2",
            FontKind::OpenTypeCff => "CIDFontType0",
        };
        let runs = width_runs(self.font);

        let mut dict = f.pdf_dict();
        dict.field("Type", &PdfName("Font"))?
            .field("Subtype", &PdfName(subtype))?
            .field("BaseFont", &PdfName(program.postscript_name()))?
            .field("CIDSystemInfo", &CidSystemInfo::identity())?
            .field("FontDescriptor", &descriptor)?
            .field("DW", &self.font.advance(GlyphId(0)))?
            .field("W", &Widths(&runs))?;
        if kind == FontKind::TrueType {
            dict.field("CIDToGIDMap", &PdfName("Identity"))?;
        }
        dict.finish()
    }
}

pub(super) fn write_font<'a>(
    font: &'a FontResource,
    settings: &'a Settings,
    f: &mut Formatter<'_, 'a>,
) -> io::Result<()> {
    let descendant = f.insert(CidFont {
        font,
        flate: settings.font_file_flate,
    });
    let cmap = font
        .to_unicode()
        .to_stream(settings.font_file_flate)
        .map_err(cmap_error)?;
    let to_unicode = f.insert(cmap);

    f.pdf_dict()
        .field("Type", &PdfName("Font"))?
        .field("Subtype", &PdfName("Type0"))?
        .field("BaseFont", &PdfName(font.program().postscript_name()))?
        .field("Encoding", &PdfName("Identity-H"))?
        .arr_field("DescendantFonts", &[descendant])?
        .field("ToUnicode", &to_unicode)?
        .finish()
}
