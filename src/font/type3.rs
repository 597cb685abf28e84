//! Type 3 font dictionaries

use std::io;

use pdf_create::{
    common::{BaseEncoding, Dict, Encoding, Matrix, ObjRef, Rectangle, SparseSet},
    stream::{FlatePolicy, Stream},
    write::{Formatter, PdfName, PdfNameBuf, PdfObject, Serialize},
};

use super::{cmap_error, encoding::glyph_name, encoding::winansi_char, FontResource};
use crate::config::Settings;

/// The dict of glyph name to glyph program
struct CharProcs<'a> {
    font: &'a FontResource,
    flate: FlatePolicy,
}

impl<'a> PdfObject<'a> for CharProcs<'a> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        let mut procs: Dict<ObjRef> = Dict::new();
        for (name, program) in &self.font.char_procs {
            let mut stream = Stream::new(self.flate);
            program.write_content(&mut stream)?;
            procs.insert(name.clone(), f.insert(stream));
        }
        log::trace!(
            "{} glyph programs for {}",
            procs.len(),
            self.font.program.postscript_name()
        );
        procs.write(f)
    }
}

fn differences(font: &FontResource) -> Option<SparseSet<PdfNameBuf>> {
    let mut set = SparseSet::new();
    for (code, chr) in font.used_codes() {
        if winansi_char(code) != Some(chr) {
            set.set(usize::from(code), PdfNameBuf(glyph_name(chr).into_owned()));
        }
    }
    if set.is_blank() {
        None
    } else {
        Some(set)
    }
}

fn font_bbox(font: &FontResource) -> Rectangle<i32> {
    font.char_procs
        .values()
        .filter_map(|program| program.int_bbox())
        .reduce(Rectangle::union)
        .unwrap_or_default()
}

fn widths(font: &FontResource, first: u8, last: u8) -> Vec<i32> {
    (first..=last)
        .map(|code| {
            font.rune(code)
                .and_then(|chr| font.char_procs.get(glyph_name(chr).as_ref()))
                .map_or(0, |program| program.width)
        })
        .collect()
}

pub(super) fn write_font<'a>(
    font: &'a FontResource,
    settings: &'a Settings,
    f: &mut Formatter<'_, 'a>,
) -> io::Result<()> {
    let char_procs = f.insert(CharProcs {
        font,
        flate: settings.glyph_flate,
    });
    let cmap = font
        .to_unicode()
        .to_stream(settings.font_file_flate)
        .map_err(cmap_error)?;
    let to_unicode = f.insert(cmap);

    let mut codes = font.used_codes().map(|(code, _)| code);
    let first = codes.next().unwrap_or(0);
    let last = codes.last().unwrap_or(first);

    let encoding = Encoding {
        base_encoding: Some(BaseEncoding::WinAnsiEncoding),
        differences: differences(font),
    };

    f.pdf_dict()
        .field("Type", &PdfName("Font"))?
        .field("Subtype", &PdfName("Type3"))?
        .field("FontBBox", &font_bbox(font))?
        .field("FontMatrix", &Matrix::flipped_glyph())?
        .field("CharProcs", &char_procs)?
        .field("Encoding", &encoding)?
        .field("FirstChar", &first)?
        .field("LastChar", &last)?
        .arr_field("Widths", &widths(font, first, last))?
        .field("Resources", &Dict::<ObjRef>::new())?
        .field("ToUnicode", &to_unicode)?
        .finish()
}
