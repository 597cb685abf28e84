//! Pages and their content streams

use std::io::{self, Write};

use pdf_create::{
    common::{Dict, ObjKey, ObjRef, Rectangle},
    stream::{FlatePolicy, Stream},
    util::Real,
    write::{Formatter, PdfName, PdfObject, Serialize},
};

use crate::{
    document::{Document, PageTree},
    error::LayoutError,
    font::{FontId, FontObject, FontResource},
};

/// Index of a page within a document
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PageId(pub(crate) usize);

/// A single page
#[derive(Debug)]
pub struct Page {
    pub(crate) key: ObjKey,
    pub(crate) contents: Stream,
    /// The fonts used on this page, the index is the number of the `/F<n>` resource
    pub(crate) fonts: Vec<FontId>,
    pub(crate) media_box: Rectangle<Real>,
    pub(crate) current_font: Option<(FontId, f64)>,
}

impl Page {
    pub(crate) fn new(key: ObjKey, width: f64, height: f64, flate: FlatePolicy) -> Self {
        Self {
            key,
            contents: Stream::new(flate),
            fonts: Vec::new(),
            media_box: Rectangle::media_box(width, height),
            current_font: None,
        }
    }

    /// The uncompressed content stream
    pub fn contents(&self) -> &[u8] {
        &self.contents.data
    }

    fn font_resource(&mut self, font: FontId) -> usize {
        match self.fonts.iter().position(|f| *f == font) {
            Some(index) => index,
            None => {
                self.fonts.push(font);
                self.fonts.len() - 1
            }
        }
    }
}

/// Mutable access to one page and the fonts of its document
pub struct Canvas<'d> {
    pub(crate) page: &'d mut Page,
    pub(crate) fonts: &'d mut [FontResource],
}

impl Canvas<'_> {
    /// Select the font for the following text operations (`Tf` operator)
    pub fn set_font(&mut self, font: FontId, size: f64) -> Result<(), LayoutError> {
        if font.0 >= self.fonts.len() {
            return Err(LayoutError::NoFont);
        }
        let index = self.page.font_resource(font);
        writeln!(self.page.contents, "/F{} {} Tf", index, Real(size))?;
        self.page.current_font = Some((font, size));
        Ok(())
    }

    /// Set the distance between baselines used by multi-line text (`TL` operator)
    pub fn set_leading(&mut self, leading: f64) -> io::Result<()> {
        writeln!(self.page.contents, "{} TL", Real(leading))
    }

    /// The currently selected font and size
    pub(crate) fn selected(&mut self) -> Result<(&mut FontResource, &mut Stream, f64), LayoutError> {
        let (font, size) = self.page.current_font.ok_or(LayoutError::NoFont)?;
        let resource = self.fonts.get_mut(font.0).ok_or(LayoutError::NoFont)?;
        Ok((resource, &mut self.page.contents, size))
    }
}

struct Resources<'r> {
    fonts: &'r Dict<ObjRef>,
}

impl Serialize for Resources<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let mut dict = f.pdf_dict();
        if !self.fonts.is_empty() {
            dict.field("Font", self.fonts)?;
        }
        dict.finish()
    }
}

/// The page dictionary
pub(crate) struct PageObject<'a> {
    pub doc: &'a Document,
    pub page: &'a Page,
}

impl<'a> PdfObject<'a> for PageObject<'a> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        let parent = f.reference(self.doc.pages_key, PageTree(self.doc));
        let contents = f.insert(&self.page.contents);
        let mut fonts = Dict::new();
        for (index, id) in self.page.fonts.iter().enumerate() {
            let font = &self.doc.fonts[id.0];
            let obj = FontObject {
                font,
                settings: &self.doc.settings,
            };
            fonts.insert(format!("F{}", index), f.reference(font.key, obj));
        }
        f.pdf_dict()
            .field("Type", &PdfName("Page"))?
            .field("Parent", &parent)?
            .field("Contents", &contents)?
            .field("Resources", &Resources { fonts: &fonts })?
            .field("MediaBox", &self.page.media_box)?
            .finish()
    }
}
