//! The document and its page tree

use std::{
    collections::HashMap,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use pdf_create::{
    common::{ObjKey, ObjRef},
    util::KeyGen,
    write::{Formatter, PdfName, PdfObject, Plain},
};

use crate::{
    config::Settings,
    error::FontError,
    font::{
        program::{FontProgram, TrueTypeProgram},
        Embedding, FontId, FontResource,
    },
    page::{Canvas, Page, PageId, PageObject},
};

/// A PDF document under construction
///
/// All text has to be laid out before the document is written; fonts are
/// subset to the characters that were used up to that point.
#[derive(Debug)]
pub struct Document {
    pub(crate) pages: Vec<Page>,
    pub(crate) fonts: Vec<FontResource>,
    font_cache: HashMap<PathBuf, FontId>,
    keys: KeyGen,
    pub(crate) pages_key: ObjKey,
    pub(crate) settings: Settings,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with the default settings
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create an empty document
    pub fn with_settings(settings: Settings) -> Self {
        let mut keys = KeyGen::new();
        let pages_key = keys.next_key();
        Self {
            pages: Vec::new(),
            fonts: Vec::new(),
            font_cache: HashMap::new(),
            keys,
            pages_key,
            settings,
        }
    }

    /// The settings of this document
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Add a page of the given size (in 1/72 inch)
    pub fn new_page(&mut self, width: f64, height: f64) -> PageId {
        let key = self.keys.next_key();
        self.pages
            .push(Page::new(key, width, height, self.settings.content_flate));
        PageId(self.pages.len() - 1)
    }

    /// Get a page
    pub fn page(&self, page: PageId) -> Option<&Page> {
        self.pages.get(page.0)
    }

    /// Get a canvas to draw on a page
    pub fn canvas(&mut self, page: PageId) -> Option<Canvas<'_>> {
        let page = self.pages.get_mut(page.0)?;
        Some(Canvas {
            page,
            fonts: &mut self.fonts,
        })
    }

    /// Get a font
    pub fn font(&self, font: FontId) -> Option<&FontResource> {
        self.fonts.get(font.0)
    }

    /// Get a font, e.g. to encode text for measuring
    pub fn font_mut(&mut self, font: FontId) -> Option<&mut FontResource> {
        self.fonts.get_mut(font.0)
    }

    /// Load a TrueType or OpenType font file
    ///
    /// Loading the same path again returns the same font.
    pub fn load_font<P: AsRef<Path>>(&mut self, path: P) -> Result<FontId, FontError> {
        let path = path.as_ref();
        if let Some(id) = self.font_cache.get(path) {
            return Ok(*id);
        }
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_owned(),
            source,
        })?;
        let id = self.load_font_bytes(data)?;
        log::debug!("Loaded {} as font {}", path.display(), id.0);
        self.font_cache.insert(path.to_owned(), id);
        Ok(id)
    }

    /// Load a TrueType or OpenType font from memory
    pub fn load_font_bytes(&mut self, data: Vec<u8>) -> Result<FontId, FontError> {
        let program = TrueTypeProgram::parse(data)?;
        Ok(self.add_font(Arc::new(program), self.settings.embedding))
    }

    /// Add a font program
    pub fn add_font(&mut self, program: Arc<dyn FontProgram>, embedding: Embedding) -> FontId {
        let key = self.keys.next_key();
        self.fonts.push(FontResource::new(key, program, embedding));
        FontId(self.fonts.len() - 1)
    }

    /// Write the document
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let info = self.settings.meta.to_info();
        let info = if info.is_empty() {
            None
        } else {
            Some(Plain(info))
        };
        let mut fmt = Formatter::new(w);
        fmt.write_document(Catalog(self), info)
    }

    /// Encode the document as a PDF file
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // neither the output nor the compression can fail in memory
        self.write(&mut out).expect("in-memory encoding failed");
        out
    }
}

struct Catalog<'a>(&'a Document);

impl<'a> PdfObject<'a> for Catalog<'a> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        let pages = f.reference(self.0.pages_key, PageTree(self.0));
        f.pdf_dict()
            .field("Type", &PdfName("Catalog"))?
            .field("Pages", &pages)?
            .finish()
    }
}

/// The root of the page tree
pub(crate) struct PageTree<'a>(pub &'a Document);

impl<'a> PdfObject<'a> for PageTree<'a> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        let doc = self.0;
        let kids: Vec<ObjRef> = doc
            .pages
            .iter()
            .map(|page| f.reference(page.key, PageObject { doc, page }))
            .collect();
        f.pdf_dict()
            .field("Type", &PdfName("Pages"))?
            .field("Count", &kids.len())?
            .arr_field("Kids", &kids)?
            .finish()
    }
}
