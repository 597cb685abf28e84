//! Settings for a document
//!
//! Settings can be written in [RON](https://github.com/ron-rs/ron):
//!
//! ```ron
//! (
//!     content_flate: IfSmaller,
//!     embedding: Type3,
//!     meta: (
//!         title: "Quarterly Report",
//!         keywords: ["finance", "q3"],
//!     ),
//! )
//! ```

use std::path::Path;

use pdf_create::{
    common::{Info, PdfString},
    stream::FlatePolicy,
};
use serde::Deserialize;

use crate::{error::ConfigError, font::Embedding};

mod de;
use de::deserialize_opt_string;

/// Settings for encoding a document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Compression of page content streams
    pub content_flate: FlatePolicy,
    /// Compression of Type 3 glyph programs
    pub glyph_flate: FlatePolicy,
    /// Compression of embedded font files and ToUnicode maps
    pub font_file_flate: FlatePolicy,
    /// How fonts are embedded unless specified otherwise
    pub embedding: Embedding,
    /// Document metadata
    pub meta: Meta,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_flate: FlatePolicy::IfSmaller,
            glyph_flate: FlatePolicy::Always,
            font_file_flate: FlatePolicy::Always,
            embedding: Embedding::Type3,
            meta: Meta::default(),
        }
    }
}

impl Settings {
    /// Parse settings from RON
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let settings = ron::from_str(text)?;
        Ok(settings)
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&text)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}

/// Document metadata, written to the `/Info` dictionary
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// Title
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub title: Option<String>,
    /// Author
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub author: Option<String>,
    /// Subject
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub subject: Option<String>,
    /// Keywords
    pub keywords: Vec<String>,
    /// The application that created the content
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub creator: Option<String>,
    /// The application that produced the PDF
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub producer: Option<String>,
}

fn text_of(o: &Option<String>) -> Option<PdfString> {
    o.as_deref().map(PdfString::from_text)
}

impl Meta {
    /// Convert to the information dictionary
    pub fn to_info(&self) -> Info {
        Info {
            title: text_of(&self.title),
            author: text_of(&self.author),
            subject: text_of(&self.subject),
            keywords: if self.keywords.is_empty() {
                None
            } else {
                Some(PdfString::from_text(&self.keywords.join(", ")))
            },
            creator: text_of(&self.creator),
            producer: text_of(&self.producer),
        }
    }
}
