//! # outline-pdf
//!
//! Create PDF documents with text in any TrueType or OpenType font.
//!
//! Fonts are embedded as Type 3 fonts by default: every glyph that is used
//! becomes a small drawing procedure, so the output does not depend on the
//! font rendering of the viewer. Text is laid out with the kerning of the
//! font and can be aligned, truncated or wrapped.
//!
//! ```no_run
//! use outline_pdf::Document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::new();
//! let font = doc.load_font("DejaVuSans.ttf")?;
//! let page = doc.new_page(595.0, 842.0);
//! if let Some(mut canvas) = doc.canvas(page) {
//!     canvas.set_font(font, 12.0)?;
//!     canvas.left(72.0, 770.0, "Hello, World!")?;
//! }
//! std::fs::write("hello.pdf", doc.encode())?;
//! # Ok(())
//! # }
//! ```

pub mod cmap;
pub mod config;
pub mod document;
pub mod draw;
pub mod error;
pub mod font;
pub mod page;
pub mod text;

pub use config::{Meta, Settings};
pub use document::Document;
pub use error::{ConfigError, FontError, LayoutError};
pub use font::{Embedding, FontId, FontResource};
pub use page::{Canvas, PageId};
