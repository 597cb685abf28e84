#![warn(missing_docs)]
//! # pdf-create
//!
//! Library to create a PDF file with a rustic API
//!
//! Objects implement [`write::PdfObject`] and register the objects they
//! refer to while they are written. The [`write::Formatter`] numbers every
//! object in the order it is discovered and produces the cross-reference
//! table at the end.
//!
//! ```
//! use std::io::Write;
//! use pdf_create::{
//!     stream::{FlatePolicy, Stream},
//!     write::{Formatter, Plain},
//! };
//!
//! let mut contents = Stream::new(FlatePolicy::Never);
//! write!(contents, "0 0 m 100 100 l S").unwrap();
//!
//! let mut out = Vec::new();
//! let mut fmt = Formatter::new(&mut out);
//! fmt.write_document(contents, None::<Plain<i32>>).unwrap();
//! ```
//!
//! Reference: <https://www.adobe.com/content/dam/acom/en/devnet/pdf/PDF32000_2008.pdf>

pub mod common;
pub mod encoding;
pub mod stream;
pub mod util;
pub mod write;
