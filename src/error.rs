//! Error types

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failed to load a font program
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be read
    #[error("Failed to read font file {}", path.display())]
    Io {
        /// The path of the font file
        path: PathBuf,
        /// The underlying error
        #[source]
        source: io::Error,
    },
    /// Less than four bytes of data
    #[error("Font file too small")]
    TooSmall,
    /// The data does not start with a TrueType or OpenType signature
    #[error("Unrecognized font format")]
    UnrecognizedFormat,
    /// The font tables could not be parsed
    #[error("Failed to parse font")]
    Parse(#[from] ttf_parser::FaceParsingError),
    /// There is no PostScript name in the `name` table
    #[error("Missing PostScript font name")]
    MissingName,
}

/// Failed to lay out text on a page
#[derive(Debug, Error)]
pub enum LayoutError {
    /// No font (or an unknown font) was selected with `set_font`
    #[error("No font selected")]
    NoFont,
    /// Writing to the content stream failed
    #[error("IO Error")]
    Io(#[from] io::Error),
}

/// Failed to load settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read
    #[error("IO Error")]
    Io(#[from] io::Error),
    /// The settings are not valid RON
    #[error("Deserialize Error")]
    Ron(#[from] ron::error::Error),
}
