//! # Character Maps (CMap)
//!
//! ToUnicode maps let viewers extract text from the custom encodings of
//! the embedded fonts.
//!
//! See [Adobe Tech Note #5411] *ToUnicode Mapping File Tutorial*
//!
//! [Adobe Tech Note #5411]: https://pdfa.org/norm-refs/5411.ToUnicode.pdf

use std::{fmt, ops::RangeInclusive};

use pdf_create::stream::{FlatePolicy, Stream, StreamMetadata};

/// The number of bytes per character code
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodeWidth {
    /// Simple fonts, `<00> <FF>`
    One,
    /// Identity encoded CID fonts, `<0000> <FFFF>`
    Two,
}

impl CodeWidth {
    fn write_code<W: fmt::Write>(self, out: &mut W, code: u16) -> fmt::Result {
        match self {
            Self::One => write!(out, "<{:02X}>", code),
            Self::Two => write!(out, "<{:04X}>", code),
        }
    }

    fn max(self) -> u16 {
        match self {
            Self::One => 0xFF,
            Self::Two => 0xFFFF,
        }
    }
}

fn write_ucs<W: fmt::Write>(out: &mut W, chr: char) -> fmt::Result {
    let mut buf = [0; 2];
    write!(out, "<")?;
    for utf16char in chr.encode_utf16(&mut buf) {
        write!(out, "{:04X}", utf16char)?;
    }
    write!(out, ">")
}

/// Range of codes that map to sequential unicode characters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BFRange {
    /// Code range
    codes: RangeInclusive<u16>,
    /// Base of mapped unicode code points
    ucs_first: char,
}

impl BFRange {
    /// Create a new [BFRange]
    pub const fn new(codes: RangeInclusive<u16>, ucs_first: char) -> Self {
        Self { codes, ucs_first }
    }

    fn write<W: fmt::Write>(&self, out: &mut W, width: CodeWidth) -> fmt::Result {
        width.write_code(out, *self.codes.start())?;
        write!(out, " ")?;
        width.write_code(out, *self.codes.end())?;
        write!(out, " ")?;
        write_ucs(out, self.ucs_first)?;
        writeln!(out)
    }
}

/// A simple code to unicode character mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BFChar {
    /// Character code
    code: u16,
    /// Mapped unicode code-point
    ucs: char,
}

impl BFChar {
    /// Create a new [BFChar]
    pub fn new(code: u16, ucs: char) -> Self {
        Self { code, ucs }
    }

    fn write<W: fmt::Write>(&self, out: &mut W, width: CodeWidth) -> fmt::Result {
        width.write_code(out, self.code)?;
        write!(out, " ")?;
        write_ucs(out, self.ucs)?;
        writeln!(out)
    }
}

/// An in-memory ToUnicode character map
#[derive(Debug, Clone)]
pub struct ToUnicodeCMap {
    width: CodeWidth,
    bfchars: Vec<BFChar>,
    bfranges: Vec<BFRange>,
}

/// Whether `chr` can follow `prev` in a range that ends in `code`
fn extends_range(width: CodeWidth, start: u16, code: u16, first: char, chr: char) -> bool {
    let (first, chr) = (u32::from(first), u32::from(chr));
    // only the last byte of the code and of the (BMP) destination may vary
    let same_code_block = match width {
        CodeWidth::One => true,
        CodeWidth::Two => start & 0xFF00 == code & 0xFF00,
    };
    let offset = u32::from(code - start);
    same_code_block && chr <= 0xFFFF && chr == first + offset && first & 0xFF00 == chr & 0xFF00
}

impl ToUnicodeCMap {
    /// Create a map with explicit entries
    pub fn new(width: CodeWidth, bfchars: Vec<BFChar>, bfranges: Vec<BFRange>) -> Self {
        Self {
            width,
            bfchars,
            bfranges,
        }
    }

    /// Build a compact map from single character mappings
    ///
    /// Runs of consecutive codes that map to consecutive characters
    /// become ranges, everything else is written as a single entry.
    pub fn from_pairs<I>(width: CodeWidth, pairs: I) -> Self
    where
        I: IntoIterator<Item = (u16, char)>,
    {
        let mut pairs: Vec<(u16, char)> = pairs
            .into_iter()
            .filter(|(code, _)| *code <= width.max())
            .collect();
        pairs.sort_unstable_by_key(|(code, _)| *code);
        pairs.dedup_by_key(|(code, _)| *code);

        let mut bfchars = Vec::new();
        let mut bfranges = Vec::new();
        let mut i = 0;
        while i < pairs.len() {
            let (start, first) = pairs[i];
            let mut end = i;
            while let Some(&(code, chr)) = pairs.get(end + 1) {
                if code != pairs[end].0 + 1 || !extends_range(width, start, code, first, chr) {
                    break;
                }
                end += 1;
            }
            if end > i {
                bfranges.push(BFRange::new(start..=pairs[end].0, first));
            } else {
                bfchars.push(BFChar::new(start, first));
            }
            i = end + 1;
        }
        Self::new(width, bfchars, bfranges)
    }

    /// Return the name of the CMap
    pub fn name(&self) -> &'static str {
        "Adobe-Identity-UCS"
    }

    /// Write the CMap program
    pub fn write<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "/CIDInit /ProcSet findresource begin")?;
        writeln!(out, "12 dict begin")?;
        writeln!(out, "begincmap")?;
        writeln!(out, "/CIDSystemInfo <<")?;
        writeln!(out, "  /Registry (Adobe)")?;
        writeln!(out, "  /Ordering (UCS)")?;
        writeln!(out, "  /Supplement 0")?;
        writeln!(out, ">> def")?;
        writeln!(out, "/CMapName /{} def", self.name())?;
        writeln!(out, "/CMapType 2 def")?;
        writeln!(out, "1 begincodespacerange")?;
        self.width.write_code(out, 0)?;
        write!(out, " ")?;
        self.width.write_code(out, self.width.max())?;
        writeln!(out)?;
        writeln!(out, "endcodespacerange")?;
        for bfchars in self.bfchars.chunks(100) {
            writeln!(out, "{} beginbfchar", bfchars.len())?;
            for bfchar in bfchars {
                bfchar.write(out, self.width)?;
            }
            writeln!(out, "endbfchar")?;
        }
        for bfranges in self.bfranges.chunks(100) {
            writeln!(out, "{} beginbfrange", bfranges.len())?;
            for bfrange in bfranges {
                bfrange.write(out, self.width)?;
            }
            writeln!(out, "endbfrange")?;
        }
        writeln!(out, "endcmap")?;
        writeln!(out, "CMapName currentdict /CMap defineresource pop")?;
        writeln!(out, "end")?;
        writeln!(out, "end")?;
        Ok(())
    }

    /// Create the stream that is referenced as `/ToUnicode`
    pub fn to_stream(&self, flate: FlatePolicy) -> Result<Stream, fmt::Error> {
        let mut out = String::new();
        self.write(&mut out)?;
        Ok(Stream::with_data(
            out.into_bytes(),
            flate,
            StreamMetadata::None,
        ))
    }
}
