//! Common structs and enums

use std::{collections::BTreeMap, fmt, io, ops::Deref, ops::DerefMut};

use crate::{
    encoding::{pdf_doc_encode, utf16_be_encode},
    util::Real,
    write::{write_string, Formatter, PdfName, PdfNameBuf, Serialize},
};

/// A PDF Byte string
#[derive(Clone, Eq, PartialEq)]
pub struct PdfString(Vec<u8>);

impl PdfString {
    /// Create a new string
    pub fn new(string: &[u8]) -> Self {
        Self(string.to_vec())
    }

    /// Create a text string
    ///
    /// Uses PDFDocEncoding if every character is representable and
    /// UTF-16BE (with byte order mark) otherwise.
    pub fn from_text(text: &str) -> Self {
        match pdf_doc_encode(text) {
            Ok(bytes) => Self(bytes),
            Err(_) => Self(utf16_be_encode(text)),
        }
    }

    /// Get a slice to the contained bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }

}

impl fmt::Debug for PdfString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::with_capacity(self.0.len() + 2);
        write_string(&self.0, &mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

/// A reference to an object
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjRef {
    /// The index within the file
    pub id: u64,
    /// The generation number
    pub gen: u16,
}

/// The identity of a shared object
///
/// Keys are handed out by a [`KeyGen`](crate::util::KeyGen). Two objects
/// passed to [`Formatter::reference`] with the same key are the same object.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjKey(pub(crate) u64);

/// The document information dictionary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Info {
    /// The title
    pub title: Option<PdfString>,
    /// The author
    pub author: Option<PdfString>,
    /// The subject
    pub subject: Option<PdfString>,
    /// A list of keywords
    pub keywords: Option<PdfString>,
    /// The program used to create the source
    pub creator: Option<PdfString>,
    /// The program that produced the file
    pub producer: Option<PdfString>,
}

impl Info {
    /// Whether no entry is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Serialize for Info {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .opt_field("Title", &self.title)?
            .opt_field("Author", &self.author)?
            .opt_field("Subject", &self.subject)?
            .opt_field("Keywords", &self.keywords)?
            .opt_field("Creator", &self.creator)?
            .opt_field("Producer", &self.producer)?
            .finish()
    }
}

/// The base encoding for a font
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BaseEncoding {
    /// `WinAnsiEncoding`
    WinAnsiEncoding,
}

impl Serialize for BaseEncoding {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        match self {
            Self::WinAnsiEncoding => PdfName("WinAnsiEncoding").write(f),
        }
    }
}

bitflags::bitflags! {
    /// Font flags specifying various characteristics of the font.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFlags: u32 {
        /// All glyphs have the same width (as opposed to proportional or
        /// variable-pitch fonts, which have different widths)
        const FIXED_PITCH = 1 << 0;
        /// Glyphs have serifs, which are short strokes drawn at an angle on the
        /// top and bottom of glyph stems. (Sans serif fonts do not have serifs.)
        const SERIF = 1 << 1;
        /// Font contains glyphs outside the Adobe standard Latin character set.
        /// This flag and the Nonsymbolic flag shall not both be set or both be
        /// clear
        const SYMBOLIC = 1 << 2;
        /// Glyphs resemble cursive handwriting.
        const SCRIPT = 1 << 3;
        /// Font uses the Adobe standard Latin character set or a subset of it.
        const NONSYMBOLIC = 1 << 5;
        /// Glyphs have dominant vertical strokes that are slanted.
        const ITALIC = 1 << 6;
        /// Font contains no lowercase letters
        const ALL_CAPS = 1 << 16;
        /// Lowercase letters are small capitals
        const SMALL_CAP = 1 << 17;
        /// Bold glyphs are painted with extra pixels at small sizes
        const FORCE_BOLD = 1 << 18;
    }
}

impl Default for FontFlags {
    fn default() -> Self {
        Self::SYMBOLIC
    }
}

impl Serialize for FontFlags {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        self.bits().write(f)
    }
}

/// The embedded font program of a [`FontDescriptor`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FontFile {
    /// A TrueType program (`FontFile2`)
    TrueType(ObjRef),
    /// An OpenType program with CFF outlines (`FontFile3`, `/Subtype /OpenType`)
    OpenType(ObjRef),
}

/// A font descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// **FontName**
    pub font_name: PdfNameBuf,

    /// **Flags**: A collection of flags defining various characteristics of the font.
    pub flags: FontFlags,

    /// A rectangle, expressed in the glyph coordinate system, that shall specify the font bounding box.
    pub font_bbox: Rectangle<i32>,

    /// **ItalicAngle**: The angle, expressed in degrees counterclockwise from
    /// the vertical, of the dominant vertical strokes of the font.
    ///
    /// The value shall be negative for fonts that slope to the right, as almost all italic fonts do.
    pub italic_angle: Real,

    /// **Ascent**: The maximum height above the baseline reached by glyphs in this font.
    pub ascent: i32,

    /// **Descent**: The maximum depth below the baseline reached by glyphs in
    /// this font. The value shall be a negative number.
    pub descent: i32,

    /// **CapHeight**: The vertical coordinate of the top of flat capital letters, measured from the baseline.
    pub cap_height: i32,

    /// **StemV**  The thickness, measured horizontally, of the dominant vertical stems of glyphs in the font.
    pub stem_v: i32,

    /// The stream with the font program
    pub font_file: Option<FontFile>,
}

impl Serialize for FontDescriptor {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let mut dict = f.pdf_dict();
        dict.field("Type", &PdfName("FontDescriptor"))?
            .field("FontName", &self.font_name)?
            .field("Flags", &self.flags)?
            .field("FontBBox", &self.font_bbox)?
            .field("ItalicAngle", &self.italic_angle)?
            .field("Ascent", &self.ascent)?
            .field("Descent", &self.descent)?
            .field("CapHeight", &self.cap_height)?
            .field("StemV", &self.stem_v)?;
        match &self.font_file {
            Some(FontFile::TrueType(r)) => {
                dict.field("FontFile2", r)?;
            }
            Some(FontFile::OpenType(r)) => {
                dict.field("FontFile3", r)?;
            }
            None => {}
        }
        dict.finish()
    }
}

/// The `CIDSystemInfo` of a CIDFont
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CidSystemInfo {
    /// The issuer of the character collection
    pub registry: PdfString,
    /// The name of the character collection
    pub ordering: PdfString,
    /// The supplement number of the character collection
    pub supplement: u32,
}

impl CidSystemInfo {
    /// The `Adobe-Identity-0` collection
    pub fn identity() -> Self {
        Self {
            registry: PdfString::new(b"Adobe"),
            ordering: PdfString::new(b"Identity"),
            supplement: 0,
        }
    }
}

impl Serialize for CidSystemInfo {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .field("Registry", &self.registry)?
            .field("Ordering", &self.ordering)?
            .field("Supplement", &self.supplement)?
            .finish()
    }
}

#[derive(Debug, Clone)]
/// A vector of options
///
/// Serializes as a run-length array: every run of consecutive `Some`
/// entries is preceded by the index of its first entry. This is the layout
/// of a `Differences` array and of a CIDFont `W` array.
pub struct SparseSet<T> {
    inner: Vec<Option<T>>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for SparseSet<T> {
    type Target = Vec<Option<T>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> DerefMut for SparseSet<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T> SparseSet<T> {
    /// Creates a new sparse set
    pub fn new() -> Self {
        Self { inner: vec![] }
    }

    /// Set the entry at `index`, growing the set as needed
    pub fn set(&mut self, index: usize, value: T) {
        if self.inner.len() <= index {
            self.inner.resize_with(index + 1, || None);
        }
        self.inner[index] = Some(value);
    }

    /// Whether there are no `Some` entries
    pub fn is_blank(&self) -> bool {
        self.inner.iter().all(Option::is_none)
    }
}

impl<T: Serialize> Serialize for SparseSet<T> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let mut arr = f.pdf_arr();
        let mut needs_number = true;
        for (index, entry) in self.inner.iter().enumerate() {
            if let Some(value) = entry {
                if needs_number {
                    arr.entry(&index)?;
                    needs_number = false;
                }
                arr.entry(value)?;
            } else {
                needs_number = true;
            }
        }
        arr.finish()
    }
}

/// A font encoding
#[derive(Debug, Clone)]
pub struct Encoding {
    /// The base encoding
    pub base_encoding: Option<BaseEncoding>,
    /// The differences from the base encoding
    pub differences: Option<SparseSet<PdfNameBuf>>,
}

impl Serialize for Encoding {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .field("Type", &PdfName("Encoding"))?
            .opt_field("BaseEncoding", &self.base_encoding)?
            .opt_field("Differences", &self.differences)?
            .finish()
    }
}

/// A simple two-dimensional coordinate
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Point<P> {
    /// Horizontal offset
    pub x: P,
    /// Vertical offset
    pub y: P,
}

impl<P: Default> Default for Point<P> {
    fn default() -> Self {
        Self {
            x: P::default(),
            y: P::default(),
        }
    }
}

/// A primitive rectangle
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Rectangle<P> {
    /// lower left
    pub ll: Point<P>,
    /// upper right
    pub ur: Point<P>,
}

impl Rectangle<Real> {
    /// A media box with the origin in the lower left corner
    pub fn media_box(width: f64, height: f64) -> Self {
        Rectangle {
            ll: Point {
                x: Real(0.0),
                y: Real(0.0),
            },
            ur: Point {
                x: Real(width),
                y: Real(height),
            },
        }
    }
}

impl Rectangle<i32> {
    /// The smallest rectangle that contains both `self` and `other`
    pub fn union(self, other: Self) -> Self {
        Rectangle {
            ll: Point {
                x: self.ll.x.min(other.ll.x),
                y: self.ll.y.min(other.ll.y),
            },
            ur: Point {
                x: self.ur.x.max(other.ur.x),
                y: self.ur.y.max(other.ur.y),
            },
        }
    }
}

impl<P: Serialize> Serialize for Rectangle<P> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_arr()
            .entry(&self.ll.x)?
            .entry(&self.ll.y)?
            .entry(&self.ur.x)?
            .entry(&self.ur.y)?
            .finish()
    }
}

/// A font matrix
///
/// <pre style="line-height: 120%;">
/// ⎛ a b 0 ⎞
/// ⎜ c d 0 ⎟
/// ⎝ e f 1 ⎠
/// </pre>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Matrix<P> {
    /// M<sub>1,1</sub>
    pub a: P,
    /// M<sub>1,2</sub>
    pub b: P,
    /// M<sub>2,1</sub>
    pub c: P,
    /// M<sub>2,2</sub>
    pub d: P,
    /// M<sub>3,1</sub>
    pub e: P,
    /// M<sub>3,2</sub>
    pub f: P,
}

impl Matrix<f32> {
    /// The matrix for 1000 unit per em glyphs that are drawn with Y pointing down
    ///
    /// ```
    /// use pdf_create::common::Matrix;
    /// let m = Matrix::<f32>::flipped_glyph();
    /// assert_eq!((m.a, m.d), (0.001, -0.001));
    /// ```
    pub fn flipped_glyph() -> Self {
        Self {
            a: 0.001,
            b: 0.0,
            c: 0.0,
            d: -0.001,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl<P: Serialize> Serialize for Matrix<P> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_arr()
            .entry(&self.a)?
            .entry(&self.b)?
            .entry(&self.c)?
            .entry(&self.d)?
            .entry(&self.e)?
            .entry(&self.f)?
            .finish()
    }
}

/// A dict is a map from strings to a type P
pub type Dict<P> = BTreeMap<String, P>;

impl<P: Serialize> Serialize for Dict<P> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let mut dict = f.pdf_dict();
        for (key, value) in self {
            dict.field(key, value)?;
        }
        dict.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{PdfString, Point, Rectangle, SparseSet};
    use crate::write::{Formatter, PdfNameBuf, Serialize};

    fn ser<S: Serialize>(value: &S) -> String {
        let mut out = Vec::new();
        {
            let mut f = Formatter::new(&mut out);
            value.write(&mut f).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_differences_runs() {
        let mut diff = SparseSet::new();
        diff.set(1, PdfNameBuf::from("uni0394"));
        diff.set(31, PdfNameBuf::from("Euro"));
        diff.set(30, PdfNameBuf::from("uni03A9"));
        diff.set(128, PdfNameBuf::from("u1F600"));
        diff.set(129, PdfNameBuf::from("uni2603"));
        assert_eq!(
            ser(&diff),
            "[1/uni0394 30/uni03A9/Euro 128/u1F600/uni2603]"
        );
        assert!(!diff.is_blank());
        assert!(SparseSet::<u8>::new().is_blank());
    }

    #[test]
    fn test_union() {
        let a = Rectangle {
            ll: Point { x: 0, y: -10 },
            ur: Point { x: 50, y: 700 },
        };
        let b = Rectangle {
            ll: Point { x: -5, y: 0 },
            ur: Point { x: 40, y: 710 },
        };
        let u = a.union(b);
        assert_eq!(ser(&u), "[-5 -10 50 710]");
    }

    #[test]
    fn test_text_string() {
        assert_eq!(PdfString::from_text("Report").as_bytes(), b"Report");
        assert_eq!(
            PdfString::from_text("Ω").as_bytes(),
            &[0xFE, 0xFF, 0x03, 0xA9]
        );
        assert_eq!(format!("{:?}", PdfString::new(b"a(b")), "(a\\(b)");
    }
}
