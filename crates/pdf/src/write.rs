//! Methods to produce a binary file
//!
//! The [`Formatter`] is both the serializer for PDF syntax and the registry
//! that assigns object numbers. Numbers are handed out lazily: an object
//! gets its number the first time some other object refers to it while
//! being written, so the numbering follows the discovery order of a single
//! pass over the object graph.

use std::{
    collections::HashMap,
    io::{self, Write},
};

use crate::{
    common::{ObjKey, ObjRef, PdfString},
    util::{ByteCounter, Real},
};

/// API to serialize a dict
#[must_use]
pub struct PdfDict<'f, 'w, 'a> {
    first: bool,
    f: &'f mut Formatter<'w, 'a>,
}

impl PdfDict<'_, '_, '_> {
    fn check_first(&mut self) -> io::Result<()> {
        if self.first {
            if self.f.indent > 0 {
                writeln!(self.f.inner)?;
            }
            self.f.indent()?;
            writeln!(self.f.inner, "<<")?;
            self.first = false;
        }
        Ok(())
    }

    /// Write a field
    pub fn field(&mut self, name: &str, value: &dyn Serialize) -> io::Result<&mut Self> {
        self.check_first()?;
        self.f.indent += 2;
        self.f.indent()?;
        self.f.needs_space = write_name(name, &mut self.f.inner)?;
        value.write(self.f)?;
        writeln!(self.f.inner)?;
        self.f.indent -= 2;
        Ok(self)
    }

    /// Write flattened
    pub fn embed<X: ToDict>(&mut self, embed: &X) -> io::Result<&mut Self> {
        embed.write(self)?;
        Ok(self)
    }

    /// Write an optional field, if it is not `None`
    pub fn opt_field<X: Serialize>(
        &mut self,
        name: &str,
        field: &Option<X>,
    ) -> io::Result<&mut Self> {
        if let Some(value) = field {
            self.field(name, value)
        } else {
            Ok(self)
        }
    }

    /// Write a slice-valued field
    pub fn arr_field<X: Serialize>(&mut self, name: &str, array: &[X]) -> io::Result<&mut Self> {
        self.check_first()?;
        self.f.indent += 2;
        self.f.indent()?;
        write_name(name, &mut self.f.inner)?;

        self.f.pdf_arr().entries(array)?.finish()?;

        writeln!(self.f.inner)?;
        self.f.indent -= 2;
        Ok(self)
    }

    /// Close the dict
    pub fn finish(&mut self) -> io::Result<()> {
        if self.first {
            write!(self.f.inner, "<< >>")?;
        } else {
            self.f.indent()?;
            write!(self.f.inner, ">>")?;
        }
        self.f.needs_space = false;
        Ok(())
    }
}

/// API to serialize a type into a dict
pub trait ToDict {
    /// Add the key to the dict
    fn write(&self, dict: &mut PdfDict<'_, '_, '_>) -> io::Result<()>;
}

/// API to serialize an array
#[must_use]
pub struct PdfArr<'f, 'w, 'a> {
    first: bool,
    f: &'f mut Formatter<'w, 'a>,
}

impl PdfArr<'_, '_, '_> {
    fn check_first(&mut self) -> io::Result<()> {
        if self.first {
            write!(self.f.inner, "[")?;
            self.first = false;
            self.f.needs_space = false;
        }
        Ok(())
    }

    /// Write the next entry
    pub fn entry<S: Serialize + ?Sized>(&mut self, value: &S) -> io::Result<&mut Self> {
        self.check_first()?;
        value.write(self.f)?;
        Ok(self)
    }

    /// Write entries from an iterator
    pub fn entries<X: Serialize>(
        &mut self,
        i: impl IntoIterator<Item = X>,
    ) -> io::Result<&mut Self> {
        for entry in i.into_iter() {
            self.entry(&entry)?;
        }
        Ok(self)
    }

    /// Close the array
    pub fn finish(&mut self) -> io::Result<()> {
        if self.first {
            write!(self.f.inner, "[]")?;
        } else {
            write!(self.f.inner, "]")?;
        }
        self.f.needs_space = false;
        Ok(())
    }
}

/// An object that is written as the body of an indirect object
///
/// Implementations register the objects they refer to with
/// [`Formatter::reference`] or [`Formatter::insert`] and write the
/// returned [`ObjRef`]s into their body.
pub trait PdfObject<'a> {
    /// Write the body of the object (without `obj`/`endobj`)
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()>;
}

type BoxedObject<'a> = Box<dyn PdfObject<'a> + 'a>;

/// An object that only contains direct values
#[derive(Debug, Clone)]
pub struct Plain<T>(pub T);

impl<'a, T: Serialize> PdfObject<'a> for Plain<T> {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        self.0.write(f)
    }
}

/// Formatter for a PDF document
///
/// `'w` is the lifetime of the output, `'a` the lifetime of the object
/// graph that is being written.
pub struct Formatter<'w, 'a> {
    pub(crate) inner: ByteCounter<&'w mut dyn Write>,
    indent: usize,
    needs_space: bool,
    objects: Vec<Option<BoxedObject<'a>>>,
    offsets: Vec<usize>,
    refs: HashMap<ObjKey, ObjRef>,
}

impl<'w, 'a> Formatter<'w, 'a> {
    /// Create a new formatter
    pub fn new(w: &'w mut dyn Write) -> Self {
        Self {
            inner: ByteCounter::new(w),
            indent: 0,
            needs_space: false,
            objects: Vec::new(),
            offsets: Vec::new(),
            refs: HashMap::new(),
        }
    }

    /// Start writing a PDF dict
    pub fn pdf_dict(&mut self) -> PdfDict<'_, 'w, 'a> {
        PdfDict {
            first: true,
            f: self,
        }
    }

    /// Start writing a PDF array
    pub fn pdf_arr(&mut self) -> PdfArr<'_, 'w, 'a> {
        PdfArr {
            first: true,
            f: self,
        }
    }

    /// Write the body of a stream, after its dict
    pub fn pdf_stream(&mut self, data: &[u8]) -> io::Result<()> {
        writeln!(self.inner)?;
        writeln!(self.inner, "stream")?;
        self.inner.write_all(data)?;
        write!(self.inner, "\nendstream")?;
        Ok(())
    }

    /// Get the reference for a shared object, registering it on first use
    ///
    /// Calling this again with the same `key` returns the same reference
    /// and drops `obj`.
    pub fn reference<O: PdfObject<'a> + 'a>(&mut self, key: ObjKey, obj: O) -> ObjRef {
        if let Some(r) = self.refs.get(&key) {
            return *r;
        }
        let r = self.insert(obj);
        self.refs.insert(key, r);
        r
    }

    /// Register a new object and return its reference
    pub fn insert<O: PdfObject<'a> + 'a>(&mut self, obj: O) -> ObjRef {
        self.objects.push(Some(Box::new(obj)));
        ObjRef {
            id: self.objects.len() as u64,
            gen: 0,
        }
    }

    /// The number of registered objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// The number of bytes written so far
    pub fn bytes_written(&self) -> usize {
        self.inner.bytes_written()
    }

    /// Write the file header
    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.inner, "%PDF-1.7")?;
        self.inner.write_all(&[b'%', 180, 200, 220, 240, b'\n'])?;
        Ok(())
    }

    /// Write all registered objects that were not written yet
    pub fn write_pending(&mut self) -> io::Result<()> {
        let mut next = self.offsets.len();
        // objects register more objects while being written
        while next < self.objects.len() {
            let obj = self.objects[next].take();
            self.offsets.push(self.inner.bytes_written());
            writeln!(self.inner, "{} 0 obj", next + 1)?;
            if let Some(obj) = obj {
                obj.write_body(self)?;
            }
            write!(self.inner, "\nendobj\n")?;
            self.indent = 0;
            self.needs_space = false;
            next += 1;
        }
        Ok(())
    }

    /// Write a classic xref section, returns its offset
    pub fn xref(&mut self) -> io::Result<usize> {
        let offset = self.inner.bytes_written();
        writeln!(self.inner, "xref")?;
        writeln!(self.inner, "0 {}", self.offsets.len() + 1)?;
        // NOTE: the PDF spec requires the eol to be two bytes long (i.e. SP LF or CR LF)
        writeln!(self.inner, "{:010} {:05} f ", 0, 65535)?;
        for pos in &self.offsets {
            writeln!(self.inner, "{:010} {:05} n ", pos, 0)?;
        }
        Ok(offset)
    }

    /// Write the xref section, trailer and end-of-file marker
    pub fn finish(&mut self, root: ObjRef, info: Option<ObjRef>) -> io::Result<()> {
        let startxref = self.xref()?;
        writeln!(self.inner, "trailer")?;
        let trailer = Trailer {
            size: self.offsets.len() + 1,
            root,
            info,
        };
        trailer.write(self)?;
        writeln!(self.inner)?;
        writeln!(self.inner, "startxref")?;
        writeln!(self.inner, "{}", startxref)?;
        writeln!(self.inner, "%%EOF")?;
        Ok(())
    }

    /// Write a complete document, starting with `root`
    ///
    /// The info dict, if any, is registered after every object reachable
    /// from the root has been written.
    pub fn write_document<R, I>(&mut self, root: R, info: Option<I>) -> io::Result<()>
    where
        R: PdfObject<'a> + 'a,
        I: PdfObject<'a> + 'a,
    {
        self.header()?;
        let root = self.insert(root);
        self.write_pending()?;
        let info = info.map(|info| self.insert(info));
        self.write_pending()?;
        log::debug!(
            "Wrote {} objects, {} bytes before xref",
            self.object_count(),
            self.bytes_written()
        );
        self.finish(root, info)
    }

    fn indent(&mut self) -> io::Result<()> {
        write!(self.inner, "{:indent$}", "", indent = self.indent)?;
        Ok(())
    }
}

/// The trailer of the document
pub struct Trailer {
    /// The size of the document / number of objects
    pub size: usize,
    /// Reference to the root/catalog
    pub root: ObjRef,
    /// Optional reference to the info struct
    pub info: Option<ObjRef>,
}

impl Serialize for Trailer {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.pdf_dict()
            .field("Size", &self.size)?
            .field("Root", &self.root)?
            .opt_field("Info", &self.info)?
            .finish()
    }
}

/// Trait to serialize some PDF object
pub trait Serialize {
    /// Write the object to a stream
    fn write(&self, f: &mut Formatter) -> io::Result<()>;
}

impl<X: Serialize + ?Sized> Serialize for &'_ X {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        (*self).write(f)
    }
}

impl Serialize for PdfString {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.needs_space = write_string(self.as_bytes(), &mut f.inner)?;
        Ok(())
    }
}

macro_rules! serialize_display_impl {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn write(&self, f: &mut Formatter) -> io::Result<()> {
                if f.needs_space {
                    write!(f.inner, " ")?;
                }
                write!(f.inner, "{}", self)?;
                f.needs_space = true;
                Ok(())
            }
        }
    };
}

serialize_display_impl!(u8);
serialize_display_impl!(u16);
serialize_display_impl!(usize);
serialize_display_impl!(u32);
serialize_display_impl!(u64);
serialize_display_impl!(i32);
serialize_display_impl!(f32);
serialize_display_impl!(bool);
serialize_display_impl!(Real);

impl<X: Serialize> Serialize for Vec<X> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        self.as_slice().write(f)
    }
}

impl<X: Serialize> Serialize for [X] {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        write!(f.inner, "[")?;
        f.needs_space = false;
        for elem in self {
            elem.write(f)?;
        }
        write!(f.inner, "]")?;
        f.needs_space = false;
        Ok(())
    }
}

impl Serialize for ObjRef {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        if f.needs_space {
            write!(f.inner, " ")?;
        }
        f.needs_space = write_ref(*self, &mut f.inner)?;
        Ok(())
    }
}

/// A borrowed PDF name (e.g. `/Info`)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PdfName<'a>(pub &'a str);

impl Serialize for PdfName<'_> {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        f.needs_space = write_name(self.0, &mut f.inner)?;
        Ok(())
    }
}

/// An owned PDF name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PdfNameBuf(pub String);

impl PdfNameBuf {
    /// Borrow as a [`PdfName`]
    pub fn as_name(&self) -> PdfName<'_> {
        PdfName(&self.0)
    }
}

impl From<&str> for PdfNameBuf {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl Serialize for PdfNameBuf {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        self.as_name().write(f)
    }
}

/// Writes a complete string to a writer
pub fn write_string<W: Write>(bytes: &[u8], w: &mut W) -> io::Result<bool> {
    let mut cpc = bytes.iter().copied().filter(|c| *c == 41 /* ')' */).count();
    let mut opc = 0;
    write!(w, "(")?;
    for byte in bytes.iter().copied() {
        match byte {
            0..=31 | 127..=255 => write!(w, "\\{:03o}", byte)?,
            92 => write!(w, "\\\\")?,
            40 => {
                if cpc == 0 {
                    write!(w, "\\(")?
                } else {
                    write!(w, "(")?;
                    cpc -= 1;
                    opc += 1;
                }
            }
            41 => {
                if opc == 0 {
                    write!(w, "\\)")?;
                    cpc -= 1;
                } else {
                    write!(w, ")")?;
                    opc -= 1;
                }
            }
            _ => write!(w, "{}", byte as char)?,
        }
    }
    write!(w, ")")?;
    Ok(false)
}

/// Write a borrowed string as a PDF name
///
/// Bytes outside of the printable ASCII range and delimiters are written
/// as `#xx` escapes.
pub fn write_name<W: Write>(name: &str, w: &mut W) -> io::Result<bool> {
    write!(w, "/")?;
    for byte in name.bytes() {
        match byte {
            b'!'..=b'~'
                if !matches!(
                    byte,
                    b'#' | b'%' | b'(' | b')' | b'/' | b'<' | b'>' | b'[' | b']' | b'{' | b'}'
                ) =>
            {
                w.write_all(&[byte])?
            }
            _ => write!(w, "#{:02X}", byte)?,
        }
    }
    Ok(true)
}

/// Write a plain reference
pub fn write_ref<W: Write>(plain_ref: ObjRef, w: &mut W) -> io::Result<bool> {
    write!(w, "{} {} R", plain_ref.id, plain_ref.gen)?;
    Ok(true)
}
