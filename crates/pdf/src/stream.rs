//! Stream objects

use std::{
    borrow::Cow,
    io::{self, Write},
};

use flate2::{write::ZlibEncoder, Compression};

use crate::write::{Formatter, PdfDict, PdfName, PdfObject, Serialize, ToDict};

/// The dict entry that is added for a compressed stream, as written
const FILTER_ENTRY: &str = "  /Filter/FlateDecode\n";

/// When to apply the `FlateDecode` filter to a stream
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FlatePolicy {
    /// Write the data as-is
    Never,
    /// Always compress the data
    Always,
    /// Compress, but only keep the result if it saves more bytes than the
    /// filter entry costs
    #[default]
    IfSmaller,
}

/// The metadata for a stream
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StreamMetadata {
    /// No specific metadata (e.g. `CharProc`)
    #[default]
    None,
    /// A TrueType font program (`FontFile2`)
    TrueTypeProgram {
        /// The length of the uncompressed program
        length1: usize,
    },
    /// An OpenType font program (`FontFile3`)
    OpenTypeProgram,
}

impl ToDict for StreamMetadata {
    fn write(&self, dict: &mut PdfDict<'_, '_, '_>) -> io::Result<()> {
        match self {
            Self::None => Ok(()),
            Self::TrueTypeProgram { length1 } => {
                dict.field("Length1", length1)?;
                Ok(())
            }
            Self::OpenTypeProgram => {
                dict.field("Subtype", &PdfName("OpenType"))?;
                Ok(())
            }
        }
    }
}

/// A data stream
///
/// The data is kept uncompressed; the filter is applied when the stream
/// is written.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    /// The (unencoded) data
    pub data: Vec<u8>,
    /// The compression policy
    pub flate: FlatePolicy,
    /// Additional metadata
    pub meta: StreamMetadata,
}

impl Stream {
    /// Create a new, empty stream
    pub fn new(flate: FlatePolicy) -> Self {
        Self {
            data: Vec::new(),
            flate,
            meta: StreamMetadata::None,
        }
    }

    /// Create a stream from existing data
    pub fn with_data(data: Vec<u8>, flate: FlatePolicy, meta: StreamMetadata) -> Self {
        Self { data, flate, meta }
    }

    /// Get the bytes between `stream` and `endstream`, and whether they are compressed
    pub fn encoded(&self) -> io::Result<(Cow<'_, [u8]>, bool)> {
        match self.flate {
            FlatePolicy::Never => Ok((Cow::Borrowed(&self.data), false)),
            FlatePolicy::Always => Ok((Cow::Owned(deflate(&self.data)?), true)),
            FlatePolicy::IfSmaller => {
                let compressed = deflate(&self.data)?;
                let saved = self.data.len().saturating_sub(compressed.len());
                if saved > FILTER_ENTRY.len() {
                    Ok((Cow::Owned(compressed), true))
                } else {
                    log::trace!(
                        "Keeping {} bytes uncompressed (deflate: {} bytes)",
                        self.data.len(),
                        compressed.len()
                    );
                    Ok((Cow::Borrowed(&self.data), false))
                }
            }
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn deflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut e = ZlibEncoder::new(Vec::new(), Compression::best());
    e.write_all(data)?;
    e.finish()
}

impl Serialize for Stream {
    fn write(&self, f: &mut Formatter) -> io::Result<()> {
        let (data, compressed) = self.encoded()?;
        let mut dict = f.pdf_dict();
        dict.embed(&self.meta)?.field("Length", &data.len())?;
        if compressed {
            dict.field("Filter", &PdfName("FlateDecode"))?;
        }
        dict.finish()?;
        f.pdf_stream(&data)?;
        Ok(())
    }
}

impl<'a> PdfObject<'a> for Stream {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        Serialize::write(self, f)
    }
}

impl<'a> PdfObject<'a> for &'a Stream {
    fn write_body(&self, f: &mut Formatter<'_, 'a>) -> io::Result<()> {
        Serialize::write(*self, f)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use flate2::read::ZlibDecoder;

    use super::{FlatePolicy, Stream, StreamMetadata, FILTER_ENTRY};
    use crate::write::{Formatter, Serialize};

    fn ser(stream: &Stream) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut f = Formatter::new(&mut out);
            Serialize::write(stream, &mut f).unwrap();
        }
        out
    }

    fn body(out: &[u8]) -> &[u8] {
        let start = out.windows(7).position(|w| w == b"stream\n").unwrap() + 7;
        let end = out.len() - b"\nendstream".len();
        &out[start..end]
    }

    #[test]
    fn test_raw() {
        let mut s = Stream::new(FlatePolicy::Never);
        write!(s, "0 0 m 10 10 l S").unwrap();
        let out = ser(&s);
        assert_eq!(
            out,
            b"<<\n  /Length 15\n>>\nstream\n0 0 m 10 10 l S\nendstream".to_vec()
        );
    }

    #[test]
    fn test_always() {
        let mut s = Stream::new(FlatePolicy::Always);
        s.write_all(b"1000 0 0 0 0 0 d1").unwrap();
        let out = ser(&s);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Filter/FlateDecode"));

        assert!(text.contains(FILTER_ENTRY));
        let uncompressed = ser(&Stream::with_data(
            s.data.clone(),
            FlatePolicy::Never,
            StreamMetadata::None,
        ));
        let data = body(&out);
        // the dict grows by exactly the filter entry, apart from the length digits
        let digits = |n: usize| n.to_string().len();
        assert_eq!(
            out.len() - data.len() - digits(data.len()),
            uncompressed.len() - s.data.len() - digits(s.data.len()) + FILTER_ENTRY.len()
        );
        assert!(text.contains(&format!("/Length {}\n", data.len())));
        let mut plain = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut plain).unwrap();
        assert_eq!(plain, b"1000 0 0 0 0 0 d1");
        // the source buffer is left alone
        assert_eq!(s.data, b"1000 0 0 0 0 0 d1");
    }

    #[test]
    fn test_if_smaller() {
        let small = Stream::with_data(b"BT ET".to_vec(), FlatePolicy::IfSmaller, StreamMetadata::None);
        let (_, compressed) = small.encoded().unwrap();
        assert!(!compressed);

        let big = Stream::with_data(
            b"0 0 m 10 10 l S\n".repeat(100),
            FlatePolicy::IfSmaller,
            StreamMetadata::None,
        );
        let (data, compressed) = big.encoded().unwrap();
        assert!(compressed);
        assert!(data.len() < big.data.len());
    }

    #[test]
    fn test_metadata() {
        let s = Stream::with_data(
            vec![0; 4],
            FlatePolicy::Never,
            StreamMetadata::TrueTypeProgram { length1: 4 },
        );
        let out = ser(&s);
        assert!(out.starts_with(b"<<\n  /Length1 4\n  /Length 4\n>>\nstream\n"));

        let s = Stream::with_data(vec![], FlatePolicy::Never, StreamMetadata::OpenTypeProgram);
        let out = ser(&s);
        assert!(out.starts_with(b"<<\n  /Subtype/OpenType\n  /Length 0\n>>\nstream\n\nendstream"));
    }
}
