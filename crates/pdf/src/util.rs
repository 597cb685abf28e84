//! Generic utilities

use std::io::{self, Write};

use crate::common::ObjKey;

/// Writer adapter that keeps track of the output position
///
/// Source: <https://stackoverflow.com/questions/42187591/>
pub struct ByteCounter<W> {
    inner: W,
    count: usize,
}

impl<W> ByteCounter<W>
where
    W: Write,
{
    /// Create a new byte counter
    pub fn new(inner: W) -> Self {
        ByteCounter { inner, count: 0 }
    }

    /// Get the number of bytes written
    pub fn bytes_written(&self) -> usize {
        self.count
    }
}

impl<W> Write for ByteCounter<W>
where
    W: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res = self.inner.write(buf);
        if let Ok(size) = res {
            self.count += size
        }
        res
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Hands out [`ObjKey`]s for the shared objects of one document
#[derive(Debug, Default)]
pub struct KeyGen {
    next: u64,
}

impl KeyGen {
    /// Create a new generator
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Get a key that was never returned before by this generator
    pub fn next_key(&mut self) -> ObjKey {
        let key = ObjKey(self.next);
        self.next += 1;
        key
    }
}

/// A real number, written with at most three fractional digits
///
/// Content streams do not need more precision than 1/1000 of a unit,
/// and trimming keeps glyph programs and page contents compact.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Real(pub f64);

impl std::fmt::Display for Real {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = (self.0 * 1000.0).round() / 1000.0;
        if rounded == 0.0 {
            // avoid `-0`
            return write!(f, "0");
        }
        let text = format!("{:.3}", rounded);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        f.write_str(text)
    }
}
