#![allow(dead_code)]

use std::sync::Arc;

use log::LevelFilter;
use outline_pdf::font::program::{FontKind, FontMetrics, FontProgram, GlyphId, Segment};
use pdf_create::common::{Point, Rectangle};

const CHARS: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789.,-…Ω";

pub fn init_logger() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}

/// A font without font file that draws boxes
///
/// `o` is drawn with quadratic curves and the space is empty. The pairs
/// `AV`, `VA` and `To` are kerned.
#[derive(Debug, Default)]
pub struct TestSans;

pub fn test_sans() -> Arc<dyn FontProgram> {
    Arc::new(TestSans)
}

fn chr(glyph: GlyphId) -> Option<char> {
    CHARS.chars().nth(usize::from(glyph.0).checked_sub(1)?)
}

fn pt(x: f64, y: f64) -> Point<f64> {
    Point { x, y }
}

impl FontProgram for TestSans {
    fn postscript_name(&self) -> &str {
        "TestSans-Regular"
    }

    fn kind(&self) -> FontKind {
        FontKind::TrueType
    }

    fn data(&self) -> &[u8] {
        b"\x00\x01\x00\x00TestSans"
    }

    fn glyph_index(&self, c: char) -> Option<GlyphId> {
        CHARS
            .chars()
            .position(|x| x == c)
            .map(|i| GlyphId(i as u16 + 1))
    }

    fn advance(&self, glyph: GlyphId) -> Option<f64> {
        Some(match chr(glyph) {
            None => 500.0,
            Some(' ') => 250.0,
            Some('…') => 800.0,
            Some(c) if c.is_uppercase() => 600.0,
            Some(_) => 500.0,
        })
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<f64> {
        match (chr(left)?, chr(right)?) {
            ('A', 'V') | ('V', 'A') => Some(-80.0),
            ('T', 'o') => Some(-40.0),
            _ => None,
        }
    }

    fn outline(&self, glyph: GlyphId) -> Option<Vec<Segment>> {
        let c = chr(glyph).unwrap_or('?');
        let width = self.advance(glyph)?;
        let height = if c.is_uppercase() { 700.0 } else { 500.0 };
        Some(match c {
            ' ' => vec![],
            'o' => vec![
                Segment::MoveTo(pt(250.0, 0.0)),
                Segment::QuadTo(pt(450.0, 0.0), pt(450.0, 250.0)),
                Segment::QuadTo(pt(450.0, 500.0), pt(250.0, 500.0)),
                Segment::QuadTo(pt(50.0, 500.0), pt(50.0, 250.0)),
                Segment::QuadTo(pt(50.0, 0.0), pt(250.0, 0.0)),
            ],
            _ => vec![
                Segment::MoveTo(pt(50.0, 0.0)),
                Segment::LineTo(pt(width - 50.0, 0.0)),
                Segment::LineTo(pt(width - 50.0, height)),
                Segment::LineTo(pt(50.0, height)),
            ],
        })
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: 750,
            descent: -250,
            cap_height: 700,
            italic_angle: 0.0,
            bbox: Rectangle {
                ll: Point { x: 0, y: -250 },
                ur: Point { x: 800, y: 750 },
            },
            fixed_pitch: false,
        }
    }
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Check the xref table and trailer, returns the number of objects
pub fn check_structure(out: &[u8]) -> usize {
    assert!(out.starts_with(b"%PDF-1.7\n"));
    assert!(out.ends_with(b"%%EOF\n"));

    let startxref = find(out, b"startxref\n").expect("startxref") + "startxref\n".len();
    let end = startxref + find(&out[startxref..], b"\n").unwrap();
    let xref: usize = std::str::from_utf8(&out[startxref..end])
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(&out[xref..xref + 5], b"xref\n");

    let header_end = xref + 5 + find(&out[xref + 5..], b"\n").unwrap();
    let header = std::str::from_utf8(&out[xref + 5..header_end]).unwrap();
    let size: usize = header.strip_prefix("0 ").unwrap().parse().unwrap();

    let entries = &out[header_end + 1..];
    assert_eq!(&entries[..20], b"0000000000 65535 f \n");
    for k in 1..size {
        let line = &entries[k * 20..(k + 1) * 20];
        assert_eq!(&line[10..], b" 00000 n \n", "entry {}", k);
        let offset: usize = std::str::from_utf8(&line[..10]).unwrap().parse().unwrap();
        let obj = format!("{} 0 obj\n", k);
        assert_eq!(&out[offset..offset + obj.len()], obj.as_bytes(), "object {}", k);
    }
    assert_eq!(&entries[size * 20..size * 20 + 8], b"trailer\n");

    let trailer = String::from_utf8_lossy(&entries[size * 20..]);
    assert!(trailer.contains(&format!("/Size {}\n", size)));
    assert!(trailer.contains("/Root 1 0 R\n"));
    assert!(find(out, format!("{} 0 obj\n", size).as_bytes()).is_none());
    size - 1
}
