mod common;

use common::{check_structure, find, init_logger};
use outline_pdf::{
    font::program::{FontProgram, GlyphId, Segment},
    Document, FontError, Settings,
};
use pdf_create::common::Point;

/// A small TrueType font with a `kern` table and both `GPOS` pair formats,
/// see `tests/fonts/README.md`
const OUTLINE_TEST: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/OutlineTest.ttf");

fn settings(embedding: &str) -> Settings {
    Settings::from_ron(&format!(
        "(embedding: {}, content_flate: Never, glyph_flate: Never, font_file_flate: Never)",
        embedding
    ))
    .unwrap()
}

fn hello(embedding: &str) -> Vec<u8> {
    let mut doc = Document::with_settings(settings(embedding));
    let font = doc.load_font(OUTLINE_TEST).unwrap();
    let page = doc.new_page(595.0, 842.0);
    let mut canvas = doc.canvas(page).unwrap();
    canvas.set_font(font, 12.0).unwrap();
    canvas.left(72.0, 770.0, "AVA To LY").unwrap();
    doc.encode()
}

fn pt(x: f64, y: f64) -> Point<f64> {
    Point { x, y }
}

#[test]
fn font_file_queries() {
    init_logger();
    let mut doc = Document::with_settings(settings("Type3"));
    let id = doc.load_font(OUTLINE_TEST).unwrap();
    assert_eq!(doc.load_font(OUTLINE_TEST).unwrap(), id);

    let font = doc.font(id).unwrap().program();
    assert_eq!(font.postscript_name(), "OutlineTest-Regular");
    let glyph = |chr| font.glyph_index(chr).unwrap();
    assert_eq!(glyph(' '), GlyphId(1));
    assert_eq!(glyph('A'), GlyphId(2));
    assert_eq!(font.glyph_index('Z'), None);

    // 500 units per em
    assert_eq!(font.advance(glyph('A')), Some(600.0));
    assert_eq!(font.advance(glyph(' ')), Some(250.0));

    // `kern` table
    assert_eq!(font.kerning(glyph('A'), glyph('V')), Some(-80.0));
    assert_eq!(font.kerning(glyph('V'), glyph('A')), Some(-80.0));
    // GPOS pair adjustment, glyph pairs
    assert_eq!(font.kerning(glyph('T'), glyph('o')), Some(-60.0));
    // GPOS pair adjustment, class pairs
    assert_eq!(font.kerning(glyph('L'), glyph('Y')), Some(-100.0));
    assert_eq!(font.kerning(glyph('Y'), glyph('L')), None);
    assert_eq!(font.kerning(glyph('A'), glyph('T')), None);

    let metrics = font.metrics();
    assert_eq!((metrics.ascent, metrics.descent), (800, -200));
    assert_eq!(metrics.cap_height, 700);
    assert_eq!(metrics.italic_angle, 0.0);
    assert_eq!(metrics.bbox.ll, Point { x: 0, y: 0 });
    assert_eq!(metrics.bbox.ur, Point { x: 600, y: 700 });
    assert!(!metrics.fixed_pitch);

    assert_eq!(font.outline(glyph(' ')), Some(vec![]));
    let a = font.outline(glyph('A')).unwrap();
    assert_eq!(a[0], Segment::MoveTo(pt(0.0, 0.0)));
    assert!(a.contains(&Segment::LineTo(pt(300.0, 700.0))));
    assert_eq!(
        font.outline(glyph('o')).unwrap(),
        [
            Segment::MoveTo(pt(250.0, 0.0)),
            Segment::QuadTo(pt(450.0, 0.0), pt(450.0, 250.0)),
            Segment::QuadTo(pt(450.0, 500.0), pt(250.0, 500.0)),
            Segment::QuadTo(pt(50.0, 500.0), pt(50.0, 250.0)),
            Segment::QuadTo(pt(50.0, 0.0), pt(250.0, 0.0)),
        ]
    );
}

#[test]
fn font_file_as_type3() {
    init_logger();
    let out = hello("Type3");
    check_structure(&out);
    assert_eq!(out, hello("Type3"));
    let text = String::from_utf8_lossy(&out);

    assert!(text.contains("BT\n72 770 Td\n[(A)80(V)80(A T)60(o L)100(Y)] TJ\nET\n"));
    assert!(text.contains("stream\n500 0 50 -500 450 0 d1\n250 0 m\n"));
    assert!(text.contains("stream\n250 0 0 0 0 0 d1\n\nendstream"));
    // no font file for Type 3
    assert!(!text.contains("/FontFile2"));
}

#[test]
fn font_file_as_cid() {
    init_logger();
    let out = hello("Cid");
    check_structure(&out);
    assert_eq!(out, hello("Cid"));
    let text = String::from_utf8_lossy(&out);

    let data = std::fs::read(OUTLINE_TEST).unwrap();
    assert!(text.contains("  /BaseFont/OutlineTest-Regular\n"));
    assert!(text.contains("  /FontBBox[0 0 600 700]\n"));
    assert!(text.contains("  /Ascent 800\n"));
    assert!(text.contains(&format!("  /Length1 {}\n", data.len())));
    // the font file is embedded unchanged
    assert!(find(&out, &data).is_some());
    assert!(find(&out, b"[(\\000\\002)80(\\000\\003)80(\\000\\002\\000\\001\\000\\004)60").is_some());
}

#[test]
fn font_without_postscript_name() {
    let mut data = std::fs::read(OUTLINE_TEST).unwrap();
    let tables = usize::from(u16::from_be_bytes([data[4], data[5]]));
    let record = (0..tables)
        .map(|i| 12 + 16 * i)
        .find(|&offset| &data[offset..offset + 4] == b"name")
        .unwrap();
    // keeps the table records sorted
    data[record + 3] = b'x';

    let mut doc = Document::new();
    assert!(matches!(
        doc.load_font_bytes(data),
        Err(FontError::MissingName)
    ));
}
