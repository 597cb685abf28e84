mod common;

use common::{check_structure, find, init_logger, test_sans};
use outline_pdf::{Document, Embedding, Settings};

fn raw_settings() -> Settings {
    Settings::from_ron("(content_flate: Never, glyph_flate: Never, font_file_flate: Never)")
        .unwrap()
}

fn hello(settings: Settings, embedding: Embedding) -> Document {
    let mut doc = Document::with_settings(settings);
    let font = doc.add_font(test_sans(), embedding);
    let page = doc.new_page(595.0, 842.0);
    let mut canvas = doc.canvas(page).unwrap();
    canvas.set_font(font, 12.0).unwrap();
    canvas.left(72.0, 770.0, "AVATAR Too Ω").unwrap();
    doc
}

#[test]
fn one_line_of_text() {
    init_logger();
    let out = hello(raw_settings(), Embedding::Type3).encode();
    // catalog, pages, page, contents, font, char procs, to unicode, glyphs
    let count = check_structure(&out);
    let text = String::from_utf8_lossy(&out);

    assert!(text.contains("4 0 obj\n<<\n  /Length "));
    assert!(text.contains("/F0 12 Tf\nBT\n72 770 Td\n[(A)80(V)80(ATAR T)40(oo \\037)] TJ\nET\n"));

    assert!(text.contains("5 0 obj\n<<\n  /Type/Font\n  /Subtype/Type3\n"));
    assert!(text.contains("  /FontMatrix[0.001 0 0 -0.001 0 0]\n"));
    assert!(text.contains("  /CharProcs 6 0 R\n"));
    assert!(text.contains("  /ToUnicode 7 0 R\n"));
    assert!(text.contains("/Differences[31/uni03A9]"));
    assert!(text.contains("  /FirstChar 31\n  /LastChar 111\n"));
    assert!(text.contains("  /Resources<< >>\n  /ToUnicode"));
    assert!(text.contains("  /Resources\n  <<\n    /Font\n    <<\n      /F0 5 0 R\n"));

    // one glyph program per character: A R T V o space Ω
    assert_eq!(count, 7 + 7);
    assert!(text.contains("6 0 obj\n<<\n  /A 8 0 R\n  /R 9 0 R\n  /T 10 0 R\n  /V 11 0 R\n  /o 12 0 R\n  /space 13 0 R\n  /uni03A9 14 0 R\n>>"));
    assert!(text.contains("stream\n500 0 50 -500 450 0 d1\n250 0 m\n"));
    assert!(text.contains("stream\n250 0 0 0 0 0 d1\n\nendstream"));
    assert!(text.contains("<1F> <03A9>\n"));
}

#[test]
fn cid_embedding() {
    init_logger();
    let out = hello(raw_settings(), Embedding::Cid).encode();
    // font, descendant, to unicode, descriptor, font file
    assert_eq!(check_structure(&out), 9);
    let text = String::from_utf8_lossy(&out);

    assert!(text.contains("/Subtype/Type0\n"));
    assert!(text.contains("  /BaseFont/TestSans-Regular\n  /Encoding/Identity-H\n"));
    assert!(text.contains("/Subtype/CIDFontType2\n"));
    assert!(text.contains("  /CIDToGIDMap/Identity\n"));
    assert!(text.contains("/Type/FontDescriptor\n"));
    assert!(text.contains("  /FontBBox[0 -250 800 750]\n"));
    assert!(text.contains("  /FontFile2 9 0 R\n"));
    assert!(text.contains("  /Length1 12\n"));
    assert!(text.contains("<0000> <FFFF>\n"));
    assert!(!text.contains("/Type3"));
    // 2-byte glyph codes: A is glyph 2
    assert!(find(&out, b"[(\\000\\002)80(\\000\\027)").is_some());
}

#[test]
fn deterministic() {
    let a = hello(Settings::default(), Embedding::Type3);
    let b = hello(Settings::default(), Embedding::Type3);
    let first = a.encode();
    assert_eq!(first, a.encode());
    assert_eq!(first, b.encode());
    check_structure(&first);
}

#[test]
fn compressed_streams() {
    let out = hello(Settings::default(), Embedding::Type3).encode();
    check_structure(&out);
    let text = String::from_utf8_lossy(&out);
    assert!(text.contains("/Filter/FlateDecode"));
    // glyph programs are never stored raw by default
    assert!(!text.contains("d1\n"));
}

#[test]
fn shared_font_on_two_pages() {
    let mut doc = Document::with_settings(raw_settings());
    let font = doc.add_font(test_sans(), Embedding::Type3);
    for line in &["first", "second"] {
        let page = doc.new_page(200.0, 200.0);
        let mut canvas = doc.canvas(page).unwrap();
        canvas.set_font(font, 10.0).unwrap();
        canvas.center(100.0, 100.0, line).unwrap();
    }
    let out = doc.encode();
    check_structure(&out);
    let text = String::from_utf8_lossy(&out);
    assert_eq!(text.matches("/Subtype/Type3").count(), 1);
    assert_eq!(text.matches("/F0 6 0 R").count(), 2);
}

#[test]
fn info_dictionary() {
    let settings = Settings::from_ron(
        r#"(meta: (title: "Zoë", author: "Someone", keywords: ["fonts", "pdf"]))"#,
    )
    .unwrap();
    let doc = Document::with_settings(settings);
    let out = doc.encode();
    let count = check_structure(&out);
    let text = String::from_utf8_lossy(&out);
    assert_eq!(count, 3);
    assert!(text.contains("/Info 3 0 R\n"));
    assert!(text.contains("  /Author(Someone)\n  /Keywords(fonts, pdf)\n"));
    assert!(find(&out, b"/Title(Zo\\353)").is_some());
}
