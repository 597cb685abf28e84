//! Text layout with kerning
//!
//! All widths in this module are in glyph space units (1/1000 em). A
//! width `w` at font size `s` is `w * s * 0.001` units on the page.

use std::io::{self, Write};

use pdf_create::{util::Real, write::write_string};

use crate::{error::LayoutError, font::FontResource, page::Canvas};

/// The ellipsis that marks truncated text
pub const ELLIPSIS: &str = "\u{2026}";

/// One operand of a `TJ` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowItem {
    /// Encoded text
    Text(Vec<u8>),
    /// Positioning in glyph space units, subtracted from the current position
    Adjust(i32),
}

/// The operand of the `TJ` operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowArray(pub Vec<ShowItem>);

impl ShowArray {
    fn push_text(&mut self, text: Vec<u8>) {
        if !text.is_empty() {
            self.0.push(ShowItem::Text(text));
        }
    }

    fn append(&mut self, other: ShowArray) {
        self.0.extend(other.0);
    }

    /// The encoded text, without the positioning
    pub fn text(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for item in &self.0 {
            if let ShowItem::Text(bytes) = item {
                out.extend_from_slice(bytes);
            }
        }
        out
    }

    /// Write the array followed by the `TJ` operator
    pub fn write_tj<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "[")?;
        let mut needs_space = false;
        for item in &self.0 {
            match item {
                ShowItem::Text(bytes) => {
                    needs_space = write_string(bytes, out)?;
                }
                ShowItem::Adjust(adjust) => {
                    if needs_space {
                        write!(out, " ")?;
                    }
                    write!(out, "{}", adjust)?;
                    needs_space = true;
                }
            }
        }
        writeln!(out, "] TJ")
    }
}

/// Encode `text` and apply kerning
///
/// Returns the show array and its width. If `max_width` is set, the text
/// stops before the first glyph that would exceed it and the returned width
/// is the width of the glyphs that fit.
pub fn encode_and_kern(
    font: &mut FontResource,
    text: &str,
    max_width: Option<i32>,
) -> (ShowArray, i32) {
    let mut tj = ShowArray::default();
    let mut chunk = Vec::new();
    let mut width = 0;
    let mut prev = None;
    for chr in text.chars() {
        let (code, glyph) = match font.encode_char(chr) {
            Some(encoded) => encoded,
            None => continue,
        };
        let kern = prev.map_or(0, |prev| font.kerning(prev, glyph));
        let next = width + kern + font.advance(glyph);
        if let Some(max_width) = max_width {
            if next > max_width {
                tj.push_text(chunk);
                return (tj, width);
            }
        }
        if kern != 0 {
            tj.push_text(std::mem::take(&mut chunk));
            tj.0.push(ShowItem::Adjust(-kern));
        }
        chunk.extend_from_slice(&code);
        width = next;
        prev = Some(glyph);
    }
    tj.push_text(chunk);
    (tj, width)
}

/// Fit `text` into `budget`, replacing the end with an ellipsis if needed
pub fn truncate_run(font: &mut FontResource, text: &str, budget: i32) -> (ShowArray, i32) {
    let (full, width) = encode_and_kern(font, text, None);
    if width <= budget {
        return (full, width);
    }
    let (ellipsis, ellipsis_width) = encode_and_kern(font, ELLIPSIS, None);
    let (mut tj, width) = encode_and_kern(font, text, Some(budget.saturating_sub(ellipsis_width)));
    tj.append(ellipsis);
    (tj, width + ellipsis_width)
}

/// A line of wrapped text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The words on this line
    pub words: Vec<String>,
    /// The encoded line
    pub show: ShowArray,
    /// The width of the line
    pub width: i32,
}

/// Break `text` into lines at whitespace so that every line fits `budget`
///
/// A word that is wider than `budget` on its own gets a line of its own.
pub fn wrap_lines(font: &mut FontResource, text: &str, budget: i32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut words = text.split_whitespace().peekable();
    while let Some(first) = words.next() {
        let (mut show, mut width) = encode_and_kern(font, first, None);
        let mut line_words = vec![first.to_owned()];
        while let Some(word) = words.peek() {
            let (next, next_width) = encode_and_kern(font, &format!(" {}", word), None);
            if width + next_width > budget {
                break;
            }
            show.append(next);
            width += next_width;
            line_words.push((*word).to_owned());
            words.next();
        }
        lines.push(Line {
            words: line_words,
            show,
            width,
        });
    }
    lines
}

/// Convert a page space width to glyph space units at `size`
fn glyph_budget(width: f64, size: f64) -> i32 {
    (width / size * 1000.0) as i32
}

impl Canvas<'_> {
    fn show_at(&mut self, x: f64, y: f64, align: f64, text: &str) -> Result<(), LayoutError> {
        let (font, out, size) = self.selected()?;
        let (tj, width) = encode_and_kern(font, text, None);
        let x = x - f64::from(width) * size * 0.001 * align;
        writeln!(out, "BT")?;
        writeln!(out, "{} {} Td", Real(x), Real(y))?;
        tj.write_tj(out)?;
        writeln!(out, "ET")?;
        Ok(())
    }

    /// Show `text` with its start at `(x, y)`
    pub fn left(&mut self, x: f64, y: f64, text: &str) -> Result<(), LayoutError> {
        self.show_at(x, y, 0.0, text)
    }

    /// Show `text` with its end at `(x, y)`
    pub fn right(&mut self, x: f64, y: f64, text: &str) -> Result<(), LayoutError> {
        self.show_at(x, y, 1.0, text)
    }

    /// Show `text` centered on `(x, y)`
    pub fn center(&mut self, x: f64, y: f64, text: &str) -> Result<(), LayoutError> {
        self.show_at(x, y, 0.5, text)
    }

    /// Show the lines of `text`, using the leading set with [`Canvas::set_leading`]
    pub fn multiline(&mut self, x: f64, y: f64, text: &str) -> Result<(), LayoutError> {
        let (font, out, _) = self.selected()?;
        writeln!(out, "BT")?;
        writeln!(out, "{} {} Td", Real(x), Real(y))?;
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                writeln!(out, "T*")?;
            }
            let (tj, _) = encode_and_kern(font, line, None);
            tj.write_tj(out)?;
        }
        writeln!(out, "ET")?;
        Ok(())
    }

    /// Show `text` at `(x, y)`, cut off with an ellipsis if it is wider than `width`
    pub fn truncate(&mut self, x: f64, y: f64, width: f64, text: &str) -> Result<(), LayoutError> {
        let (font, out, size) = self.selected()?;
        let (tj, _) = truncate_run(font, text, glyph_budget(width, size));
        writeln!(out, "BT")?;
        writeln!(out, "{} {} Td", Real(x), Real(y))?;
        tj.write_tj(out)?;
        writeln!(out, "ET")?;
        Ok(())
    }

    /// Show `text` at `(x, y)`, wrapped into lines no wider than `margin`
    pub fn word_wrap(&mut self, x: f64, y: f64, margin: f64, text: &str) -> Result<(), LayoutError> {
        let (font, out, size) = self.selected()?;
        let lines = wrap_lines(font, text, glyph_budget(margin, size));
        writeln!(out, "BT")?;
        writeln!(out, "{} {} Td", Real(x), Real(y))?;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                writeln!(out, "T*")?;
            }
            line.show.write_tj(out)?;
        }
        writeln!(out, "ET")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{convert::TryFrom, sync::Arc};

    use pdf_create::{common::Rectangle, util::KeyGen};

    use super::{encode_and_kern, truncate_run, wrap_lines, ShowArray, ShowItem};
    use crate::{
        document::Document,
        error::LayoutError,
        font::{
            program::{FontKind, FontMetrics, FontProgram, GlyphId, Segment},
            Embedding, FontResource,
        },
    };

    /// Glyphs are 100 units wide, the ellipsis is 300, `A` `V` kern by -80
    struct Fixed;

    impl FontProgram for Fixed {
        fn postscript_name(&self) -> &str {
            "Fixed"
        }

        fn kind(&self) -> FontKind {
            FontKind::TrueType
        }

        fn data(&self) -> &[u8] {
            &[]
        }

        fn glyph_index(&self, chr: char) -> Option<GlyphId> {
            u16::try_from(u32::from(chr)).ok().map(GlyphId)
        }

        fn advance(&self, glyph: GlyphId) -> Option<f64> {
            match glyph.0 {
                0x2026 => Some(300.0),
                _ => Some(100.0),
            }
        }

        fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<f64> {
            match (left.0, right.0) {
                (0x41, 0x56) => Some(-80.0),
                _ => None,
            }
        }

        fn outline(&self, _glyph: GlyphId) -> Option<Vec<Segment>> {
            Some(Vec::new())
        }

        fn metrics(&self) -> FontMetrics {
            FontMetrics {
                ascent: 800,
                descent: -200,
                cap_height: 700,
                italic_angle: 0.0,
                bbox: Rectangle::default(),
                fixed_pitch: false,
            }
        }
    }

    fn font() -> FontResource {
        FontResource::new(KeyGen::new().next_key(), Arc::new(Fixed), Embedding::Type3)
    }

    fn tj(tj: &ShowArray) -> String {
        let mut out = Vec::new();
        tj.write_tj(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_kerning() {
        let mut font = font();
        let (show, width) = encode_and_kern(&mut font, "XAVX", None);
        assert_eq!(
            show.0,
            vec![
                ShowItem::Text(b"XA".to_vec()),
                ShowItem::Adjust(80),
                ShowItem::Text(b"VX".to_vec()),
            ]
        );
        assert_eq!(width, 320);
        assert_eq!(tj(&show), "[(XA)80(VX)] TJ\n");

        let (show, width) = encode_and_kern(&mut font, "", None);
        assert!(show.0.is_empty());
        assert_eq!(width, 0);
    }

    #[test]
    fn test_max_width() {
        let mut font = font();
        let (show, width) = encode_and_kern(&mut font, "ABCDE", Some(350));
        assert_eq!(show.text(), b"ABC");
        assert_eq!(width, 300);

        // the kern is applied before checking the width
        let (show, width) = encode_and_kern(&mut font, "AVA", Some(120));
        assert_eq!(show.text(), b"AV");
        assert_eq!(width, 120);

        let (show, width) = encode_and_kern(&mut font, "ABC", Some(50));
        assert!(show.0.is_empty());
        assert_eq!(width, 0);
    }

    #[test]
    fn test_truncate() {
        let mut font = font();
        let (show, width) = truncate_run(&mut font, "ABCDE", 500);
        assert_eq!(show.text(), b"ABCDE");
        assert_eq!(width, 500);

        let (show, width) = truncate_run(&mut font, "ABCDEFGH", 650);
        assert_eq!(show.text(), b"ABC\x85");
        assert_eq!(width, 600);
        assert!(width <= 650);

        // only the ellipsis fits
        let (show, width) = truncate_run(&mut font, "ABCDEFGH", 350);
        assert_eq!(show.0, vec![ShowItem::Text(vec![0x85])]);
        assert_eq!(width, 300);
    }

    #[test]
    fn test_truncate_negative_width() {
        let mut font = font();
        let (show, width) = truncate_run(&mut font, "ABC", i32::MIN);
        assert_eq!(show.0, vec![ShowItem::Text(vec![0x85])]);
        assert_eq!(width, 300);

        let mut doc = Document::new();
        let id = doc.add_font(Arc::new(Fixed), Embedding::Type3);
        let page = doc.new_page(100.0, 100.0);
        let mut canvas = doc.canvas(page).unwrap();
        canvas.set_font(id, 10.0).unwrap();
        canvas.truncate(10.0, 10.0, -1e12, "Hello").unwrap();
        let contents = doc.page(page).unwrap().contents().to_vec();
        assert!(contents.ends_with(b"BT\n10 10 Td\n[(\\205)] TJ\nET\n"));
    }

    #[test]
    fn test_wrap() {
        let mut font = font();
        let text = "one two three  four\nfive extraordinarily";
        let lines = wrap_lines(&mut font, text, 900);
        let widths: Vec<i32> = lines.iter().map(|l| l.width).collect();
        assert_eq!(widths, [700, 500, 900, 1500]);
        assert_eq!(lines[2].show.text(), b"four five");
        for line in &lines {
            assert!(line.width <= 900 || line.words.len() == 1);
        }
        let words: Vec<String> = lines.into_iter().flat_map(|l| l.words).collect();
        assert_eq!(words, ["one", "two", "three", "four", "five", "extraordinarily"]);
    }

    #[test]
    fn test_canvas_text() {
        let mut doc = Document::new();
        let font = doc.add_font(Arc::new(Fixed), Embedding::Type3);
        let page = doc.new_page(300.0, 300.0);
        let mut canvas = doc.canvas(page).unwrap();
        assert!(matches!(canvas.left(0.0, 0.0, "A"), Err(LayoutError::NoFont)));

        canvas.set_font(font, 10.0).unwrap();
        canvas.set_leading(12.0).unwrap();
        canvas.right(100.0, 50.0, "AB").unwrap();
        canvas.center(100.0, 30.0, "AB").unwrap();
        canvas.multiline(10.0, 200.0, "A\nB").unwrap();
        canvas.word_wrap(10.0, 100.0, 2.5, "AB AB AB").unwrap();
        canvas.truncate(10.0, 80.0, 5.0, "ABCDEFG").unwrap();

        let contents = String::from_utf8(doc.page(page).unwrap().contents().to_vec()).unwrap();
        assert_eq!(
            contents,
            concat!(
                "/F0 10 Tf\n12 TL\n",
                "BT\n98 50 Td\n[(AB)] TJ\nET\n",
                "BT\n99 30 Td\n[(AB)] TJ\nET\n",
                "BT\n10 200 Td\n[(A)] TJ\nT*\n[(B)] TJ\nET\n",
                "BT\n10 100 Td\n[(AB)] TJ\nT*\n[(AB)] TJ\nT*\n[(AB)] TJ\nET\n",
                "BT\n10 80 Td\n[(AB)(\\205)] TJ\nET\n",
            )
        );
    }
}
