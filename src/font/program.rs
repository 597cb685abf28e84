//! Reading font programs
//!
//! All values returned by a [`FontProgram`] are scaled to 1000 units per em.

use std::{collections::HashMap, ops::Range};

use pdf_create::common::{Point, Rectangle};
use ttf_parser::{
    gpos::{PairAdjustment, PositioningSubtable},
    name_id, Face, OutlineBuilder, RawFaceTables, Tag,
};

pub use ttf_parser::GlyphId;

use crate::error::FontError;

/// The outline format of a font program
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FontKind {
    /// TrueType outlines (`glyf`)
    TrueType,
    /// OpenType with CFF outlines
    OpenTypeCff,
}

/// One segment of a glyph outline, with Y pointing up
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    /// Start a new contour
    MoveTo(Point<f64>),
    /// A straight line to the point
    LineTo(Point<f64>),
    /// A quadratic curve with a control point and end point
    QuadTo(Point<f64>, Point<f64>),
    /// A cubic curve with two control points and an end point
    CurveTo(Point<f64>, Point<f64>, Point<f64>),
}

/// Global metrics of a font
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    /// Height above the baseline
    pub ascent: i32,
    /// Depth below the baseline (negative)
    pub descent: i32,
    /// Height of flat capital letters
    pub cap_height: i32,
    /// Degrees counterclockwise from the vertical
    pub italic_angle: f64,
    /// Union of all glyph boxes
    pub bbox: Rectangle<i32>,
    /// Whether all glyphs have the same advance
    pub fixed_pitch: bool,
}

/// The queries needed to embed a font and lay out text
pub trait FontProgram {
    /// The PostScript name of the font
    fn postscript_name(&self) -> &str;

    /// The outline format
    fn kind(&self) -> FontKind;

    /// The binary font file
    fn data(&self) -> &[u8];

    /// Map a character to a glyph
    fn glyph_index(&self, chr: char) -> Option<GlyphId>;

    /// The horizontal advance of a glyph
    fn advance(&self, glyph: GlyphId) -> Option<f64>;

    /// The kerning adjustment between two glyphs, negative values move
    /// the right glyph closer to the left one
    fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<f64>;

    /// The outline of a glyph
    fn outline(&self, glyph: GlyphId) -> Option<Vec<Segment>>;

    /// Global font metrics
    fn metrics(&self) -> FontMetrics;
}

/// A TrueType or OpenType font file, read with `ttf-parser`
///
/// The character map, advances and metrics are read once when the file is
/// parsed. Outlines and kerning are looked up in the file on demand.
#[derive(Debug, Clone)]
pub struct TrueTypeProgram {
    data: Vec<u8>,
    name: String,
    kind: FontKind,
    scale: f64,
    glyphs: HashMap<char, GlyphId>,
    advances: Vec<u16>,
    metrics: FontMetrics,
    kerning: KerningTables,
}

/// Location of the tables needed for pair kerning
#[derive(Debug, Clone)]
struct KerningTables {
    head: Range<usize>,
    hhea: Range<usize>,
    maxp: Range<usize>,
    kern: Option<Range<usize>>,
    gpos: Option<Range<usize>>,
}

impl TrueTypeProgram {
    /// Check and parse a font file
    pub fn parse(data: Vec<u8>) -> Result<Self, FontError> {
        if data.len() < 4 {
            return Err(FontError::TooSmall);
        }
        let kind = match &data[..4] {
            b"true" | b"\x00\x01\x00\x00" => FontKind::TrueType,
            b"OTTO" => FontKind::OpenTypeCff,
            _ => return Err(FontError::UnrecognizedFormat),
        };
        let face = Face::parse(&data, 0)?;
        let name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == name_id::POST_SCRIPT_NAME)
            .find_map(|name| name.to_string())
            .ok_or(FontError::MissingName)?;
        let scale = 1000.0 / f64::from(face.units_per_em());
        let glyphs = unicode_glyphs(&face);
        let advances: Vec<u16> = (0..face.number_of_glyphs())
            .map(|id| face.glyph_hor_advance(GlyphId(id)).unwrap_or(0))
            .collect();
        let metrics = read_metrics(&face, scale);
        let kerning = KerningTables {
            head: table_range(&face, b"head").unwrap_or_default(),
            hhea: table_range(&face, b"hhea").unwrap_or_default(),
            maxp: table_range(&face, b"maxp").unwrap_or_default(),
            kern: table_range(&face, b"kern"),
            gpos: table_range(&face, b"GPOS"),
        };
        log::debug!(
            "Parsed font {} ({:?}, {} glyphs, {} mapped)",
            name,
            kind,
            advances.len(),
            glyphs.len()
        );
        Ok(Self {
            data,
            name,
            kind,
            scale,
            glyphs,
            advances,
            metrics,
            kerning,
        })
    }

    /// A face with just the tables used for kerning
    fn kerning_face(&self) -> Option<Face<'_>> {
        let tables = &self.kerning;
        if tables.kern.is_none() && tables.gpos.is_none() {
            return None;
        }
        let data = self.data.as_slice();
        let table = |range: &Range<usize>| data.get(range.clone());
        let raw = RawFaceTables {
            head: table(&tables.head)?,
            hhea: table(&tables.hhea)?,
            maxp: table(&tables.maxp)?,
            kern: tables.kern.as_ref().and_then(table),
            gpos: tables.gpos.as_ref().and_then(table),
            ..RawFaceTables::default()
        };
        Face::from_raw_tables(raw).ok()
    }
}

/// The byte range of a table in the font file
fn table_range(face: &Face<'_>, tag: &[u8; 4]) -> Option<Range<usize>> {
    let tag = Tag::from_bytes(tag);
    let record = face
        .raw_face()
        .table_records
        .into_iter()
        .find(|record| record.tag == tag)?;
    let start = record.offset as usize;
    Some(start..start.checked_add(record.length as usize)?)
}

/// Every character of the unicode `cmap` subtables, the first subtable wins
fn unicode_glyphs(face: &Face<'_>) -> HashMap<char, GlyphId> {
    let mut glyphs = HashMap::new();
    let subtables = match face.tables().cmap {
        Some(cmap) => cmap.subtables,
        None => return glyphs,
    };
    for subtable in subtables.into_iter().filter(|s| s.is_unicode()) {
        subtable.codepoints(|code| {
            let chr = match std::char::from_u32(code) {
                Some(chr) => chr,
                None => return,
            };
            if let Some(glyph) = subtable.glyph_index(code) {
                glyphs.entry(chr).or_insert(glyph);
            }
        });
    }
    glyphs
}

fn scale_i16(value: i16, scale: f64) -> i32 {
    (f64::from(value) * scale).round() as i32
}

fn read_metrics(face: &Face<'_>, scale: f64) -> FontMetrics {
    let bbox = face.global_bounding_box();
    let ascent = scale_i16(face.ascender(), scale);
    FontMetrics {
        ascent,
        descent: scale_i16(face.descender(), scale),
        cap_height: face
            .capital_height()
            .map(|value| scale_i16(value, scale))
            .unwrap_or(ascent),
        italic_angle: face
            .tables()
            .post
            .as_ref()
            .map(|post| f64::from(post.italic_angle))
            .unwrap_or(0.0),
        bbox: Rectangle {
            ll: Point {
                x: scale_i16(bbox.x_min, scale),
                y: scale_i16(bbox.y_min, scale),
            },
            ur: Point {
                x: scale_i16(bbox.x_max, scale),
                y: scale_i16(bbox.y_max, scale),
            },
        },
        fixed_pitch: face.is_monospaced(),
    }
}

/// Sum of the horizontal kerning in the legacy `kern` table
fn kern_table(face: &Face<'_>, left: GlyphId, right: GlyphId) -> Option<i32> {
    let kern = face.tables().kern?;
    kern.subtables
        .into_iter()
        .filter(|s| s.horizontal && !s.has_cross_stream && !s.has_state_machine)
        .filter_map(|s| s.glyphs_kerning(left, right))
        .map(i32::from)
        .reduce(|a, b| a + b)
}

/// The first pair adjustment in `GPOS` that covers the pair
fn gpos_pair(face: &Face<'_>, first: GlyphId, second: GlyphId) -> Option<i32> {
    let gpos = face.tables().gpos?;
    for lookup in gpos.lookups {
        for subtable in lookup.subtables.into_iter::<PositioningSubtable>() {
            if let PositioningSubtable::Pair(pair) = subtable {
                if let Some(value) = pair_adjustment(&pair, first, second) {
                    return Some(value);
                }
            }
        }
    }
    None
}

fn pair_adjustment(pair: &PairAdjustment<'_>, first: GlyphId, second: GlyphId) -> Option<i32> {
    let index = pair.coverage().get(first)?;
    let (record, _) = match pair {
        PairAdjustment::Format1 { sets, .. } => sets.get(index)?.get(second)?,
        PairAdjustment::Format2 {
            classes, matrix, ..
        } => matrix.get((classes.0.get(first), classes.1.get(second)))?,
    };
    Some(i32::from(record.x_advance))
}

struct SegmentCollector {
    scale: f64,
    segments: Vec<Segment>,
}

impl SegmentCollector {
    fn point(&self, x: f32, y: f32) -> Point<f64> {
        Point {
            x: f64::from(x) * self.scale,
            y: f64::from(y) * self.scale,
        }
    }
}

impl OutlineBuilder for SegmentCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.segments.push(Segment::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.segments.push(Segment::LineTo(p));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let c = self.point(x1, y1);
        let p = self.point(x, y);
        self.segments.push(Segment::QuadTo(c, p));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.point(x1, y1);
        let c2 = self.point(x2, y2);
        let p = self.point(x, y);
        self.segments.push(Segment::CurveTo(c1, c2, p));
    }

    fn close(&mut self) {
        // contours are closed by the fill operator
    }
}

impl FontProgram for TrueTypeProgram {
    fn postscript_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FontKind {
        self.kind
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn glyph_index(&self, chr: char) -> Option<GlyphId> {
        self.glyphs.get(&chr).copied()
    }

    fn advance(&self, glyph: GlyphId) -> Option<f64> {
        let advance = self.advances.get(usize::from(glyph.0))?;
        Some(f64::from(*advance) * self.scale)
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> Option<f64> {
        let face = self.kerning_face()?;
        let value = kern_table(&face, left, right).or_else(|| gpos_pair(&face, left, right))?;
        Some(f64::from(value) * self.scale)
    }

    fn outline(&self, glyph: GlyphId) -> Option<Vec<Segment>> {
        // once per glyph, the font resource keeps the glyph programs
        let face = Face::parse(&self.data, 0).ok()?;
        let mut collector = SegmentCollector {
            scale: self.scale,
            segments: Vec::new(),
        };
        // glyphs without contours (e.g. space) have an empty outline
        face.outline_glyph(glyph, &mut collector);
        Some(collector.segments)
    }

    fn metrics(&self) -> FontMetrics {
        self.metrics.clone()
    }
}
