//! Glyph outlines as Type 3 glyph programs
//!
//! The glyph programs are drawn with the Y axis pointing down, the font
//! matrix of the Type 3 font flips it back.

use std::io::{self, Write};

use pdf_create::{
    common::{Point, Rectangle},
    util::Real,
};

use super::program::Segment;

/// A path construction operator in glyph space
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathOp {
    /// `m`
    MoveTo(Point<f64>),
    /// `l`
    LineTo(Point<f64>),
    /// `c`
    CurveTo(Point<f64>, Point<f64>, Point<f64>),
}

/// The drawing procedure for a single glyph
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphProgram {
    /// The horizontal advance
    pub width: i32,
    /// The bounding box of all points, `None` for an empty outline
    pub bbox: Option<Rectangle<f64>>,
    /// The path
    pub ops: Vec<PathOp>,
}

fn flip(p: Point<f64>) -> Point<f64> {
    Point { x: p.x, y: -p.y }
}

/// Raise a quadratic curve from `p` over `c` to `e` to a cubic curve
pub fn elevate(p: Point<f64>, c: Point<f64>, e: Point<f64>) -> [Point<f64>; 3] {
    let c1 = Point {
        x: p.x + 2.0 / 3.0 * (c.x - p.x),
        y: p.y + 2.0 / 3.0 * (c.y - p.y),
    };
    let c2 = Point {
        x: e.x + 2.0 / 3.0 * (c.x - e.x),
        y: e.y + 2.0 / 3.0 * (c.y - e.y),
    };
    [c1, c2, e]
}

#[derive(Default)]
struct BBoxBuilder {
    bbox: Option<Rectangle<f64>>,
}

impl BBoxBuilder {
    fn add(&mut self, p: Point<f64>) {
        self.bbox = Some(match self.bbox {
            None => Rectangle { ll: p, ur: p },
            Some(r) => Rectangle {
                ll: Point {
                    x: r.ll.x.min(p.x),
                    y: r.ll.y.min(p.y),
                },
                ur: Point {
                    x: r.ur.x.max(p.x),
                    y: r.ur.y.max(p.y),
                },
            },
        });
    }
}

/// Convert an outline into a glyph program
pub fn transcribe(width: i32, segments: &[Segment]) -> GlyphProgram {
    let mut bbox = BBoxBuilder::default();
    let mut ops = Vec::with_capacity(segments.len());
    let mut current = Point { x: 0.0, y: 0.0 };

    for segment in segments {
        match *segment {
            Segment::MoveTo(p) => {
                let p = flip(p);
                bbox.add(p);
                ops.push(PathOp::MoveTo(p));
                current = p;
            }
            Segment::LineTo(p) => {
                let p = flip(p);
                bbox.add(p);
                ops.push(PathOp::LineTo(p));
                current = p;
            }
            Segment::QuadTo(c, e) => {
                let (c, e) = (flip(c), flip(e));
                bbox.add(c);
                bbox.add(e);
                let [c1, c2, e] = elevate(current, c, e);
                ops.push(PathOp::CurveTo(c1, c2, e));
                current = e;
            }
            Segment::CurveTo(c1, c2, e) => {
                let (c1, c2, e) = (flip(c1), flip(c2), flip(e));
                bbox.add(c1);
                bbox.add(c2);
                bbox.add(e);
                ops.push(PathOp::CurveTo(c1, c2, e));
                current = e;
            }
        }
    }

    GlyphProgram {
        width,
        bbox: bbox.bbox,
        ops,
    }
}

impl GlyphProgram {
    /// The bounding box, rounded outwards to integers
    pub fn int_bbox(&self) -> Option<Rectangle<i32>> {
        self.bbox.map(|r| Rectangle {
            ll: Point {
                x: r.ll.x.floor() as i32,
                y: r.ll.y.floor() as i32,
            },
            ur: Point {
                x: r.ur.x.ceil() as i32,
                y: r.ur.y.ceil() as i32,
            },
        })
    }

    /// Write the content stream of the glyph
    pub fn write_content<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match &self.bbox {
            Some(r) => writeln!(
                w,
                "{} 0 {} {} {} {} d1",
                self.width,
                Real(r.ll.x),
                Real(r.ll.y),
                Real(r.ur.x),
                Real(r.ur.y)
            )?,
            None => writeln!(w, "{} 0 0 0 0 0 d1", self.width)?,
        }
        for op in &self.ops {
            match op {
                PathOp::MoveTo(p) => writeln!(w, "{} {} m", Real(p.x), Real(p.y))?,
                PathOp::LineTo(p) => writeln!(w, "{} {} l", Real(p.x), Real(p.y))?,
                PathOp::CurveTo(c1, c2, p) => writeln!(
                    w,
                    "{} {} {} {} {} {} c",
                    Real(c1.x),
                    Real(c1.y),
                    Real(c2.x),
                    Real(c2.y),
                    Real(p.x),
                    Real(p.y)
                )?,
            }
        }
        if !self.ops.is_empty() {
            writeln!(w, "f")?;
        }
        Ok(())
    }
}
