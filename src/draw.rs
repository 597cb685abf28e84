//! Path construction, painting and color operators
//!
//! Components of colors are in the range `0.0..=1.0`, for gray values
//! `0.0` is black.

use std::io::{self, Write};

use pdf_create::util::Real;

use crate::page::Canvas;

impl Canvas<'_> {
    fn op(&mut self, operands: &[f64], operator: &str) -> io::Result<()> {
        let out = &mut self.page.contents;
        for value in operands {
            write!(out, "{} ", Real(*value))?;
        }
        writeln!(out, "{}", operator)
    }

    /// Start a new subpath at `(x, y)`
    pub fn move_to(&mut self, x: f64, y: f64) -> io::Result<()> {
        self.op(&[x, y], "m")
    }

    /// Append a straight line to the current path
    pub fn line_to(&mut self, x: f64, y: f64) -> io::Result<()> {
        self.op(&[x, y], "l")
    }

    /// Append a cubic Bézier curve to the current path
    pub fn curve_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> io::Result<()> {
        self.op(&[x1, y1, x2, y2, x3, y3], "c")
    }

    /// Close the current subpath with a line to its start
    pub fn close_path(&mut self) -> io::Result<()> {
        self.op(&[], "h")
    }

    /// Stroke the current path
    pub fn stroke(&mut self) -> io::Result<()> {
        self.op(&[], "S")
    }

    /// Fill the current path (nonzero winding)
    pub fn fill(&mut self) -> io::Result<()> {
        self.op(&[], "f")
    }

    /// Fill, then stroke the current path
    pub fn fill_and_stroke(&mut self) -> io::Result<()> {
        self.op(&[], "B")
    }

    /// Set the width of stroked lines
    pub fn set_line_width(&mut self, width: f64) -> io::Result<()> {
        self.op(&[width], "w")
    }

    pub fn fill_gray(&mut self, gray: f64) -> io::Result<()> {
        self.op(&[gray], "g")
    }

    pub fn stroke_gray(&mut self, gray: f64) -> io::Result<()> {
        self.op(&[gray], "G")
    }

    pub fn fill_rgb(&mut self, r: f64, g: f64, b: f64) -> io::Result<()> {
        self.op(&[r, g, b], "rg")
    }

    pub fn stroke_rgb(&mut self, r: f64, g: f64, b: f64) -> io::Result<()> {
        self.op(&[r, g, b], "RG")
    }

    pub fn fill_cmyk(&mut self, c: f64, m: f64, y: f64, k: f64) -> io::Result<()> {
        self.op(&[c, m, y, k], "k")
    }

    pub fn stroke_cmyk(&mut self, c: f64, m: f64, y: f64, k: f64) -> io::Result<()> {
        self.op(&[c, m, y, k], "K")
    }
}
