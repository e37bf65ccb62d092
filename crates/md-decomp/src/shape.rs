//! Edge runs and midline extents of a binary structuring element.

use md_core::{Error, PixelBuffer, Result};

use crate::partition::{CubicFactor, Partition, SparseFactor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub row: isize,
    pub col: isize,
}

impl Coordinate {
    pub fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }
}

/// Maximal foreground run along one row or column.
///
/// `finish` is one step past the last foreground pixel in the traversal
/// direction, so it may lie just outside the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLength {
    pub start: Coordinate,
    pub finish: Coordinate,
}

impl RunLength {
    pub fn len(&self) -> usize {
        ((self.finish.row - self.start.row).abs() + (self.finish.col - self.start.col).abs())
            as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixels of the run in traversal order.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> {
        let start = self.start;
        let dr = (self.finish.row - start.row).signum();
        let dc = (self.finish.col - start.col).signum();
        (0..self.len() as isize)
            .map(move |k| Coordinate::new(start.row + k * dr, start.col + k * dc))
    }
}

/// Side of the element a scan starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Rows top to bottom, each left to right.
    Top,
    /// Columns left to right, each top to bottom.
    Left,
    /// Rows bottom to top, each right to left.
    Bottom,
    /// Columns right to left, each bottom to top.
    Right,
}

impl Edge {
    /// Order in which runs are peeled off the residual.
    pub const PEEL_ORDER: [Edge; 4] = [Edge::Top, Edge::Left, Edge::Bottom, Edge::Right];

    fn is_forward(self) -> bool {
        matches!(self, Edge::Top | Edge::Left)
    }

    fn along_rows(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRuns {
    pub top: RunLength,
    pub left: RunLength,
    pub bottom: RunLength,
    pub right: RunLength,
}

#[inline]
fn is_foreground(se: &PixelBuffer, c: Coordinate) -> bool {
    se.get_or(c.col, c.row, 0) != 0
}

/// First maximal foreground run met when scanning from `edge`.
///
/// Runs never wrap from one row or column into the next.
pub fn scan_run(se: &PixelBuffer, edge: Edge) -> Option<RunLength> {
    let (rows, cols) = (se.height() as isize, se.width() as isize);
    let (lines, len) = if edge.along_rows() {
        (rows, cols)
    } else {
        (cols, rows)
    };
    let step = if edge.is_forward() { 1 } else { -1 };
    let at = |line: isize, i: isize| {
        if edge.along_rows() {
            Coordinate::new(line, i)
        } else {
            Coordinate::new(i, line)
        }
    };

    for k in 0..lines {
        let line = if edge.is_forward() { k } else { lines - 1 - k };
        let mut i = if edge.is_forward() { 0 } else { len - 1 };
        while (0..len).contains(&i) {
            if is_foreground(se, at(line, i)) {
                let start = i;
                while (0..len).contains(&i) && is_foreground(se, at(line, i)) {
                    i += step;
                }
                return Some(RunLength {
                    start: at(line, start),
                    finish: at(line, i),
                });
            }
            i += step;
        }
    }
    None
}

/// Clears every pixel of `run` in `se`.
pub fn clear_run(se: &mut PixelBuffer, run: &RunLength) {
    for c in run.cells() {
        if c.row < 0 || c.col < 0 {
            continue;
        }
        if let Some(px) = se.get_mut(c.col as usize, c.row as usize) {
            *px = 0;
        }
    }
}

/// Reads the shape of one (residual) structuring element.
#[derive(Debug, Clone, Copy)]
pub struct ShapeAnalyzer<'a> {
    se: &'a PixelBuffer,
}

impl<'a> ShapeAnalyzer<'a> {
    /// Accepts single-channel elements with odd dimensions and at least one
    /// foreground (non-zero) pixel.
    pub fn new(se: &'a PixelBuffer) -> Result<Self> {
        se.ensure_single_channel()?;
        if se.width() % 2 == 0 || se.height() % 2 == 0 {
            return Err(Error::EvenShape {
                width: se.width(),
                height: se.height(),
            });
        }
        if se.foreground_count() == 0 {
            return Err(Error::EmptyShape);
        }
        Ok(Self { se })
    }

    fn centre(&self) -> Coordinate {
        Coordinate::new((self.se.height() / 2) as isize, (self.se.width() / 2) as isize)
    }

    fn mirror(&self, c: Coordinate) -> Coordinate {
        Coordinate::new(
            self.se.height() as isize - 1 - c.row,
            self.se.width() as isize - 1 - c.col,
        )
    }

    pub fn edge_runs(&self) -> Result<EdgeRuns> {
        let scan = |edge| scan_run(self.se, edge).ok_or(Error::EmptyShape);
        Ok(EdgeRuns {
            top: scan(Edge::Top)?,
            left: scan(Edge::Left)?,
            bottom: scan(Edge::Bottom)?,
            right: scan(Edge::Right)?,
        })
    }

    /// Opposite runs must have equal length, mirror each other through the
    /// centre, and be centred on the corresponding midline.
    fn check_symmetry(&self, runs: &EdgeRuns) -> Result<()> {
        let c = self.centre();
        let EdgeRuns {
            top,
            left,
            bottom,
            right,
        } = runs;

        let vertical_ok = top.len() == bottom.len()
            && top.start.col + top.finish.col - 1 == 2 * c.col
            && bottom.start == self.mirror(top.start);
        let horizontal_ok = left.len() == right.len()
            && left.start.row + left.finish.row - 1 == 2 * c.row
            && right.start == self.mirror(left.start);

        if vertical_ok && horizontal_ok {
            Ok(())
        } else {
            Err(Error::NonSymmetricShape {
                top: top.len(),
                bottom: bottom.len(),
                left: left.len(),
                right: right.len(),
            })
        }
    }

    /// Distances from the centre to the first foreground pixel met on the
    /// vertical midline (from the top) and the horizontal midline (from the
    /// left), as `(y_extent, x_extent)`.
    pub fn midline_extents(&self) -> Result<(usize, usize)> {
        let c = self.centre();
        let y = (0..=c.row)
            .find(|&row| is_foreground(self.se, Coordinate::new(row, c.col)))
            .ok_or(Error::EmptyShape)?;
        let x = (0..=c.col)
            .find(|&col| is_foreground(self.se, Coordinate::new(c.row, col)))
            .ok_or(Error::EmptyShape)?;
        Ok(((c.row - y) as usize, (c.col - x) as usize))
    }

    /// Largest partition whose arms reach the element's boundary: a
    /// `top_len x left_len` rectangle replayed at the four sparse taps.
    pub fn analyze(&self) -> Result<Partition> {
        let runs = self.edge_runs()?;
        self.check_symmetry(&runs)?;
        let (y_extent, x_extent) = self.midline_extents()?;

        let half_w = (runs.top.len() - 1) / 2;
        let half_h = (runs.left.len() - 1) / 2;
        let sy = y_extent.saturating_sub(half_h);
        let sx = x_extent.saturating_sub(half_w);

        Ok(Partition {
            cubic: CubicFactor {
                width: runs.top.len(),
                height: runs.left.len(),
            },
            sparse: SparseFactor {
                top: sy,
                bottom: sy,
                left: sx,
                right: sx,
            },
        })
    }
}
