//! Mapping between the centered Cartesian frame used by the search and the
//! pixel indices of a padded grid.
//!
//! The Cartesian origin sits at the bottom-center of the unpadded image, with
//! `y` growing upwards. Each pixel is taken to be located at its center, so
//! the origin lies on the boundary between pixels in both axes.
use core::fmt;
use std::ops::{Add, Sub};

use num_traits::ToPrimitive;

/// A position in the centered Cartesian frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Straight-line distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Largest per-axis offset to another point.
    pub fn chebyshev_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Point {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A pixel index. Signed so that positions off the grid can be represented
/// and rejected by an explicit bounds check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel {
    pub row: i64,
    pub col: i64,
}

impl Pixel {
    pub fn new(row: i64, col: i64) -> Pixel {
        Pixel { row, col }
    }

    pub fn offset(&self, d_row: i64, d_col: i64) -> Pixel {
        Pixel::new(self.row + d_row, self.col + d_col)
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// Dimensions of a padded grid. `height` and `width` include the padding,
/// which is assumed equal on all four sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    pub height: usize,
    pub width: usize,
    pub padding: usize,
}

impl Frame {
    pub fn new(height: usize, width: usize, padding: usize) -> Frame {
        Frame {
            height,
            width,
            padding,
        }
    }

    /// Origin of the Cartesian frame in pixel space as `(col, row)`.
    pub fn origin(&self) -> (f64, f64) {
        (
            (self.width as f64 - 1.0) / 2.0,
            self.height as f64 - self.padding as f64 - 0.5,
        )
    }

    /// Quantizes a Cartesian point to the nearest pixel, rounding halves away
    /// from zero. The result may lie outside the grid, and points too far
    /// away for `i64` saturate.
    ///
    /// Integer points on grids of even width sit exactly on `.5` ties, so a
    /// round-half-to-even mapping would put some of them one pixel over;
    /// rounding away from zero keeps integer points on distinct pixels.
    pub fn to_pixel(&self, point: Point) -> Pixel {
        let (origin_col, origin_row) = self.origin();
        Pixel::new(
            (origin_row - point.y).round() as i64,
            (point.x + origin_col).round() as i64,
        )
    }

    /// Cartesian position of a pixel center.
    pub fn to_cartesian(&self, pixel: Pixel) -> Point {
        let (origin_col, origin_row) = self.origin();
        Point::new(
            pixel.col as f64 - origin_col,
            origin_row - pixel.row as f64,
        )
    }

    pub fn contains(&self, pixel: Pixel) -> bool {
        self.index(pixel).is_some()
    }

    /// Row-major buffer index of an in-bounds pixel.
    pub fn index(&self, pixel: Pixel) -> Option<usize> {
        let row = pixel.row.to_usize()?;
        let col = pixel.col.to_usize()?;
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }
}

/// Converts a Cartesian point to a pixel of a `height` x `width` grid with
/// `padding` cells on every side. Lossy: the point is rounded to the nearest
/// cell.
pub fn to_pixel(point: Point, height: usize, width: usize, padding: usize) -> Pixel {
    Frame::new(height, width, padding).to_pixel(point)
}

/// Inverse of [to_pixel] for pixel centers.
pub fn to_cartesian(pixel: Pixel, height: usize, width: usize, padding: usize) -> Point {
    Frame::new(height, width, padding).to_cartesian(pixel)
}
