use core::fmt;
use std::ops::Range;

use image::{GenericImageView, GrayImage, Luma, Pixel as _};
use log::debug;

use crate::config::GridConfig;
use crate::error::{Error, Result};
use crate::transform::{Frame, Pixel, Point};

/// Traversability of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Free,
    Blocked,
}

impl Cell {
    pub fn is_blocked(self) -> bool {
        self == Cell::Blocked
    }

    pub fn is_free(self) -> bool {
        self == Cell::Free
    }
}

/// [OccupancyGrid] holds the obstacle truth used by the search: a row-major
/// buffer of [Cell]s whose dimensions include a free border of `padding`
/// cells on every side. It is never written to by path visualization, see
/// [Overlay](crate::Overlay) for that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    padding: usize,
}

impl OccupancyGrid {
    /// Creates a `width` x `height` grid filled with `cell`.
    pub fn new(width: usize, height: usize, cell: Cell) -> Result<OccupancyGrid> {
        check_dimensions(width, height)?;
        Ok(OccupancyGrid {
            cells: vec![cell; width * height],
            width,
            height,
            padding: 0,
        })
    }

    /// Wraps a row-major cell buffer.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<OccupancyGrid> {
        check_dimensions(width, height)?;
        if cells.len() != width * height {
            return Err(Error::MalformedInput {
                width,
                height,
                reason: "cell count does not match dimensions",
            });
        }
        Ok(OccupancyGrid {
            cells,
            width,
            height,
            padding: 0,
        })
    }

    /// Thresholds an image into free and blocked cells. A pixel is blocked
    /// when the mean of its RGB channels is below `threshold`; alpha is
    /// ignored and grayscale pixels count as equal RGB channels.
    pub fn from_image<I>(image: &I, threshold: u8) -> Result<OccupancyGrid>
    where
        I: GenericImageView,
        I::Pixel: image::Pixel<Subpixel = u8>,
    {
        let (width, height) = image.dimensions();
        let (width, height) = (width as usize, height as usize);
        check_dimensions(width, height)?;
        // Comparing channel sums avoids the division: mean < t <=> sum < 3t.
        let limit = 3 * threshold as u16;
        let mut cells = vec![Cell::Free; width * height];
        for (x, y, pixel) in image.pixels() {
            let sum: u16 = pixel.to_rgb().channels().iter().map(|&c| c as u16).sum();
            if sum < limit {
                cells[y as usize * width + x as usize] = Cell::Blocked;
            }
        }
        Ok(OccupancyGrid {
            cells,
            width,
            height,
            padding: 0,
        })
    }

    /// Thresholds an image and pads the result, as configured.
    pub fn build<I>(image: &I, config: &GridConfig) -> Result<OccupancyGrid>
    where
        I: GenericImageView,
        I::Pixel: image::Pixel<Subpixel = u8>,
    {
        let grid = OccupancyGrid::from_image(image, config.threshold)?.pad(config.padding);
        debug!(
            "Built {}x{} occupancy grid ({} blocked cells)",
            grid.width,
            grid.height,
            grid.blocked_count()
        );
        Ok(grid)
    }

    /// Returns a copy surrounded by `padding` free cells on each side. The
    /// existing content keeps its relative alignment; padding accumulates.
    pub fn pad(&self, padding: usize) -> OccupancyGrid {
        let width = self.width + 2 * padding;
        let height = self.height + 2 * padding;
        let mut cells = vec![Cell::Free; width * height];
        for (row, src) in self.cells.chunks_exact(self.width).enumerate() {
            let start = (row + padding) * width + padding;
            cells[start..start + self.width].copy_from_slice(src);
        }
        OccupancyGrid {
            cells,
            width,
            height,
            padding: self.padding + padding,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn padding(&self) -> usize {
        self.padding
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.height, self.width, self.padding)
    }

    pub fn get(&self, pixel: Pixel) -> Option<Cell> {
        self.frame().index(pixel).map(|ix| self.cells[ix])
    }

    /// Overwrites a single cell of the obstacle truth.
    pub fn set_cell(&mut self, pixel: Pixel, cell: Cell) -> Result<()> {
        let ix = self.frame().index(pixel).ok_or(Error::OutOfBounds {
            row: pixel.row,
            col: pixel.col,
        })?;
        self.cells[ix] = cell;
        Ok(())
    }

    /// Sets every cell in the given row and column ranges, clipped to the grid.
    /// Returns how many cells changed.
    pub fn fill(&mut self, rows: Range<i64>, cols: Range<i64>, cell: Cell) -> usize {
        let rows = rows.start.max(0)..rows.end.min(self.height as i64);
        let cols = cols.start.max(0) as usize..cols.end.min(self.width as i64).max(0) as usize;
        if cols.is_empty() {
            return 0;
        }
        let mut changed = 0;
        for row in rows {
            let base = row as usize * self.width;
            for c in &mut self.cells[base + cols.start..base + cols.end] {
                if *c != cell {
                    *c = cell;
                    changed += 1;
                }
            }
        }
        changed
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_blocked()).count()
    }

    /// Checks whether the square of side `2 * clearance + 1` centered on the
    /// pixel lies entirely inside the grid and holds only free cells.
    /// Pixels far off the grid and radii too large to represent are never clear.
    pub fn is_clear(&self, center: Pixel, clearance: usize) -> bool {
        let Ok(r) = i64::try_from(clearance) else {
            return false;
        };
        let bounds = (
            center.row.checked_sub(r),
            center.col.checked_sub(r),
            center.row.checked_add(r),
            center.col.checked_add(r),
        );
        let (Some(top), Some(left), Some(bottom), Some(right)) = bounds else {
            return false;
        };
        if top < 0 || left < 0 || bottom >= self.height as i64 || right >= self.width as i64 {
            return false;
        }
        let (left, right) = (left as usize, right as usize);
        (top as usize..=bottom as usize).all(|row| {
            let base = row * self.width;
            self.cells[base + left..=base + right]
                .iter()
                .all(|c| c.is_free())
        })
    }

    /// Whether a Cartesian position keeps `clearance` cells from every
    /// obstacle and from the grid edge.
    pub fn is_valid(&self, point: Point, clearance: usize) -> bool {
        point.is_finite() && self.is_clear(self.frame().to_pixel(point), clearance)
    }

    /// Monochrome rendering of the unpadded interior, free cells white. Feeding
    /// it back through [build](Self::build) with the same config reproduces
    /// this grid.
    pub fn to_image(&self) -> GrayImage {
        let p = self.padding;
        GrayImage::from_fn(
            (self.width - 2 * p) as u32,
            (self.height - 2 * p) as u32,
            |x, y| {
                let cell = self.cells[(y as usize + p) * self.width + x as usize + p];
                Luma([if cell.is_blocked() { 0 } else { 255 }])
            },
        )
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::MalformedInput {
            width,
            height,
            reason: "grid must have non-zero dimensions",
        });
    }
    Ok(())
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks_exact(self.width) {
            let line: String = row
                .iter()
                .map(|c| if c.is_blocked() { '#' } else { '.' })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use rstest::rstest;

    fn grid_with_block(width: usize, height: usize, rows: Range<i64>, cols: Range<i64>) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(width, height, Cell::Free).unwrap();
        grid.fill(rows, cols, Cell::Blocked);
        grid
    }

    #[test]
    fn thresholds_on_mean_intensity() {
        let mut image = RgbImage::from_pixel(3, 1, Rgb([255, 255, 255]));
        // Mean exactly at the threshold stays free.
        image.put_pixel(0, 0, Rgb([128, 128, 128]));
        // Mean 127 is blocked.
        image.put_pixel(1, 0, Rgb([255, 126, 0]));
        let grid = OccupancyGrid::from_image(&image, 128).unwrap();
        assert_eq!(grid.get(Pixel::new(0, 0)), Some(Cell::Free));
        assert_eq!(grid.get(Pixel::new(0, 1)), Some(Cell::Blocked));
        assert_eq!(grid.get(Pixel::new(0, 2)), Some(Cell::Free));
    }

    #[test]
    fn alpha_does_not_affect_threshold() {
        let mut image = RgbaImage::from_pixel(2, 2, Rgba([200, 200, 200, 0]));
        image.put_pixel(1, 1, Rgba([10, 10, 10, 255]));
        let grid = OccupancyGrid::from_image(&image, 128).unwrap();
        assert_eq!(grid.blocked_count(), 1);
        assert_eq!(grid.get(Pixel::new(1, 1)), Some(Cell::Blocked));
    }

    #[test]
    fn rejects_empty_input() {
        let image = RgbImage::new(0, 5);
        assert!(matches!(
            OccupancyGrid::from_image(&image, 128),
            Err(Error::MalformedInput { width: 0, .. })
        ));
        assert!(OccupancyGrid::from_cells(2, 2, vec![Cell::Free; 3]).is_err());
    }

    #[test]
    fn padding_keeps_interior_aligned() {
        let mut grid = OccupancyGrid::new(4, 3, Cell::Free).unwrap();
        grid.set_cell(Pixel::new(0, 0), Cell::Blocked).unwrap();
        grid.set_cell(Pixel::new(2, 3), Cell::Blocked).unwrap();
        let padded = grid.pad(2);
        assert_eq!((padded.width(), padded.height(), padded.padding()), (8, 7, 2));
        assert_eq!(padded.get(Pixel::new(2, 2)), Some(Cell::Blocked));
        assert_eq!(padded.get(Pixel::new(4, 5)), Some(Cell::Blocked));
        assert_eq!(padded.blocked_count(), 2);
        // The padded frame keeps the same Cartesian origin for interior cells.
        let p = grid.frame().to_cartesian(Pixel::new(2, 3));
        assert_eq!(padded.frame().to_pixel(p), Pixel::new(4, 5));
    }

    #[test]
    fn image_round_trip_through_build() {
        let grid = grid_with_block(6, 5, 1..3, 2..4).pad(3);
        let config = GridConfig::default().with_padding(3);
        assert_eq!(OccupancyGrid::build(&grid.to_image(), &config).unwrap(), grid);
    }

    #[test]
    fn out_of_bounds_neighborhood_is_invalid() {
        let grid = OccupancyGrid::new(11, 11, Cell::Free).unwrap();
        assert!(grid.is_clear(Pixel::new(5, 5), 5));
        assert!(!grid.is_clear(Pixel::new(5, 5), 6));
        assert!(!grid.is_clear(Pixel::new(0, 5), 1));
        assert!(!grid.is_clear(Pixel::new(-3, -3), 0));
    }

    #[test]
    fn obstacle_inside_square_invalidates() {
        let grid = grid_with_block(21, 21, 10..11, 13..14);
        assert!(grid.is_clear(Pixel::new(10, 10), 2));
        assert!(!grid.is_clear(Pixel::new(10, 10), 3));
        // Corners of the square count too.
        assert!(!grid.is_clear(Pixel::new(7, 10), 3));
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(5)]
    fn validity_is_monotone_in_clearance(#[case] clearance: usize) {
        let grid = grid_with_block(30, 30, 12..15, 4..9);
        for row in 0..30 {
            for col in 0..30 {
                let pixel = Pixel::new(row, col);
                if grid.is_clear(pixel, clearance + 1) {
                    assert!(grid.is_clear(pixel, clearance));
                }
            }
        }
    }

    #[test]
    fn is_valid_rejects_non_finite() {
        let grid = OccupancyGrid::new(9, 9, Cell::Free).unwrap().pad(4);
        assert!(grid.is_valid(Point::new(0.0, 8.0), 2));
        assert!(!grid.is_valid(Point::new(f64::NAN, 8.0), 0));
    }

    #[test]
    fn far_away_pixels_are_not_clear() {
        let grid = OccupancyGrid::new(9, 9, Cell::Free).unwrap();
        assert!(!grid.is_clear(Pixel::new(i64::MAX, 4), 2));
        assert!(!grid.is_clear(Pixel::new(4, i64::MIN), 2));
        assert!(!grid.is_valid(Point::new(0.0, -1e19), 1));
        assert!(!grid.is_valid(Point::new(1e19, 4.0), 0));
    }

    #[test]
    fn oversized_clearance_is_not_clear() {
        let grid = OccupancyGrid::new(11, 11, Cell::Blocked).unwrap();
        assert!(!grid.is_valid(Point::new(0.0, 5.0), usize::MAX));
        assert!(!grid.is_clear(Pixel::new(5, 5), i64::MAX as usize));
        let free = OccupancyGrid::new(11, 11, Cell::Free).unwrap();
        assert!(!free.is_clear(Pixel::new(5, 5), usize::MAX));
    }

    #[test]
    fn set_cell_reports_out_of_bounds() {
        let mut grid = OccupancyGrid::new(3, 3, Cell::Free).unwrap();
        assert_eq!(
            grid.set_cell(Pixel::new(3, 0), Cell::Blocked),
            Err(Error::OutOfBounds { row: 3, col: 0 })
        );
    }

    #[test]
    fn fill_is_clipped() {
        let mut grid = OccupancyGrid::new(4, 4, Cell::Free).unwrap();
        assert_eq!(grid.fill(-5..1, 2..100, Cell::Blocked), 2);
        assert_eq!(grid.fill(0..4, -10..-2, Cell::Blocked), 0);
        assert_eq!(grid.fill(0..1, 0..4, Cell::Blocked), 2);
        grid.fill(0..1, 0..2, Cell::Free);
        assert_eq!(grid.blocked_count(), 2);
        assert_eq!(format!("{grid}"), "..##\n....\n....\n....\n");
    }
}
