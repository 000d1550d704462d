//! Path visualization kept apart from the obstacle grid.
//!
//! Marks are recorded per pixel and only composed with the grid when an
//! image is rendered, so marking never changes what
//! [is_valid](crate::OccupancyGrid::is_valid) sees.
use image::{Rgb, RgbImage};

use crate::occupancy::OccupancyGrid;
use crate::transform::{Frame, Pixel, Point};
use crate::FxIndexMap;

pub const FREE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLOCKED_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
pub const EXPLORED_COLOR: Rgb<u8> = Rgb([160, 160, 160]);
pub const PATH_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const ENDPOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Kinds of marks, ordered by precedence: a pixel keeps the highest mark it
/// has received.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mark {
    Explored,
    Path,
    Endpoint,
}

impl Mark {
    pub fn color(self) -> Rgb<u8> {
        match self {
            Mark::Explored => EXPLORED_COLOR,
            Mark::Path => PATH_COLOR,
            Mark::Endpoint => ENDPOINT_COLOR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Overlay {
    frame: Frame,
    marks: FxIndexMap<Pixel, Mark>,
}

impl Overlay {
    pub fn new(frame: Frame) -> Overlay {
        Overlay {
            frame,
            marks: FxIndexMap::default(),
        }
    }

    pub fn for_grid(grid: &OccupancyGrid) -> Overlay {
        Overlay::new(grid.frame())
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Records a mark at the pixel under `point`. Returns false if the point
    /// is off the grid.
    pub fn mark(&mut self, point: Point, mark: Mark) -> bool {
        let pixel = self.frame.to_pixel(point);
        if !self.frame.contains(pixel) {
            return false;
        }
        let entry = self.marks.entry(pixel).or_insert(mark);
        *entry = (*entry).max(mark);
        true
    }

    pub fn mark_path(&mut self, point: Point) -> bool {
        self.mark(point, Mark::Path)
    }

    pub fn mark_endpoint(&mut self, point: Point) -> bool {
        self.mark(point, Mark::Endpoint)
    }

    pub fn mark_explored(&mut self, point: Point) -> bool {
        self.mark(point, Mark::Explored)
    }

    pub fn mark_at(&self, pixel: Pixel) -> Option<Mark> {
        self.marks.get(&pixel).copied()
    }

    /// Marked pixels in the order they were first marked.
    pub fn marks(&self) -> impl Iterator<Item = (Pixel, Mark)> + '_ {
        self.marks.iter().map(|(p, m)| (*p, *m))
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Composes the grid and the recorded marks into an RGB image.
    pub fn render(&self, grid: &OccupancyGrid) -> RgbImage {
        let mut image = RgbImage::from_fn(grid.width() as u32, grid.height() as u32, |x, y| {
            match grid.get(Pixel::new(y as i64, x as i64)) {
                Some(cell) if cell.is_blocked() => BLOCKED_COLOR,
                _ => FREE_COLOR,
            }
        });
        for (pixel, mark) in self.marks() {
            if let Some(p) = image.get_pixel_mut_checked(pixel.col as u32, pixel.row as u32) {
                *p = mark.color();
            }
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::Cell;

    #[test]
    fn marking_leaves_validity_untouched() {
        let grid = OccupancyGrid::new(20, 20, Cell::Free).unwrap().pad(5);
        let point = Point::new(0.0, 10.0);
        let before = grid.is_valid(point, 4);
        let mut overlay = Overlay::for_grid(&grid);
        assert!(overlay.mark_path(point));
        assert!(overlay.mark_endpoint(Point::new(1.0, 10.0)));
        assert_eq!(grid.is_valid(point, 4), before);
        assert_eq!(grid.blocked_count(), 0);
    }

    #[test]
    fn higher_marks_win() {
        let grid = OccupancyGrid::new(10, 10, Cell::Free).unwrap();
        let mut overlay = Overlay::for_grid(&grid);
        let point = Point::new(0.0, 3.0);
        let pixel = grid.frame().to_pixel(point);
        overlay.mark_endpoint(point);
        overlay.mark_path(point);
        overlay.mark_explored(point);
        assert_eq!(overlay.mark_at(pixel), Some(Mark::Endpoint));
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn off_grid_marks_are_ignored() {
        let grid = OccupancyGrid::new(10, 10, Cell::Free).unwrap();
        let mut overlay = Overlay::for_grid(&grid);
        assert!(!overlay.mark_path(Point::new(100.0, 0.0)));
        assert!(overlay.is_empty());
    }

    #[test]
    fn render_composes_grid_and_marks() {
        let mut grid = OccupancyGrid::new(6, 6, Cell::Free).unwrap();
        grid.set_cell(Pixel::new(0, 0), Cell::Blocked).unwrap();
        let mut overlay = Overlay::for_grid(&grid);
        let point = Point::new(0.0, 2.0);
        let pixel = grid.frame().to_pixel(point);
        overlay.mark_path(point);
        let image = overlay.render(&grid);
        assert_eq!(*image.get_pixel(0, 0), BLOCKED_COLOR);
        assert_eq!(*image.get_pixel(5, 5), FREE_COLOR);
        assert_eq!(
            *image.get_pixel(pixel.col as u32, pixel.row as u32),
            PATH_COLOR
        );
    }
}
