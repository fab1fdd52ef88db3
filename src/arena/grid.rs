//! Arena grid storage
//!
//! Cells are stored column-major (`index = x * height + y`) so a DISPLAY
//! payload maps onto storage in order.

use std::fmt::{self, Debug, Display, Formatter};
use std::slice::Chunks;

use super::cell::CellValue;

/// Coordinate outside the current grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cell ({x}, {y}) is outside the {width}x{height} arena")]
pub struct BoundsError {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Width x height grid of cell values
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ArenaGrid {
    width: usize,
    height: usize,
    cells: Vec<CellValue>,
}

impl ArenaGrid {
    /// Create a grid with every cell `Unknown`
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Self {
        let area = width
            .checked_mul(height)
            .unwrap_or_else(|| panic!("arena {}x{} overflows usize", width, height));
        Self {
            width,
            height,
            cells: vec![CellValue::Unknown; area],
        }
    }

    /// Discard every cell and start over at the new size
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Result<usize, BoundsError> {
        if self.in_bounds(x, y) {
            Ok(x * self.height + y)
        } else {
            Err(BoundsError {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn try_get_cell(&self, x: usize, y: usize) -> Result<CellValue, BoundsError> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn try_set_cell(&mut self, x: usize, y: usize, value: CellValue) -> Result<(), BoundsError> {
        let i = self.index(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Read a cell. Out-of-range coordinates are a bug and panic.
    pub fn get_cell(&self, x: usize, y: usize) -> CellValue {
        match self.try_get_cell(x, y) {
            Ok(cell) => cell,
            Err(e) => panic!("get_cell: {}", e),
        }
    }

    /// Write a cell. Out-of-range coordinates are a bug and panic.
    pub fn set_cell(&mut self, x: usize, y: usize, value: CellValue) {
        if let Err(e) = self.try_set_cell(x, y, value) {
            panic!("set_cell: {}", e);
        }
    }

    /// Columns from left to right, each `height` cells long
    pub fn columns(&self) -> Chunks<'_, CellValue> {
        // chunks(0) panics; a zero-height grid has no cells anyway
        self.cells.chunks(self.height.max(1))
    }

    /// Every cell as `(x, y, value)`, column by column
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellValue)> + '_ {
        let height = self.height;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / height, i % height, *cell))
    }

    fn write_rows(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width {
                write!(f, "{}", self.cells[x * self.height + y])?;
            }
        }
        Ok(())
    }
}

impl Debug for ArenaGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "ArenaGrid {}x{}", self.width, self.height)?;
        self.write_rows(f)
    }
}

impl Display for ArenaGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_rows(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_unknown() {
        let grid = ArenaGrid::new(4, 3);
        assert_eq!(grid.dimensions(), (4, 3));
        assert_eq!(grid.area(), 12);
        assert!(grid.iter().all(|(_, _, c)| c == CellValue::Unknown));
    }

    #[test]
    fn test_resize_discards_cells() {
        let mut grid = ArenaGrid::new(3, 3);
        grid.set_cell(1, 1, CellValue::Wall);
        grid.set_cell(0, 0, CellValue::Fruit);

        grid.resize(5, 2);
        assert_eq!(grid.dimensions(), (5, 2));
        for x in 0..5 {
            for y in 0..2 {
                assert_eq!(grid.get_cell(x, y), CellValue::Unknown);
            }
        }

        // same size still resets
        grid.set_cell(4, 1, CellValue::Empty);
        grid.resize(5, 2);
        assert_eq!(grid.get_cell(4, 1), CellValue::Unknown);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = ArenaGrid::new(3, 2);
        grid.set_cell(2, 1, CellValue::SnakeSegment(7));
        assert_eq!(grid.get_cell(2, 1), CellValue::SnakeSegment(7));
        assert_eq!(grid.get_cell(1, 1), CellValue::Unknown);
    }

    #[test]
    fn test_try_access_out_of_bounds() {
        let mut grid = ArenaGrid::new(3, 2);
        let err = grid.try_get_cell(3, 0).unwrap_err();
        assert_eq!(
            err,
            BoundsError {
                x: 3,
                y: 0,
                width: 3,
                height: 2
            }
        );
        assert!(grid.try_set_cell(0, 2, CellValue::Wall).is_err());
        assert!(grid.iter().all(|(_, _, c)| c == CellValue::Unknown));
    }

    #[test]
    #[should_panic(expected = "outside the 3x2 arena")]
    fn test_get_out_of_bounds_panics() {
        let grid = ArenaGrid::new(3, 2);
        grid.get_cell(0, 2);
    }

    #[test]
    #[should_panic]
    fn test_zero_grid_get_panics() {
        let grid = ArenaGrid::new(0, 0);
        grid.get_cell(0, 0);
    }

    #[test]
    #[should_panic]
    fn test_zero_grid_set_panics() {
        let mut grid = ArenaGrid::default();
        grid.set_cell(0, 0, CellValue::Empty);
    }

    #[test]
    fn test_column_major_layout() {
        let mut grid = ArenaGrid::new(2, 3);
        grid.set_cell(1, 0, CellValue::Wall);

        let columns: Vec<&[CellValue]> = grid.columns().collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1][0], CellValue::Wall);

        let (x, y, _) = grid.iter().nth(3).unwrap();
        assert_eq!((x, y), (1, 0));
    }

    #[test]
    fn test_display_rows() {
        let mut grid = ArenaGrid::new(3, 2);
        grid.set_cell(0, 0, CellValue::Wall);
        grid.set_cell(1, 0, CellValue::Empty);
        grid.set_cell(2, 1, CellValue::Fruit);
        assert_eq!(grid.to_string(), "#.?\n??*");
    }
}
