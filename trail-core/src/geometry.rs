//! Board dimensions and the row/column ↔ cell index mapping.

use serde::Serialize;

use crate::{Cell, SetupError};

/// Fixed board dimensions.
///
/// Layout (row-major):
/// ```text
///   index(r, c) = r * cols + c
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Geometry {
    rows: u8,
    cols: u8,
}

impl Geometry {
    /// Largest supported side length (8×8 = 64 cells fits in a `u64`).
    pub const MAX_SIDE: u8 = 8;

    /// Create a geometry, rejecting sides outside `1..=8`.
    pub fn new(rows: u8, cols: u8) -> Result<Geometry, SetupError> {
        let valid = |side: u8| (1..=Self::MAX_SIDE).contains(&side);
        if !valid(rows) || !valid(cols) {
            return Err(SetupError::BoardSize { rows, cols });
        }
        Ok(Geometry { rows, cols })
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Number of cells on the board.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Mask with one bit per cell on the board.
    #[inline]
    pub fn full_mask(&self) -> u64 {
        match self.cell_count() {
            64 => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }

    /// Cell at `(row, col)`. Caller guarantees the coordinates are on the board.
    #[inline]
    pub fn cell(&self, row: u8, col: u8) -> Cell {
        debug_assert!(row < self.rows && col < self.cols);
        Cell(row * self.cols + col)
    }

    /// Cell at `(row, col)`, or an error if it lies off the board.
    pub fn checked_cell(&self, row: u8, col: u8) -> Result<Cell, SetupError> {
        if row >= self.rows || col >= self.cols {
            return Err(SetupError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.cell(row, col))
    }

    /// `(row, col)` of a cell.
    #[inline]
    pub fn row_col(&self, cell: Cell) -> (u8, u8) {
        (cell.0 / self.cols, cell.0 % self.cols)
    }

    /// Step from `cell` by `(dr, dc)`, or `None` when that leaves the board.
    #[inline]
    pub fn offset(&self, cell: Cell, dr: i8, dc: i8) -> Option<Cell> {
        let (row, col) = self.row_col(cell);
        let row = row as i16 + dr as i16;
        let col = col as i16 + dc as i16;
        if row < 0 || col < 0 || row >= self.rows as i16 || col >= self.cols as i16 {
            return None;
        }
        Some(self.cell(row as u8, col as u8))
    }

    /// Real-valued center `(rows / 2, cols / 2)`.
    pub fn center(&self) -> (f64, f64) {
        (self.rows as f64 / 2.0, self.cols as f64 / 2.0)
    }

    /// Manhattan distance from [`center`](Self::center), doubled so it stays integral.
    #[inline]
    pub fn doubled_center_distance(&self, cell: Cell) -> u32 {
        let (row, col) = self.row_col(cell);
        (2 * row as i32 - self.rows as i32).unsigned_abs()
            + (2 * col as i32 - self.cols as i32).unsigned_abs()
    }

    /// Iterate over all cells in index order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        (0..self.cell_count() as u8).map(Cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_bounds() {
        assert!(Geometry::new(1, 1).is_ok());
        assert!(Geometry::new(8, 8).is_ok());
        assert_eq!(
            Geometry::new(0, 3),
            Err(SetupError::BoardSize { rows: 0, cols: 3 })
        );
        assert_eq!(
            Geometry::new(3, 9),
            Err(SetupError::BoardSize { rows: 3, cols: 9 })
        );
    }

    #[test]
    fn test_cell_row_col_roundtrip() {
        let geometry = Geometry::new(3, 5).unwrap();
        for cell in geometry.cells() {
            let (row, col) = geometry.row_col(cell);
            assert_eq!(geometry.cell(row, col), cell);
        }
        assert_eq!(geometry.cell(2, 1), Cell(11));
    }

    #[test]
    fn test_checked_cell() {
        let geometry = Geometry::new(2, 3).unwrap();
        assert_eq!(geometry.checked_cell(1, 2), Ok(Cell(5)));
        assert_eq!(
            geometry.checked_cell(2, 0),
            Err(SetupError::OutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            })
        );
    }

    #[test]
    fn test_full_mask() {
        assert_eq!(Geometry::new(1, 1).unwrap().full_mask(), 1);
        assert_eq!(Geometry::new(2, 3).unwrap().full_mask(), 0b11_1111);
        assert_eq!(Geometry::new(8, 8).unwrap().full_mask(), u64::MAX);
    }

    #[test]
    fn test_offset_stays_on_board() {
        let geometry = Geometry::new(3, 3).unwrap();
        assert_eq!(geometry.offset(Cell(0), -1, 0), None);
        assert_eq!(geometry.offset(Cell(0), 0, -1), None);
        assert_eq!(geometry.offset(Cell(0), 1, 1), Some(Cell(4)));
        assert_eq!(geometry.offset(Cell(2), 0, 1), None);
        assert_eq!(geometry.offset(Cell(8), 2, 0), None);
    }

    #[test]
    fn test_center_distance() {
        // 3x3: center at (1.5, 1.5)
        let geometry = Geometry::new(3, 3).unwrap();
        assert_eq!(geometry.center(), (1.5, 1.5));
        assert_eq!(geometry.doubled_center_distance(Cell(0)), 6);
        assert_eq!(geometry.doubled_center_distance(Cell(8)), 2);
        assert_eq!(geometry.doubled_center_distance(Cell(4)), 2);

        // 4x4: corners are farthest, the inner four closest
        let geometry = Geometry::new(4, 4).unwrap();
        assert_eq!(geometry.doubled_center_distance(geometry.cell(0, 0)), 8);
        assert_eq!(geometry.doubled_center_distance(geometry.cell(2, 2)), 0);
        assert_eq!(geometry.doubled_center_distance(geometry.cell(1, 1)), 4);
    }
}
