//! Row-major 2-D `f32` buffer.

use crate::error::{HarnessError, Result};

/// A `rows × cols` grid of `f32` values stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Grid {
    /// Element count of a `rows × cols` grid, or `None` if it overflows
    /// `usize`.
    #[must_use]
    pub const fn element_count(rows: usize, cols: usize) -> Option<usize> {
        rows.checked_mul(cols)
    }

    /// Like [`element_count`](Self::element_count), as an error.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::ShapeTooLarge`] if `rows * cols` overflows.
    pub fn check_shape(rows: usize, cols: usize) -> Result<usize> {
        Self::element_count(rows, cols).ok_or(HarnessError::ShapeTooLarge { rows, cols })
    }

    /// Creates a zero-filled grid.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    /// Creates a grid with every element set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; checked_len(rows, cols)],
        }
    }

    /// Wraps existing row-major storage.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::DataLength`] if `data.len() != rows * cols`,
    /// including when `rows * cols` overflows.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if Self::element_count(rows, cols) != Some(data.len()) {
            return Err(HarnessError::DataLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a grid by evaluating `f(row, col)` for every element.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(checked_len(rows, cols));
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major storage.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Element at `(row, col)`, if in bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    /// Overwrites the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) out of bounds for {}x{} grid",
            self.rows,
            self.cols
        );
        self.data[row * self.cols + col] = value;
    }

    /// Element at `(row, col)` with out-of-range coordinates clamped to the
    /// nearest edge (replicated border).
    ///
    /// Must not be called on an empty grid.
    #[must_use]
    pub fn clamped(&self, row: isize, col: isize) -> f32 {
        let r = row.clamp(0, self.rows as isize - 1) as usize;
        let c = col.clamp(0, self.cols as isize - 1) as usize;
        self.data[r * self.cols + c]
    }

    /// Iterates over rows as slices.
    pub fn row_iter(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact(0) panics; a zero-column grid has no visible rows anyway.
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }
}

fn checked_len(rows: usize, cols: usize) -> usize {
    match Grid::element_count(rows, cols) {
        Some(len) => len,
        None => panic!("{rows}x{cols} grid overflows usize"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![0.0; 4]).is_ok());
        assert_eq!(
            Grid::from_vec(2, 3, vec![0.0; 4]).unwrap_err(),
            HarnessError::DataLength {
                rows: 2,
                cols: 3,
                len: 4
            }
        );
    }

    #[test]
    fn test_from_vec_rejects_overflowing_shape() {
        assert_eq!(
            Grid::from_vec(usize::MAX / 2 + 1, 2, vec![]).unwrap_err(),
            HarnessError::DataLength {
                rows: usize::MAX / 2 + 1,
                cols: 2,
                len: 0
            }
        );
        // Wrapping would make this product 2.
        assert!(Grid::from_vec(usize::MAX / 2 + 2, 2, vec![0.0; 2]).is_err());
    }

    #[test]
    fn test_element_count() {
        assert_eq!(Grid::element_count(3, 4), Some(12));
        assert_eq!(Grid::element_count(0, usize::MAX), Some(0));
        assert_eq!(Grid::element_count(usize::MAX, 2), None);
        assert_eq!(Grid::check_shape(256, 256), Ok(65_536));
        assert_eq!(
            Grid::check_shape(usize::MAX, 2),
            Err(HarnessError::ShapeTooLarge {
                rows: usize::MAX,
                cols: 2
            })
        );
    }

    #[test]
    #[should_panic(expected = "overflows usize")]
    fn test_filled_panics_on_overflowing_shape() {
        let _ = Grid::filled(usize::MAX, 3, 0.0);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid::from_fn(2, 3, |r, c| (r * 10 + c) as f32);
        assert_eq!(grid.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(grid.get(1, 2), Some(12.0));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_clamped_replicates_border() {
        let grid = Grid::from_fn(2, 2, |r, c| (r * 2 + c) as f32);
        assert_eq!(grid.clamped(-1, -1), 0.0);
        assert_eq!(grid.clamped(5, 0), 2.0);
        assert_eq!(grid.clamped(1, 9), 3.0);
    }

    #[test]
    fn test_row_iter() {
        let grid = Grid::from_fn(3, 2, |r, _| r as f32);
        let rows: Vec<&[f32]> = grid.row_iter().collect();
        assert_eq!(rows, vec![&[0.0, 0.0][..], &[1.0, 1.0], &[2.0, 2.0]]);
        assert_eq!(Grid::new(0, 4).row_iter().count(), 0);
    }

    #[test]
    fn test_set() {
        let mut grid = Grid::new(2, 2);
        grid.set(0, 1, 4.5);
        assert_eq!(grid.get(0, 1), Some(4.5));
        assert_eq!(grid.len(), 4);
        assert!(!grid.is_empty());
    }
}
