//! Parking grid geometry.

use serde::{Deserialize, Serialize};

/// Shape of the parking grid. Cells are numbered row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl GridShape {
    /// Create a grid shape.
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells, `rows * cols`. This is the fingerprint
    /// dimensionality of a fully populated grid. Saturates at `usize::MAX`.
    pub const fn cell_count(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Whether `(row, col)` lies inside the grid.
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Row-major linear index of `(row, col)`, or `None` outside the grid.
    pub fn linear_index(&self, row: usize, col: usize) -> Option<usize> {
        if !self.contains(row, col) {
            return None;
        }
        row.checked_mul(self.cols)?.checked_add(col)
    }

    /// Inverse of [`Self::linear_index`].
    pub fn cell_of(&self, index: usize) -> Option<(usize, usize)> {
        if self.cols == 0 || index >= self.cell_count() {
            return None;
        }
        Some((index / self.cols, index % self.cols))
    }
}
