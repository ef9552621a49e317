//! Cell occupancy grid.

use std::fmt;

/// Boolean occupancy grid over `rows x cols` cells.
///
/// Cells only ever go from free to occupied. There is no way to release a cell
/// during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl GridState {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, cells: vec![false; rows * cols] }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize { self.rows }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize { self.cols }

    /// Total number of cells.
    #[must_use]
    pub const fn total_cells(&self) -> usize { self.rows * self.cols }

    /// Returns whether the cell at `(row, col)` is free.
    ///
    /// Cells outside the grid are reported as not free.
    #[must_use]
    pub fn is_free(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && !self.cells[row * self.cols + col]
    }

    /// Returns whether the `width x height` rectangle anchored at `(row, col)`
    /// lies inside the grid and every cell in it is free.
    #[must_use]
    pub fn region_free(&self, row: usize, col: usize, width: usize, height: usize) -> bool {
        if width == 0 || height == 0 || !self.region_in_bounds(row, col, width, height) {
            return false;
        }

        (row..row + height).all(|r| {
            let start = r * self.cols + col;
            self.cells[start..start + width].iter().all(|occupied| !occupied)
        })
    }

    /// Marks every cell of the rectangle as occupied.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle is out of bounds or overlaps an occupied cell.
    /// Callers must check [`GridState::region_free`] first.
    pub fn occupy_region(&mut self, row: usize, col: usize, width: usize, height: usize) {
        assert!(
            self.region_free(row, col, width, height),
            "occupy_region({row}, {col}, {width}x{height}) on a region that is not free"
        );

        for r in row..row + height {
            let start = r * self.cols + col;
            self.cells[start..start + width].fill(true);
        }
    }

    /// Counts occupied cells in the rectangle spanning rows `row_start..row_end`
    /// and columns `col_start..col_end`, clamped to the grid.
    #[must_use]
    pub fn occupied_in(
        &self,
        row_start: usize,
        col_start: usize,
        row_end: usize,
        col_end: usize,
    ) -> usize {
        let row_end = row_end.min(self.rows);
        let col_end = col_end.min(self.cols);
        if row_start >= row_end || col_start >= col_end {
            return 0;
        }

        (row_start..row_end)
            .map(|r| {
                let start = r * self.cols;
                self.cells[start + col_start..start + col_end].iter().filter(|c| **c).count()
            })
            .sum()
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize { self.cells.iter().filter(|c| **c).count() }

    /// Fraction of the grid that is occupied, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_ratio(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.occupied_count() as f64 / self.total_cells() as f64
    }

    const fn region_in_bounds(&self, row: usize, col: usize, width: usize, height: usize) -> bool {
        match (row.checked_add(height), col.checked_add(width)) {
            (Some(row_end), Some(col_end)) => row_end <= self.rows && col_end <= self.cols,
            _ => false,
        }
    }
}

/// Renders the grid as rows of `#` (occupied) and `.` (free).
impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line: String =
                row.iter().map(|occupied| if *occupied { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
