//! Row-major cell arena with index-based neighbor links
//!
//! Cells are stored contiguously in `row * cols + col` order. Neighbor links are
//! plain indices derived from position, so the four-way mesh never needs
//! owning or shared pointers.

use super::cell::{Cell, Direction};
use crate::cloud::{Sample, Statistics};
use crate::error::{Result, WatershedError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regular grid of terrain cells
///
/// Deserialization re-validates the shape, recomputes statistics from the
/// cells and relinks neighbors, so stored links are never trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawGrid", into = "RawGrid")]
pub struct Grid {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    /// Cells in row-major order: [row * cols + col]
    pub(crate) cells: Vec<Cell>,
    pub(crate) statistics: Statistics,
    pub(crate) x_step: f64,
    pub(crate) y_step: f64,
}

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells (`rows * cols`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Statistics gathered while the grid was built
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Inferred sample spacing along x and y
    pub fn steps(&self) -> (f64, f64) {
        (self.x_step, self.y_step)
    }

    /// Get cell index from (row, col)
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Inverse of [`Grid::index_of`]
    #[inline]
    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.cells.len()).then(|| (index / self.cols, index % self.cols))
    }

    /// Get cell at grid position (bounds-checked)
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index_of(row, col).map(|i| &self.cells[i])
    }

    /// Number of present neighbor links of cell `index`
    pub fn neighbor_count(&self, index: usize) -> Option<usize> {
        self.cells.get(index).map(|cell| cell.neighbors.count())
    }

    /// Recompute every cell's four neighbor links from its position.
    ///
    /// Idempotent: links depend only on `(row, col)` and the grid shape.
    ///
    /// # Errors
    /// Returns [`WatershedError::InvalidGrid`] if the grid has no cells.
    pub fn link_neighbors(&mut self) -> Result<()> {
        if self.cells.is_empty() || self.rows == 0 || self.cols == 0 {
            return Err(WatershedError::InvalidGrid(
                "cannot link neighbors of an empty grid".to_string(),
            ));
        }

        let (rows, cols) = (self.rows, self.cols);
        for (i, cell) in self.cells.iter_mut().enumerate() {
            let row = i / cols;
            let col = i % cols;
            let links = &mut cell.neighbors;
            links.set(Direction::North, (row > 0).then(|| i - cols));
            links.set(Direction::South, (row + 1 < rows).then(|| i + cols));
            links.set(Direction::East, (col + 1 < cols).then(|| i + 1));
            links.set(Direction::West, (col > 0).then(|| i - 1));
        }
        Ok(())
    }

    /// Sum of water depth over all cells
    pub fn total_water(&self) -> f64 {
        self.cells.iter().map(|c| c.water).sum()
    }

    /// Deepest water over all cells
    pub fn max_water(&self) -> f64 {
        self.cells.iter().map(|c| c.water).fold(0.0, f64::max)
    }

    /// Human-readable description of the grid.
    pub fn summary(&self) -> GridSummary {
        GridSummary {
            rows: self.rows,
            cols: self.cols,
            count: self.cells.len(),
            statistics: self.statistics,
            x_step: self.x_step,
            y_step: self.y_step,
            memory_bytes: std::mem::size_of::<Grid>()
                + self.cells.capacity() * std::mem::size_of::<Cell>(),
        }
    }
}

/// Unvalidated serde mirror of [`Grid`].
#[derive(Serialize, Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    x_step: f64,
    y_step: f64,
}

impl TryFrom<RawGrid> for Grid {
    type Error = WatershedError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        if raw.rows.checked_mul(raw.cols) != Some(raw.cells.len()) {
            return Err(WatershedError::InvalidGrid(format!(
                "{} rows x {} cols does not match {} cells",
                raw.rows,
                raw.cols,
                raw.cells.len()
            )));
        }
        let samples: Vec<Sample> = raw.cells.iter().map(|c| c.sample).collect();
        let statistics = Statistics::from_samples(&samples)
            .ok_or_else(|| WatershedError::InvalidGrid("grid has no cells".to_string()))?;
        if raw.cells.iter().any(|c| c.water.is_nan() || c.water < 0.0) {
            return Err(WatershedError::InvalidGrid(
                "water depth must be a non-negative number".to_string(),
            ));
        }

        let mut grid = Grid {
            rows: raw.rows,
            cols: raw.cols,
            cells: raw.cells,
            statistics,
            x_step: raw.x_step,
            y_step: raw.y_step,
        };
        grid.link_neighbors()?;
        Ok(grid)
    }
}

impl From<Grid> for RawGrid {
    fn from(grid: Grid) -> Self {
        RawGrid {
            rows: grid.rows,
            cols: grid.cols,
            cells: grid.cells,
            x_step: grid.x_step,
            y_step: grid.y_step,
        }
    }
}

/// Snapshot of grid shape and statistics, printable with `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSummary {
    pub rows: usize,
    pub cols: usize,
    pub count: usize,
    pub statistics: Statistics,
    pub x_step: f64,
    pub y_step: f64,
    /// Bytes held by the grid and its cell arena
    pub memory_bytes: usize,
}

impl fmt::Display for GridSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.statistics;
        writeln!(
            f,
            "Dimensions: {} rows x {} columns ({} total points)",
            self.rows, self.cols, self.count
        )?;
        writeln!(f, "Step size: {:.2} x {:.2}", self.x_step, self.y_step)?;
        writeln!(
            f,
            "Height range: {:.2} to {:.2} (avg: {:.2})",
            s.min_height, s.max_height, s.avg_height
        )?;
        writeln!(f, "X range: {:.2} to {:.2}", s.bounds.min_x, s.bounds.max_x)?;
        writeln!(f, "Y range: {:.2} to {:.2}", s.bounds.min_y, s.bounds.max_y)?;
        write!(f, "Memory usage: {} bytes", self.memory_bytes)
    }
}
