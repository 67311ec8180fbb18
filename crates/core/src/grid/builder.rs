//! Grid topology inference from a flat sample list

use super::cell::Cell;
use super::terrain_grid::Grid;
use crate::cloud::{Sample, StatsAccumulator};
use crate::error::{Result, WatershedError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How the builder treats the arrival order of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleOrder {
    /// Samples are already row-major (ascending y, then ascending x).
    /// Nothing is checked; misordered input yields a scrambled topology.
    #[default]
    AsGiven,
    /// Stable-sort by ascending y, then ascending x, before placement.
    SortRowMajor,
}

/// Infers rows/cols from sample count and extent and places samples into a
/// linked [`Grid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GridBuilder {
    order: SampleOrder,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, order: SampleOrder) -> Self {
        self.order = order;
        self
    }

    /// Build a grid from samples, inferring its shape.
    ///
    /// `x_step = x_extent / (sqrt(n) - 1)`, `cols = round(x_extent / x_step) + 1`,
    /// and the same along y. Neighbor links are established before returning.
    ///
    /// # Errors
    /// Returns [`WatershedError::IrregularInput`] when fewer than four samples
    /// are given, when either axis has zero extent, or when the inferred shape
    /// does not hold exactly `samples.len()` cells.
    pub fn build(self, mut samples: Vec<Sample>) -> Result<Grid> {
        let count = samples.len();
        if count < 4 {
            return Err(WatershedError::IrregularInput(format!(
                "need at least 4 samples to infer a grid, got {count}"
            )));
        }

        if self.order == SampleOrder::SortRowMajor {
            samples.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        }

        let mut stats = StatsAccumulator::new();
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|_| WatershedError::Allocation {
                what: "grid cells",
                len: count,
            })?;
        for sample in samples {
            stats.push(&sample);
            cells.push(Cell::new(sample));
        }
        let Some(statistics) = stats.finish() else {
            return Err(WatershedError::IrregularInput("no samples".to_string()));
        };

        let bounds = statistics.bounds;
        if bounds.is_degenerate() {
            return Err(WatershedError::IrregularInput(format!(
                "bounding box has zero extent ({} x {})",
                bounds.x_extent(),
                bounds.y_extent()
            )));
        }

        let side = (count as f64).sqrt() - 1.0;
        let x_step = bounds.x_extent() / side;
        let y_step = bounds.y_extent() / side;
        let cols = (bounds.x_extent() / x_step).round() as usize + 1;
        let rows = (bounds.y_extent() / y_step).round() as usize + 1;

        debug!(
            "Inferred grid {} rows x {} cols, step {:.3} x {:.3}",
            rows, cols, x_step, y_step
        );

        if rows * cols != count {
            return Err(WatershedError::IrregularInput(format!(
                "inferred {rows} rows x {cols} cols = {} cells but got {count} samples",
                rows * cols
            )));
        }

        let mut grid = Grid {
            rows,
            cols,
            cells,
            statistics,
            x_step,
            y_step,
        };
        grid.link_neighbors()?;

        info!(
            "Built {}x{} grid from {} samples (heights {:.2}..{:.2})",
            rows, cols, count, statistics.min_height, statistics.max_height
        );

        Ok(grid)
    }
}
