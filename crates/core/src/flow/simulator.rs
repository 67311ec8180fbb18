//! Staged surface-water flow solver
//!
//! Each step reads every cell's head (elevation + water) from the frozen grid,
//! writes the new depths into a staging buffer, and only then commits them.
//! Because no cell observes a value written during the same pass, the result
//! does not depend on visiting order and the per-cell work can run on Rayon.

use super::params::SimulationParams;
use crate::error::{Result, WatershedError};
use crate::grid::{Cell, Grid};
use rayon::prelude::*;
use tracing::{debug, info};

/// Water depth of cell `index` after one step, computed from the current state.
///
/// `delta = Σ (head_j - head_i)` over present neighbors, then
/// `max(0, (water_i + flow_coef * delta) * evap_coef)`.
///
/// Pure function of `cells`; callers may evaluate indices in any order.
///
/// # Panics
/// Panics if `index` or any neighbor link of that cell is out of bounds for
/// `cells`. Grids from [`crate::grid::GridBuilder`] or deserialization always
/// satisfy this.
#[inline]
pub fn next_water(cells: &[Cell], index: usize, params: &SimulationParams) -> f64 {
    let cell = &cells[index];
    let head = cell.head();
    let delta: f64 = cell.neighbors().iter().map(|j| cells[j].head() - head).sum();
    ((cell.water() + delta * params.flow_coef()) * params.evap_coef()).max(0.0)
}

/// Advances water depth over a [`Grid`] one timestep at a time.
#[derive(Debug, Clone, Default)]
pub struct FlowSimulator {
    params: SimulationParams,
    /// Next-step water depths, indexed like the grid's cells
    staging: Vec<f64>,
    steps_taken: u64,
}

impl FlowSimulator {
    pub fn new(params: SimulationParams) -> Self {
        info!(
            "Flow simulator ready: flow_coef={}, evap_coef={}",
            params.flow_coef(),
            params.evap_coef()
        );
        FlowSimulator {
            params,
            staging: Vec::new(),
            steps_taken: 0,
        }
    }

    pub fn params(&self) -> SimulationParams {
        self.params
    }

    /// Number of completed steps
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Replace both coefficients.
    ///
    /// # Errors
    /// Returns [`WatershedError::InvalidParameter`] if either coefficient is out
    /// of range; the current coefficients are kept in that case.
    pub fn set_params(&mut self, flow_coef: f64, evap_coef: f64) -> Result<()> {
        self.params = SimulationParams::new(flow_coef, evap_coef)?;
        debug!("Coefficients updated: {:?}", self.params);
        Ok(())
    }

    /// Add the same depth of water to every cell.
    ///
    /// Negative (and NaN) amounts are ignored rather than reported.
    pub fn add_uniform_water(grid: &mut Grid, amount: f64) {
        if amount.is_nan() || amount < 0.0 {
            debug!("Ignoring negative uniform water amount {}", amount);
            return;
        }
        for cell in &mut grid.cells {
            cell.water += amount;
        }
    }

    /// Advance the grid one timestep.
    ///
    /// # Errors
    /// Returns [`WatershedError::InvalidGrid`] for an empty grid and
    /// [`WatershedError::Allocation`] if the staging buffer cannot grow. The
    /// grid is untouched on error.
    pub fn step(&mut self, grid: &mut Grid) -> Result<()> {
        if grid.is_empty() {
            return Err(WatershedError::InvalidGrid(
                "cannot step an empty grid".to_string(),
            ));
        }
        self.ensure_staging(grid.len())?;

        let params = self.params;
        let cells = &grid.cells;
        self.staging
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, out)| *out = next_water(cells, i, &params));

        for (cell, &water) in grid.cells.iter_mut().zip(&self.staging) {
            cell.water = water;
        }
        self.steps_taken += 1;

        debug!(
            "Step {}: total water {:.4}",
            self.steps_taken,
            grid.total_water()
        );
        Ok(())
    }

    /// Run `iterations` steps, calling `on_step(step_index, grid)` after each.
    ///
    /// # Errors
    /// Stops at the first error from [`FlowSimulator::step`] or `on_step`.
    pub fn run<F>(&mut self, grid: &mut Grid, iterations: usize, mut on_step: F) -> Result<()>
    where
        F: FnMut(usize, &Grid) -> Result<()>,
    {
        for i in 0..iterations {
            self.step(grid)?;
            on_step(i, grid)?;
        }
        Ok(())
    }

    fn ensure_staging(&mut self, len: usize) -> Result<()> {
        if self.staging.len() == len {
            return Ok(());
        }
        self.staging.clear();
        self.staging
            .try_reserve_exact(len)
            .map_err(|_| WatershedError::Allocation {
                what: "flow staging buffer",
                len,
            })?;
        self.staging.resize(len, 0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::synthetic::{basin, flat, Layout};
    use crate::grid::GridBuilder;
    use approx::assert_relative_eq;

    fn grid_of(samples: Vec<crate::cloud::Sample>) -> Grid {
        GridBuilder::new().build(samples).unwrap()
    }

    #[test]
    fn test_negative_water_is_ignored() {
        let mut grid = grid_of(flat(&Layout::square(3), 1.0));
        FlowSimulator::add_uniform_water(&mut grid, 1.5);
        FlowSimulator::add_uniform_water(&mut grid, -1.0);
        FlowSimulator::add_uniform_water(&mut grid, f64::NAN);
        assert!(grid.cells().iter().all(|c| c.water() == 1.5));
    }

    #[test]
    fn test_flat_terrain_only_evaporates() {
        let mut grid = grid_of(flat(&Layout::square(4), 3.0));
        FlowSimulator::add_uniform_water(&mut grid, 2.0);

        let mut sim = FlowSimulator::default();
        sim.step(&mut grid).unwrap();

        for cell in grid.cells() {
            assert_relative_eq!(cell.water(), 2.0 * 0.95);
        }
        assert_eq!(sim.steps_taken(), 1);
    }

    #[test]
    fn test_rejected_params_keep_previous() {
        let mut sim = FlowSimulator::default();
        sim.set_params(0.05, 0.99).unwrap();
        assert!(sim.set_params(0.3, 0.99).is_err());
        assert_eq!(sim.params().flow_coef(), 0.05);
        assert_eq!(sim.params().evap_coef(), 0.99);
    }

    #[test]
    fn test_basin_collects_water() {
        let mut grid = grid_of(basin(&Layout::square(9), 20.0, 8.0, 2.0));
        FlowSimulator::add_uniform_water(&mut grid, 1.0);

        let mut sim = FlowSimulator::default();
        sim.run(&mut grid, 10, |_, _| Ok(())).unwrap();

        let center = grid.cell(4, 4).unwrap().water();
        let corner = grid.cell(0, 0).unwrap().water();
        assert!(center > corner);
        assert_eq!(sim.steps_taken(), 10);
    }

    #[test]
    fn test_run_reports_each_step() {
        let mut grid = grid_of(flat(&Layout::square(3), 0.0));
        let mut seen = Vec::new();
        FlowSimulator::default()
            .run(&mut grid, 4, |i, _| {
                seen.push(i);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_run_stops_on_callback_error() {
        let mut grid = grid_of(flat(&Layout::square(3), 0.0));
        let mut sim = FlowSimulator::default();
        let result = sim.run(&mut grid, 5, |i, _| {
            if i == 1 {
                Err(WatershedError::Render("stop".to_string()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(sim.steps_taken(), 2);
    }
}
