//! Grid topology: shape inference, cell arena and neighbor links

mod builder;
mod cell;
mod terrain_grid;

pub use builder::{GridBuilder, SampleOrder};
pub use cell::{Cell, Direction, Neighbors};
pub use terrain_grid::{Grid, GridSummary};
