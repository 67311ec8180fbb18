//! Watershed Simulation Core Library
//!
//! Turns an unordered cloud of terrain samples into a regular grid, routes
//! surface water across it one timestep at a time, and renders terrain and
//! water depth into pixel buffers.
//!
//! ## Pipeline
//!
//! 1. [`cloud::ingest`] reads `count` followed by `x y z` triples.
//! 2. [`GridBuilder`] infers the lattice and links each cell to its
//!    north, south, east and west neighbors.
//! 3. [`FlowSimulator`] moves water down the head gradient with a staged,
//!    parallel update and applies evaporation.
//! 4. [`render`] projects samples or cells onto an image and hands the result
//!    to a caller-supplied [`PixelEncoder`].

pub mod cloud;
pub mod config;
pub mod error;
pub mod flow;
pub mod grid;
pub mod render;

pub use cloud::{ingest, IngestOptions, PointCloud, Sample, Statistics};
pub use config::SimulationConfig;
pub use error::{ErrorKind, Result, WatershedError};
pub use flow::{FlowSimulator, SimulationParams};
pub use grid::{Cell, Direction, Grid, GridBuilder, SampleOrder};
pub use render::{render_height_map, render_water_overlay, PixelBuffer, PixelEncoder, PixelFormat};
