//! Raw elevation sample type.

use serde::{Deserialize, Serialize};

/// A single elevation sample: planar position plus height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
    /// Elevation
    pub z: f64,
}

impl Sample {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Sample { x, y, z }
    }
}
