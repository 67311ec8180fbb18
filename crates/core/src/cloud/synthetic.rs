//! Deterministic synthetic terrains
//!
//! Generators emit samples in row-major raster order (ascending y, then
//! ascending x), which is exactly what [`crate::grid::GridBuilder`] expects.

use super::Sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Seeded uniform noise added on top of a generated surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jitter {
    /// Half-width of the uniform noise band
    pub amplitude: f64,
    pub seed: u64,
}

/// Raster layout shared by every generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub cols: usize,
    pub rows: usize,
    pub origin_x: f64,
    pub origin_y: f64,
    /// Distance between adjacent samples
    pub spacing: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            cols: 1000,
            rows: 1000,
            origin_x: 445_000.5,
            origin_y: 4_650_999.5,
            spacing: 1.0,
        }
    }
}

impl Layout {
    pub fn square(side: usize) -> Self {
        Layout {
            cols: side,
            rows: side,
            origin_x: 0.0,
            origin_y: 0.0,
            spacing: 1.0,
        }
    }

    fn generate(&self, jitter: Option<Jitter>, height: impl Fn(f64, f64) -> f64) -> Vec<Sample> {
        let mut rng = jitter.map(|j| (StdRng::seed_from_u64(j.seed), j.amplitude));
        let mut samples = Vec::with_capacity(self.cols * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let mut z = height(col as f64, row as f64);
                if let Some((rng, amplitude)) = rng.as_mut() {
                    if *amplitude > 0.0 {
                        z += rng.random_range(-*amplitude..=*amplitude);
                    }
                }
                samples.push(Sample::new(
                    self.origin_x + col as f64 * self.spacing,
                    self.origin_y + row as f64 * self.spacing,
                    z,
                ));
            }
        }
        samples
    }
}

/// Level plain at a constant elevation.
pub fn flat(layout: &Layout, elevation: f64) -> Vec<Sample> {
    layout.generate(None, |_, _| elevation)
}

/// Bowl-shaped depression centered in the raster
///
/// Gaussian profile: `rim - depth * exp(-r² / radius²)`, with `r` and `radius`
/// measured in samples.
pub fn basin(layout: &Layout, rim: f64, depth: f64, radius: f64) -> Vec<Sample> {
    let cx = (layout.cols as f64 - 1.0) / 2.0;
    let cy = (layout.rows as f64 - 1.0) / 2.0;
    layout.generate(None, |col, row| {
        let dx = col - cx;
        let dy = row - cy;
        rim - depth * (-(dx * dx + dy * dy) / (radius * radius)).exp()
    })
}

/// Three superposed sine/cosine octaves around a base height of 304.
pub fn rolling_hills(layout: &Layout, jitter: Option<Jitter>) -> Vec<Sample> {
    layout.generate(jitter, |col, row| {
        304.0
            + 30.0 * (col / 100.0).sin() * (row / 100.0).cos()
            + 15.0 * (col / 20.0).sin() * (row / 20.0).cos()
            + 5.0 * (col / 5.0).sin() * (row / 5.0).cos()
    })
}
