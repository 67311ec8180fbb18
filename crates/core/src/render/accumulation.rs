//! Per-pixel running sums used to average samples that land on one pixel.

use crate::error::{try_zeroed, Result};

#[derive(Debug, Clone, Copy, Default)]
struct PixelSum {
    height: f64,
    water: f64,
    count: u32,
}

/// Scoped to a single render call; never shared between renders.
#[derive(Debug)]
pub struct AccumulationBuffer {
    width: usize,
    sums: Vec<PixelSum>,
}

impl AccumulationBuffer {
    /// # Errors
    /// Returns [`crate::WatershedError::Allocation`] if the buffer cannot be
    /// allocated.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(AccumulationBuffer {
            width,
            sums: try_zeroed("accumulation buffer", width.saturating_mul(height))?,
        })
    }

    #[inline]
    pub fn add(&mut self, px: usize, py: usize, height: f64, water: f64) {
        let sum = &mut self.sums[py * self.width + px];
        sum.height += height;
        sum.water += water;
        sum.count += 1;
    }

    /// Number of samples accumulated at (px, py)
    pub fn count(&self, px: usize, py: usize) -> u32 {
        self.sums[py * self.width + px].count
    }

    /// `(px, py, mean height, mean water)` for every pixel hit at least once.
    pub fn averages(&self) -> impl Iterator<Item = (usize, usize, f64, f64)> + '_ {
        self.sums
            .iter()
            .enumerate()
            .filter(|(_, sum)| sum.count > 0)
            .map(move |(i, sum)| {
                let n = f64::from(sum.count);
                (i % self.width, i / self.width, sum.height / n, sum.water / n)
            })
    }

    /// Smallest and largest mean height over covered pixels.
    pub fn height_range(&self) -> Option<(f64, f64)> {
        self.averages().fold(None, |range, (_, _, h, _)| match range {
            None => Some((h, h)),
            Some((lo, hi)) => Some((lo.min(h), hi.max(h))),
        })
    }
}

/// Stretch `value` from `[min, max]` onto `0..=255`.
///
/// A zero-width range maps everything to mid-gray.
#[inline]
pub(crate) fn intensity(value: f64, min: f64, max: f64) -> u8 {
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return 128;
    }
    (255.0 * (value - min) / range).round().clamp(0.0, 255.0) as u8
}
