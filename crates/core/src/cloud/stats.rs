//! Single-pass elevation and extent statistics.

use super::Sample;
use serde::{Deserialize, Serialize};

/// Axis-aligned planar extent of a sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Width along x
    pub fn x_extent(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height along y
    pub fn y_extent(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when either axis collapses to a line or a point.
    pub fn is_degenerate(&self) -> bool {
        !(self.x_extent() > 0.0 && self.y_extent() > 0.0)
    }
}

/// Elevation statistics gathered while samples stream in.
///
/// `min_location`/`max_location` hold the planar position of the first sample
/// that reached the extreme height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub min_height: f64,
    pub max_height: f64,
    pub avg_height: f64,
    pub bounds: BoundingBox,
    pub min_location: (f64, f64),
    pub max_location: (f64, f64),
}

impl Statistics {
    /// Compute statistics over an existing slice.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let mut acc = StatsAccumulator::new();
        for sample in samples {
            acc.push(sample);
        }
        acc.finish()
    }
}

/// Streaming builder for [`Statistics`].
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    count: usize,
    sum: f64,
    min_height: f64,
    max_height: f64,
    bounds: BoundingBox,
    min_location: (f64, f64),
    max_location: (f64, f64),
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAccumulator {
    pub fn new() -> Self {
        StatsAccumulator {
            count: 0,
            sum: 0.0,
            min_height: f64::MAX,
            max_height: -f64::MAX,
            bounds: BoundingBox {
                min_x: f64::MAX,
                max_x: -f64::MAX,
                min_y: f64::MAX,
                max_y: -f64::MAX,
            },
            min_location: (0.0, 0.0),
            max_location: (0.0, 0.0),
        }
    }

    /// Fold one sample into the running totals.
    pub fn push(&mut self, sample: &Sample) {
        if sample.z < self.min_height {
            self.min_height = sample.z;
            self.min_location = (sample.x, sample.y);
        }
        if sample.z > self.max_height {
            self.max_height = sample.z;
            self.max_location = (sample.x, sample.y);
        }
        self.bounds.min_x = self.bounds.min_x.min(sample.x);
        self.bounds.max_x = self.bounds.max_x.max(sample.x);
        self.bounds.min_y = self.bounds.min_y.min(sample.y);
        self.bounds.max_y = self.bounds.max_y.max(sample.y);
        self.sum += sample.z;
        self.count += 1;
    }

    /// Finalize, or `None` if no sample was pushed.
    pub fn finish(&self) -> Option<Statistics> {
        if self.count == 0 {
            return None;
        }
        Some(Statistics {
            count: self.count,
            min_height: self.min_height,
            max_height: self.max_height,
            avg_height: self.sum / self.count as f64,
            bounds: self.bounds,
            min_location: self.min_location,
            max_location: self.max_location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_statistics_basic() {
        let samples = [
            Sample::new(0.0, 0.0, 1.0),
            Sample::new(2.0, 0.0, 9.0),
            Sample::new(0.0, 3.0, 4.0),
            Sample::new(2.0, 3.0, 2.0),
        ];
        let stats = Statistics::from_samples(&samples).unwrap();

        assert_eq!(stats.count, 4);
        assert_eq!(stats.min_height, 1.0);
        assert_eq!(stats.max_height, 9.0);
        assert_relative_eq!(stats.avg_height, 4.0);
        assert_eq!(stats.min_location, (0.0, 0.0));
        assert_eq!(stats.max_location, (2.0, 0.0));
        assert_eq!(stats.bounds.x_extent(), 2.0);
        assert_eq!(stats.bounds.y_extent(), 3.0);
        assert!(!stats.bounds.is_degenerate());
    }

    #[test]
    fn test_statistics_empty() {
        assert!(Statistics::from_samples(&[]).is_none());
    }

    #[test]
    fn test_degenerate_bounds() {
        let samples = [Sample::new(1.0, 0.0, 1.0), Sample::new(1.0, 5.0, 2.0)];
        let stats = Statistics::from_samples(&samples).unwrap();
        assert!(stats.bounds.is_degenerate());
    }
}
