//! Run configuration for a watershed simulation

use crate::error::{Result, WatershedError};
use crate::flow::SimulationParams;
use serde::{Deserialize, Serialize};

/// Everything needed to drive one simulation run.
///
/// Missing fields fall back to [`SimulationConfig::default`] when deserialized,
/// so a config file only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of watershed steps
    pub iterations: usize,
    /// Depth added to every cell before the first step
    pub initial_water: f64,
    pub params: SimulationParams,
    /// Write a frame every `snapshot_every` steps; 0 writes only the final frame
    pub snapshot_every: usize,
    /// Square output image side in pixels
    pub image_size: usize,
    /// Depth rendered as fully blue; `None` means twice `initial_water`
    pub water_scale: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            iterations: 100,
            initial_water: 1.0,
            params: SimulationParams::default(),
            snapshot_every: 0,
            image_size: 800,
            water_scale: None,
        }
    }
}

impl SimulationConfig {
    /// Depth that maps to pure blue in rendered frames.
    pub fn effective_water_scale(&self) -> f64 {
        self.water_scale.unwrap_or(2.0 * self.initial_water)
    }

    /// Whether step `i` (zero-based) of this run produces a snapshot frame.
    pub fn is_snapshot_step(&self, i: usize) -> bool {
        self.snapshot_every > 0
            && (i % self.snapshot_every == 0 || i + 1 == self.iterations)
    }

    /// # Errors
    /// Returns [`WatershedError::InvalidParameter`] for a negative or
    /// non-finite initial water depth, and [`WatershedError::Render`] for an
    /// image smaller than 2 pixels or a water scale that is not positive.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_water.is_finite() || self.initial_water < 0.0 {
            return Err(WatershedError::InvalidParameter {
                name: "initial_water",
                value: self.initial_water,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if self.image_size < 2 {
            return Err(WatershedError::Render(format!(
                "image size must be at least 2, got {}",
                self.image_size
            )));
        }
        let scale = self.effective_water_scale();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(WatershedError::Render(format!(
                "water scale must be positive, got {scale}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        config.validate().unwrap();
        assert_eq!(config.effective_water_scale(), 2.0);
    }

    #[test]
    fn test_snapshot_schedule() {
        let config = SimulationConfig {
            iterations: 10,
            snapshot_every: 4,
            ..SimulationConfig::default()
        };
        let frames: Vec<usize> = (0..10).filter(|&i| config.is_snapshot_step(i)).collect();
        assert_eq!(frames, vec![0, 4, 8, 9]);

        let final_only = SimulationConfig {
            snapshot_every: 0,
            ..config
        };
        assert!((0..10).all(|i| !final_only.is_snapshot_step(i)));
    }

    #[test]
    fn test_dry_start_needs_explicit_scale() {
        let mut config = SimulationConfig {
            initial_water: 0.0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Render);
        config.water_scale = Some(0.5);
        config.validate().unwrap();
    }

    #[test]
    fn test_negative_initial_water() {
        let config = SimulationConfig {
            initial_water: -1.0,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::Parameter);
    }

    #[test]
    fn test_partial_json() {
        let config: SimulationConfig = serde_json::from_str(
            r#"{ "iterations": 25, "params": { "flow_coef": 0.05, "evap_coef": 0.99 } }"#,
        )
        .unwrap();
        assert_eq!(config.iterations, 25);
        assert_eq!(config.params.flow_coef(), 0.05);
        assert_eq!(config.image_size, 800);

        let bad = serde_json::from_str::<SimulationConfig>(
            r#"{ "params": { "flow_coef": 0.5, "evap_coef": 0.99 } }"#,
        );
        assert!(bad.is_err());
    }
}
