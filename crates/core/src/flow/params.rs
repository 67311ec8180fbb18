//! Flow and evaporation coefficients

use crate::error::{Result, WatershedError};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Allowed range for the flow coefficient
pub const FLOW_COEF_RANGE: RangeInclusive<f64> = 0.0..=0.2;
/// Allowed range for the evaporation coefficient
pub const EVAP_COEF_RANGE: RangeInclusive<f64> = 0.9..=1.0;

/// Validated simulation coefficients.
///
/// Construct with [`SimulationParams::new`]; fields are private so an
/// out-of-range pair can never reach the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams", into = "RawParams")]
pub struct SimulationParams {
    flow_coef: f64,
    evap_coef: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            flow_coef: 0.1,
            evap_coef: 0.95,
        }
    }
}

impl SimulationParams {
    /// # Errors
    /// Returns [`WatershedError::InvalidParameter`] unless
    /// `flow_coef ∈ [0, 0.2]` and `evap_coef ∈ [0.9, 1]`.
    pub fn new(flow_coef: f64, evap_coef: f64) -> Result<Self> {
        check("flow_coef", flow_coef, &FLOW_COEF_RANGE)?;
        check("evap_coef", evap_coef, &EVAP_COEF_RANGE)?;
        Ok(SimulationParams {
            flow_coef,
            evap_coef,
        })
    }

    /// Fraction of head difference moved between neighbors per step
    pub fn flow_coef(&self) -> f64 {
        self.flow_coef
    }

    /// Multiplicative water retention per step
    pub fn evap_coef(&self) -> f64 {
        self.evap_coef
    }
}

fn check(name: &'static str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(WatershedError::InvalidParameter {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Unvalidated serde mirror of [`SimulationParams`].
#[derive(Serialize, Deserialize)]
struct RawParams {
    flow_coef: f64,
    evap_coef: f64,
}

impl TryFrom<RawParams> for SimulationParams {
    type Error = WatershedError;

    fn try_from(raw: RawParams) -> Result<Self> {
        SimulationParams::new(raw.flow_coef, raw.evap_coef)
    }
}

impl From<SimulationParams> for RawParams {
    fn from(params: SimulationParams) -> Self {
        RawParams {
            flow_coef: params.flow_coef,
            evap_coef: params.evap_coef,
        }
    }
}
