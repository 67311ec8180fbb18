//! Surface-water redistribution over a linked grid

mod params;
mod simulator;

pub use params::{SimulationParams, EVAP_COEF_RANGE, FLOW_COEF_RANGE};
pub use simulator::{next_water, FlowSimulator};
