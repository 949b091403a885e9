//! GPWS CLI - scenario simulator for the terrain-avoidance alerting core.
//!
//! The `gpws-sim` binary flies a scripted vehicle over synthetic terrain and
//! runs the real alert loop against it.

pub mod sim;

pub use sim::{create_scenario, Scenario, ScenarioKind, SimulatedVehicle};
