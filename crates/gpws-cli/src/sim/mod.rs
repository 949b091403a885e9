//! Simulation module for exercising the alert loop without a real host.
//!
//! Provides flight profiles, synthetic terrain scenarios, a simulated vehicle
//! source and log-backed alert outputs.

mod paths;
mod scenarios;
mod signals;
mod vehicle;

pub use paths::{FlightProfile, LinearProfile};
pub use scenarios::{create_scenario, flat_terrain, ridge_terrain, Scenario, ScenarioKind};
pub use signals::{LogAudioAlert, LogVisualAlert, SignalCounts};
pub use vehicle::SimulatedVehicle;
