//! One terrain scan: projector, terrain oracle and evaluator chained together.

use thiserror::Error;

use crate::models::{ProjectedPoint, ThreatDecision, VehicleState};
use crate::rules::AlertThresholds;
use crate::spatial;
use crate::terrain::{sample_elevation, TerrainOracle, TerrainSample};
use crate::threat::{assess, projected_clearance, safety_mute, ThreatInputs, ThreatRule};

/// Read-only access to the host vehicle.
pub trait VehicleStateSource: Send + Sync {
    /// Current vehicle snapshot, or `None` while the host has no complete state.
    fn vehicle_state(&self) -> Option<VehicleState>;
}

impl<F> VehicleStateSource for F
where
    F: Fn() -> Option<VehicleState> + Send + Sync,
{
    fn vehicle_state(&self) -> Option<VehicleState> {
        self()
    }
}

/// Reasons a scan could not compute a projected clearance. Every fault resolves
/// to a Clear decision.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScanFault {
    #[error("vehicle state missing or incomplete")]
    MissingInput,
    #[error("future position could not be computed")]
    ProjectionFailed,
    #[error("terrain elevation unavailable at {:.5}, {:.5}", .0.lat, .0.lon)]
    TerrainUnavailable(ProjectedPoint),
}

/// Outcome of a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scan {
    pub rule: ThreatRule,
    /// Projected clearance, when it was needed and could be computed
    pub clearance_m: Option<f64>,
    pub fault: Option<ScanFault>,
}

impl Scan {
    pub fn decision(&self) -> ThreatDecision {
        self.rule.decision()
    }
}

/// Evaluate one tick.
///
/// Safety mutes are checked first so that no terrain query is issued while the
/// system is inactive or suppressed.
pub fn scan(
    vehicle: Option<&VehicleState>,
    terrain: &dyn TerrainOracle,
    rules: &AlertThresholds,
) -> Scan {
    let Some(vehicle) = vehicle else {
        return Scan {
            rule: ThreatRule::NoProjection,
            clearance_m: None,
            fault: Some(ScanFault::MissingInput),
        };
    };

    let inputs = ThreatInputs::from_vehicle(vehicle);
    if let Some(rule) = safety_mute(&inputs, rules) {
        return Scan {
            rule,
            clearance_m: None,
            fault: None,
        };
    }

    let clearance = clearance_ahead(vehicle, terrain, rules);
    let clearance_m = clearance.ok();
    Scan {
        rule: assess(&inputs, clearance_m, rules),
        clearance_m,
        fault: clearance.err(),
    }
}

/// Projected clearance over the terrain the vehicle will reach at the horizon.
pub fn clearance_ahead(
    vehicle: &VehicleState,
    terrain: &dyn TerrainOracle,
    rules: &AlertThresholds,
) -> Result<f64, ScanFault> {
    let point = spatial::project(&vehicle.position, &vehicle.velocity, rules.horizon_s)
        .ok_or(ScanFault::ProjectionFailed)?;

    let future_ground_m = match sample_elevation(terrain, point) {
        TerrainSample::Elevation(value) => value,
        TerrainSample::Unavailable => return Err(ScanFault::TerrainUnavailable(point)),
    };

    Ok(projected_clearance(
        vehicle.position.altitude_msl_m,
        vehicle.vertical_speed_mps(),
        rules.horizon_s,
        future_ground_m,
    ))
}
