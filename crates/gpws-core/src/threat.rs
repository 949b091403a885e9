//! Threat evaluation: the priority cascade that turns vehicle state and a
//! terrain projection into a [`ThreatDecision`].
//!
//! Rules are checked in [`ThreatRule::CASCADE`] order and the first one that
//! applies decides. Safety mutes (ceiling, ground contact, flare, landing
//! approach) always outrank the terrain check, and a missing projection never
//! escalates to a warning.

use serde::{Deserialize, Serialize};

use crate::models::{ThreatDecision, VehicleState};
use crate::rules::AlertThresholds;

/// The per-tick inputs the cascade looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatInputs {
    pub agl_m: f64,
    /// Positive = climbing
    pub vertical_speed_mps: f64,
    pub ground_speed_mps: f64,
    pub gear_extended: bool,
    pub on_ground: bool,
}

impl ThreatInputs {
    pub fn from_vehicle(vehicle: &VehicleState) -> Self {
        Self {
            agl_m: vehicle.agl_m(),
            vertical_speed_mps: vehicle.vertical_speed_mps(),
            ground_speed_mps: vehicle.ground_speed_mps,
            gear_extended: vehicle.gear_extended,
            on_ground: vehicle.on_ground,
        }
    }
}

/// The rule that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatRule {
    /// AGL above the radar-altimeter ceiling
    AboveCeiling,
    /// Ground contact reported by the host
    OnGround,
    /// Gear down, very low and climbing
    LandingFlare,
    /// Gear down, low, slow and sinking gently
    LandingApproach,
    /// Future position or terrain elevation unknown
    NoProjection,
    /// Projected clearance below the hard floor
    ClearanceFloor,
    /// Moderate projected clearance while sinking fast
    SinkingClearance,
    /// Nothing applies
    Nominal,
}

impl ThreatRule {
    /// Evaluation order. `Nominal` is the fallback and is not listed.
    pub const CASCADE: [ThreatRule; 7] = [
        ThreatRule::AboveCeiling,
        ThreatRule::OnGround,
        ThreatRule::LandingFlare,
        ThreatRule::LandingApproach,
        ThreatRule::NoProjection,
        ThreatRule::ClearanceFloor,
        ThreatRule::SinkingClearance,
    ];

    /// The prefix of the cascade that does not need a terrain projection.
    pub const SAFETY_MUTES: [ThreatRule; 4] = [
        ThreatRule::AboveCeiling,
        ThreatRule::OnGround,
        ThreatRule::LandingFlare,
        ThreatRule::LandingApproach,
    ];

    pub fn decision(self) -> ThreatDecision {
        match self {
            ThreatRule::AboveCeiling | ThreatRule::OnGround => ThreatDecision::Inactive,
            ThreatRule::LandingFlare | ThreatRule::LandingApproach => ThreatDecision::Suppressed,
            ThreatRule::NoProjection | ThreatRule::Nominal => ThreatDecision::Clear,
            ThreatRule::ClearanceFloor | ThreatRule::SinkingClearance => ThreatDecision::Warn,
        }
    }

    /// Whether this rule matches. Only meaningful in cascade order: each rule
    /// assumes every earlier rule did not match.
    fn applies(
        self,
        inputs: &ThreatInputs,
        projected_clearance_m: Option<f64>,
        rules: &AlertThresholds,
    ) -> bool {
        let agl = inputs.agl_m;
        let vz = inputs.vertical_speed_mps;

        match self {
            ThreatRule::AboveCeiling => agl > rules.ceiling_agl_m,
            ThreatRule::OnGround => inputs.on_ground,
            ThreatRule::LandingFlare => agl < rules.flare_agl_m && inputs.gear_extended && vz > 0.0,
            ThreatRule::LandingApproach => {
                inputs.gear_extended
                    && agl < rules.landing_mute_agl_m
                    && vz > rules.landing_mute_min_vz_mps
                    && vz < rules.landing_mute_max_vz_mps
                    && inputs.ground_speed_mps < rules.landing_mute_max_ground_speed_mps
            }
            ThreatRule::NoProjection => projected_clearance_m.is_none(),
            ThreatRule::ClearanceFloor => {
                projected_clearance_m.is_some_and(|c| c < rules.warn_clearance_m)
            }
            ThreatRule::SinkingClearance => projected_clearance_m
                .is_some_and(|c| c < rules.sink_clearance_m && vz < rules.warn_sink_rate_mps),
            ThreatRule::Nominal => true,
        }
    }
}

/// First safety mute that applies, if any. Needs no terrain data.
pub fn safety_mute(inputs: &ThreatInputs, rules: &AlertThresholds) -> Option<ThreatRule> {
    ThreatRule::SAFETY_MUTES
        .into_iter()
        .find(|rule| rule.applies(inputs, None, rules))
}

/// Run the full cascade and report which rule decided.
pub fn assess(
    inputs: &ThreatInputs,
    projected_clearance_m: Option<f64>,
    rules: &AlertThresholds,
) -> ThreatRule {
    ThreatRule::CASCADE
        .into_iter()
        .find(|rule| rule.applies(inputs, projected_clearance_m, rules))
        .unwrap_or(ThreatRule::Nominal)
}

/// Decide for a vehicle given its projected terrain clearance.
pub fn evaluate(
    vehicle: &VehicleState,
    projected_clearance_m: Option<f64>,
    rules: &AlertThresholds,
) -> ThreatDecision {
    assess(&ThreatInputs::from_vehicle(vehicle), projected_clearance_m, rules).decision()
}

/// Clearance between where the vehicle will be after `horizon_s` at its current
/// vertical speed and the terrain under its projected position.
pub fn projected_clearance(
    altitude_msl_m: f64,
    vertical_speed_mps: f64,
    horizon_s: f64,
    future_ground_elevation_m: f64,
) -> f64 {
    (altitude_msl_m + vertical_speed_mps * horizon_s) - future_ground_elevation_m
}
