//! Data models for vehicle state, projections and threat decisions.

use serde::{Deserialize, Serialize};

/// Geodetic position of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
    /// Altitude above mean sea level
    pub altitude_msl_m: f64,
}

/// Velocity over the ground plus vertical rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub east_mps: f64,
    pub north_mps: f64,
    /// Vertical speed, positive = climbing
    pub vertical_mps: f64,
}

/// Snapshot of the host vehicle, produced once per tick by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    pub position: GeoPosition,
    pub velocity: Velocity,
    pub ground_speed_mps: f64,
    /// Terrain elevation directly below the vehicle, as reported by the host
    pub ground_elevation_m: f64,
    pub gear_extended: bool,
    pub on_ground: bool,
}

impl VehicleState {
    /// Altitude above ground level.
    pub fn agl_m(&self) -> f64 {
        self.position.altitude_msl_m - self.ground_elevation_m
    }

    pub fn vertical_speed_mps(&self) -> f64 {
        self.velocity.vertical_mps
    }
}

/// Future position of the vehicle at the end of the lookahead horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Outcome of one threat evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatDecision {
    /// Outside the operating envelope (above ceiling or on the ground)
    Inactive,
    /// Inside the envelope but muted by a landing safety filter
    Suppressed,
    /// No terrain threat, or not enough data to claim one
    Clear,
    /// Pull up
    Warn,
}

impl ThreatDecision {
    pub fn is_warn(self) -> bool {
        matches!(self, ThreatDecision::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agl_is_msl_minus_ground() {
        let state = VehicleState {
            position: GeoPosition {
                lat: 46.0,
                lon: 7.0,
                altitude_msl_m: 2100.0,
            },
            velocity: Velocity {
                east_mps: 0.0,
                north_mps: 60.0,
                vertical_mps: -3.0,
            },
            ground_speed_mps: 60.0,
            ground_elevation_m: 1800.0,
            gear_extended: false,
            on_ground: false,
        };
        assert_eq!(state.agl_m(), 300.0);
        assert_eq!(state.vertical_speed_mps(), -3.0);
    }

    #[test]
    fn decision_serializes_lowercase() {
        let json = serde_json::to_string(&ThreatDecision::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        assert!(ThreatDecision::Warn.is_warn());
        assert!(!ThreatDecision::Suppressed.is_warn());
    }
}
