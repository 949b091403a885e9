//! Normalization of raw host-simulation frames into [`VehicleState`].
//!
//! Hosts report whatever they have: position and velocity may be missing while
//! the aircraft is loading, ground elevation comes in feet, and gear is a
//! travel ratio rather than a flag.

use serde::{Deserialize, Serialize};

use crate::models::{GeoPosition, VehicleState, Velocity};

pub const FEET_TO_METERS: f64 = 0.3048;

/// Gear travel ratio below which the gear counts as extended (0 = down, 1 = up).
pub const GEAR_EXTENDED_BELOW: f64 = 0.5;

/// One raw frame from the host simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostTelemetry {
    /// `[lat, lon, altitude_msl_m]`
    pub lla: Option<[f64; 3]>,
    /// `[east, north, up]` in m/s
    pub velocity: Option<[f64; 3]>,
    /// Unknown ground speed never counts as slow enough to land
    pub ground_speed_mps: Option<f64>,
    pub ground_elevation_ft: Option<f64>,
    pub gear_position: Option<f64>,
    pub ground_contact: bool,
}

impl HostTelemetry {
    /// Build a [`VehicleState`], or `None` if position or velocity is absent.
    pub fn to_vehicle_state(&self) -> Option<VehicleState> {
        let [lat, lon, altitude_msl_m] = self.lla?;
        let [east_mps, north_mps, vertical_mps] = self.velocity?;

        // Unknown ground speed is NaN so the landing mute can never apply.
        let ground_speed_mps = self.ground_speed_mps.unwrap_or(f64::NAN);

        Some(VehicleState {
            position: GeoPosition {
                lat,
                lon,
                altitude_msl_m,
            },
            velocity: Velocity {
                east_mps,
                north_mps,
                vertical_mps,
            },
            ground_speed_mps,
            ground_elevation_m: ground_elevation_m(self.ground_elevation_ft),
            gear_extended: gear_extended(self.gear_position),
            on_ground: self.ground_contact,
        })
    }
}

/// Host ground elevation in meters; unknown or non-numeric reads as sea level.
pub fn ground_elevation_m(elevation_ft: Option<f64>) -> f64 {
    match elevation_ft {
        Some(feet) if feet.is_finite() => feet * FEET_TO_METERS,
        _ => 0.0,
    }
}

/// Unknown gear position reads as retracted.
pub fn gear_extended(gear_position: Option<f64>) -> bool {
    gear_position.is_some_and(|ratio| ratio < GEAR_EXTENDED_BELOW)
}
