//! Flight profiles for the simulated host vehicle.

use gpws_core::spatial::offset_meters;
use gpws_core::{GeoPosition, TerrainGrid, VehicleState, Velocity};
use std::sync::Arc;

/// Trait for flight profile implementations.
pub trait FlightProfile: Send + Sync {
    /// Vehicle state `t` seconds after the start of the profile.
    fn state_at(&self, t: f64) -> VehicleState;
}

/// Constant-velocity flight over a terrain grid.
///
/// The vehicle settles onto the terrain (and reports ground contact) once its
/// altitude would drop below the ground.
pub struct LinearProfile {
    pub start_lat: f64,
    pub start_lon: f64,
    pub start_altitude_msl_m: f64,
    pub velocity: Velocity,
    pub gear_extended: bool,
    terrain: Arc<TerrainGrid>,
}

impl LinearProfile {
    /// # Arguments
    /// * `start_lat`, `start_lon` - Starting position
    /// * `start_agl_m` - Starting height above the terrain grid
    /// * `heading_deg` - Track over ground (0 = North, clockwise)
    /// * `speed_mps` - Ground speed
    /// * `vertical_mps` - Vertical speed, positive = climbing
    /// * `gear_extended` - Landing gear down
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        terrain: Arc<TerrainGrid>,
        start_lat: f64,
        start_lon: f64,
        start_agl_m: f64,
        heading_deg: f64,
        speed_mps: f64,
        vertical_mps: f64,
        gear_extended: bool,
    ) -> Self {
        let ground = terrain.sample(start_lat, start_lon).unwrap_or(0.0);
        let heading_rad = heading_deg.to_radians();
        Self {
            start_lat,
            start_lon,
            start_altitude_msl_m: ground + start_agl_m,
            velocity: Velocity {
                east_mps: speed_mps * heading_rad.sin(),
                north_mps: speed_mps * heading_rad.cos(),
                vertical_mps,
            },
            gear_extended,
            terrain,
        }
    }

    fn speed_mps(&self) -> f64 {
        self.velocity.east_mps.hypot(self.velocity.north_mps)
    }
}

impl FlightProfile for LinearProfile {
    fn state_at(&self, t: f64) -> VehicleState {
        let (lat, lon) = offset_meters(
            self.start_lat,
            self.start_lon,
            self.velocity.east_mps * t,
            self.velocity.north_mps * t,
        )
        .unwrap_or((self.start_lat, self.start_lon));

        let ground = self.terrain.sample(lat, lon).unwrap_or(0.0);
        let altitude = self.start_altitude_msl_m + self.velocity.vertical_mps * t;

        if altitude <= ground {
            return VehicleState {
                position: GeoPosition {
                    lat,
                    lon,
                    altitude_msl_m: ground,
                },
                velocity: Velocity {
                    vertical_mps: 0.0,
                    ..self.velocity
                },
                ground_speed_mps: self.speed_mps(),
                ground_elevation_m: ground,
                gear_extended: self.gear_extended,
                on_ground: true,
            };
        }

        VehicleState {
            position: GeoPosition {
                lat,
                lon,
                altitude_msl_m: altitude,
            },
            velocity: self.velocity,
            ground_speed_mps: self.speed_mps(),
            ground_elevation_m: ground,
            gear_extended: self.gear_extended,
            on_ground: false,
        }
    }
}
