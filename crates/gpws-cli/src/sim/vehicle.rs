//! Simulated host vehicle.

use super::paths::FlightProfile;
use gpws_core::{VehicleState, VehicleStateSource};
use std::sync::Arc;
use tokio::time::Instant;

/// Replays a [`FlightProfile`] against the (tokio) clock.
pub struct SimulatedVehicle {
    profile: Arc<dyn FlightProfile>,
    started: Instant,
    time_scale: f64,
}

impl SimulatedVehicle {
    /// `time_scale` > 1 fast-forwards the profile.
    pub fn new(profile: Arc<dyn FlightProfile>, time_scale: f64) -> Self {
        let time_scale = if time_scale.is_finite() && time_scale > 0.0 {
            time_scale
        } else {
            1.0
        };
        Self {
            profile,
            started: Instant::now(),
            time_scale,
        }
    }

    /// Seconds into the profile.
    pub fn profile_time_s(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * self.time_scale
    }
}

impl VehicleStateSource for SimulatedVehicle {
    fn vehicle_state(&self) -> Option<VehicleState> {
        Some(self.profile.state_at(self.profile_time_s()))
    }
}
