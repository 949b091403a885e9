//! Alerting thresholds for the terrain-avoidance core.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// AGL above which the system is inactive (2500 ft).
pub const CEILING_AGL_M: f64 = 762.0;
/// AGL below which a climbing, gear-down vehicle is treated as flaring.
pub const FLARE_AGL_M: f64 = 50.0;
/// AGL below which a gear-down, gently sinking vehicle is treated as landing.
pub const LANDING_MUTE_AGL_M: f64 = 500.0;
/// Lower (exclusive) bound of the landing-mute vertical speed band.
pub const LANDING_MUTE_MIN_VZ_MPS: f64 = -10.0;
/// Upper (exclusive) bound of the landing-mute vertical speed band.
pub const LANDING_MUTE_MAX_VZ_MPS: f64 = 0.0;
/// Ground speed below which the landing mute may apply (~200 kt).
pub const LANDING_MUTE_MAX_GROUND_SPEED_MPS: f64 = 103.0;
/// Lookahead used for terrain projection.
pub const HORIZON_S: f64 = 15.0;
/// Projected clearance below which a warning is always raised.
pub const WARN_CLEARANCE_M: f64 = 100.0;
/// Projected clearance below which a warning is raised while sinking fast.
pub const SINK_CLEARANCE_M: f64 = 200.0;
/// Vertical speed below which the vehicle counts as sinking fast.
pub const WARN_SINK_RATE_MPS: f64 = -5.0;
/// Sequencer tick period (4 Hz).
pub const TICK_PERIOD_MS: u64 = 250;
/// Minimum spacing between two audio alert requests.
pub const AUDIO_COOLDOWN_MS: u64 = 4500;

/// Configuration for alerting thresholds.
///
/// Every field defaults to the matching module constant, so a partial JSON
/// document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Inactive above this AGL (meters)
    pub ceiling_agl_m: f64,
    /// Flare mute applies below this AGL (meters)
    pub flare_agl_m: f64,
    /// Landing mute applies below this AGL (meters)
    pub landing_mute_agl_m: f64,
    /// Landing mute vertical speed band, exclusive on both ends (m/s)
    pub landing_mute_min_vz_mps: f64,
    pub landing_mute_max_vz_mps: f64,
    /// Landing mute applies below this ground speed (m/s)
    pub landing_mute_max_ground_speed_mps: f64,
    /// Terrain projection lookahead (seconds)
    pub horizon_s: f64,
    /// Always warn below this projected clearance (meters)
    pub warn_clearance_m: f64,
    /// Warn below this projected clearance when sinking fast (meters)
    pub sink_clearance_m: f64,
    /// Sinking fast means vertical speed below this (m/s)
    pub warn_sink_rate_mps: f64,
    /// Sequencer tick period (milliseconds)
    pub tick_period_ms: u64,
    /// Audio cooldown (milliseconds)
    pub audio_cooldown_ms: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            ceiling_agl_m: CEILING_AGL_M,
            flare_agl_m: FLARE_AGL_M,
            landing_mute_agl_m: LANDING_MUTE_AGL_M,
            landing_mute_min_vz_mps: LANDING_MUTE_MIN_VZ_MPS,
            landing_mute_max_vz_mps: LANDING_MUTE_MAX_VZ_MPS,
            landing_mute_max_ground_speed_mps: LANDING_MUTE_MAX_GROUND_SPEED_MPS,
            horizon_s: HORIZON_S,
            warn_clearance_m: WARN_CLEARANCE_M,
            sink_clearance_m: SINK_CLEARANCE_M,
            warn_sink_rate_mps: WARN_SINK_RATE_MPS,
            tick_period_ms: TICK_PERIOD_MS,
            audio_cooldown_ms: AUDIO_COOLDOWN_MS,
        }
    }
}

impl AlertThresholds {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms.max(1))
    }

    pub fn audio_cooldown(&self) -> Duration {
        Duration::from_millis(self.audio_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let rules = AlertThresholds::default();
        assert_eq!(rules.ceiling_agl_m, 762.0);
        assert_eq!(rules.horizon_s, 15.0);
        assert_eq!(rules.tick_period(), Duration::from_millis(250));
        assert_eq!(rules.audio_cooldown(), Duration::from_millis(4500));
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let rules: AlertThresholds =
            serde_json::from_str(r#"{ "ceiling_agl_m": 300.0, "audio_cooldown_ms": 1000 }"#)
                .unwrap();
        assert_eq!(rules.ceiling_agl_m, 300.0);
        assert_eq!(rules.audio_cooldown_ms, 1000);
        assert_eq!(rules.flare_agl_m, FLARE_AGL_M);
        assert_eq!(rules.warn_clearance_m, WARN_CLEARANCE_M);
    }

    #[test]
    fn zero_tick_period_is_clamped() {
        let rules = AlertThresholds {
            tick_period_ms: 0,
            ..AlertThresholds::default()
        };
        assert_eq!(rules.tick_period(), Duration::from_millis(1));
    }
}
