//! Pre-defined flight scenarios over synthetic terrain.

use super::paths::{FlightProfile, LinearProfile};
use gpws_core::spatial::METERS_PER_DEG_LAT;
use gpws_core::{TerrainGrid, ThreatDecision};
use std::fmt;
use std::sync::Arc;

/// Grid half-width around the scenario center (degrees).
const GRID_HALF_SPAN_DEG: f64 = 0.1;
const GRID_STEP_DEG: f64 = 0.002;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScenarioKind {
    /// Level flight toward a ridge
    Cfit,
    /// Gear-down stabilized approach over flat terrain
    Approach,
    /// Cruise well above the radar-altimeter ceiling
    Cruise,
    /// Gear down just above the runway, climbing
    Flare,
    /// Gear down but sinking faster than any approach would
    Sink,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::Cfit,
        ScenarioKind::Approach,
        ScenarioKind::Cruise,
        ScenarioKind::Flare,
        ScenarioKind::Sink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::Cfit => "cfit",
            ScenarioKind::Approach => "approach",
            ScenarioKind::Cruise => "cruise",
            ScenarioKind::Flare => "flare",
            ScenarioKind::Sink => "sink",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named scenario: one vehicle profile and the terrain it flies over.
pub struct Scenario {
    pub kind: ScenarioKind,
    pub description: String,
    pub profile: Arc<dyn FlightProfile>,
    pub terrain: Arc<TerrainGrid>,
    /// Decision the scenario should settle into
    pub expected: ThreatDecision,
    /// Seconds into the profile at which `expected` holds
    pub expected_at_s: f64,
}

/// Build a scenario centered on the given point. `None` if the terrain grid
/// cannot be built there.
pub fn create_scenario(kind: ScenarioKind, center_lat: f64, center_lon: f64) -> Option<Scenario> {
    match kind {
        ScenarioKind::Cfit => create_cfit_scenario(center_lat, center_lon),
        ScenarioKind::Approach => create_approach_scenario(center_lat, center_lon),
        ScenarioKind::Cruise => create_cruise_scenario(center_lat, center_lon),
        ScenarioKind::Flare => create_flare_scenario(center_lat, center_lon),
        ScenarioKind::Sink => create_sink_scenario(center_lat, center_lon),
    }
}

/// Flat plain at `base_m` with an east-west ridge `ridge_north_m` north of the
/// center, peaking `ridge_height_m` above the plain.
pub fn ridge_terrain(
    center_lat: f64,
    center_lon: f64,
    base_m: f64,
    ridge_north_m: f64,
    ridge_height_m: f64,
) -> Option<TerrainGrid> {
    let ridge_lat = center_lat + ridge_north_m / METERS_PER_DEG_LAT;
    let ridge_width_deg = 800.0 / METERS_PER_DEG_LAT;
    let rows = (2.0 * GRID_HALF_SPAN_DEG / GRID_STEP_DEG).round() as usize + 1;

    TerrainGrid::from_fn(
        center_lat - GRID_HALF_SPAN_DEG,
        center_lon - GRID_HALF_SPAN_DEG,
        GRID_STEP_DEG,
        GRID_STEP_DEG,
        rows,
        rows,
        |lat, _lon| {
            let d = (lat - ridge_lat) / ridge_width_deg;
            base_m + ridge_height_m * (-d * d).exp()
        },
    )
}

pub fn flat_terrain(center_lat: f64, center_lon: f64, elevation_m: f64) -> Option<TerrainGrid> {
    ridge_terrain(center_lat, center_lon, elevation_m, 0.0, 0.0)
}

fn build(
    kind: ScenarioKind,
    description: &str,
    terrain: Option<TerrainGrid>,
    make_profile: impl FnOnce(Arc<TerrainGrid>) -> LinearProfile,
    expected: ThreatDecision,
    expected_at_s: f64,
) -> Option<Scenario> {
    let terrain = Arc::new(terrain?);
    let profile = Arc::new(make_profile(terrain.clone()));
    Some(Scenario {
        kind,
        description: description.to_string(),
        profile,
        terrain,
        expected,
        expected_at_s,
    })
}

/// Level at 450 m AGL, 90 m/s north, toward a 600 m ridge 4 km ahead.
pub fn create_cfit_scenario(center_lat: f64, center_lon: f64) -> Option<Scenario> {
    build(
        ScenarioKind::Cfit,
        "Level flight at 450 m AGL toward a 600 m ridge",
        ridge_terrain(center_lat, center_lon, 300.0, 4000.0, 600.0),
        |terrain| LinearProfile::new(terrain, center_lat, center_lon, 450.0, 0.0, 90.0, 0.0, false),
        ThreatDecision::Warn,
        30.0,
    )
}

/// Gear down, 300 m AGL, 70 m/s, sinking 3.5 m/s over flat ground.
pub fn create_approach_scenario(center_lat: f64, center_lon: f64) -> Option<Scenario> {
    build(
        ScenarioKind::Approach,
        "Stabilized gear-down approach, 3.5 m/s sink",
        flat_terrain(center_lat, center_lon, 150.0),
        |terrain| LinearProfile::new(terrain, center_lat, center_lon, 300.0, 90.0, 70.0, -3.5, true),
        ThreatDecision::Suppressed,
        20.0,
    )
}

/// 1500 m AGL, well above the ceiling, over the same ridge.
pub fn create_cruise_scenario(center_lat: f64, center_lon: f64) -> Option<Scenario> {
    build(
        ScenarioKind::Cruise,
        "Cruise at 1500 m AGL over a ridge",
        ridge_terrain(center_lat, center_lon, 300.0, 4000.0, 600.0),
        |terrain| LinearProfile::new(terrain, center_lat, center_lon, 1500.0, 0.0, 120.0, 0.0, false),
        ThreatDecision::Inactive,
        30.0,
    )
}

/// Gear down at 30 m AGL, climbing out at 2 m/s.
pub fn create_flare_scenario(center_lat: f64, center_lon: f64) -> Option<Scenario> {
    build(
        ScenarioKind::Flare,
        "Go-around from 30 m AGL with gear down",
        flat_terrain(center_lat, center_lon, 20.0),
        |terrain| LinearProfile::new(terrain, center_lat, center_lon, 30.0, 180.0, 65.0, 2.0, true),
        ThreatDecision::Suppressed,
        2.0,
    )
}

/// Gear down at 400 m AGL but sinking 12 m/s: too fast to be a landing.
pub fn create_sink_scenario(center_lat: f64, center_lon: f64) -> Option<Scenario> {
    build(
        ScenarioKind::Sink,
        "Gear down, 12 m/s sink from 400 m AGL",
        flat_terrain(center_lat, center_lon, 100.0),
        |terrain| LinearProfile::new(terrain, center_lat, center_lon, 400.0, 270.0, 80.0, -12.0, true),
        ThreatDecision::Warn,
        10.0,
    )
}
