//! Flat-earth projection of the vehicle's future position.
//!
//! The lookahead horizon is tens of seconds, so a local tangent-plane
//! approximation is enough. Longitude degrees shrink toward the poles and are
//! scaled by `cos(lat)`.

use crate::models::{GeoPosition, ProjectedPoint, Velocity};

pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Longitude scale (m/deg) below which the position counts as at a pole.
/// `cos(90°)` is about 6e-17 in floating point, not zero.
const MIN_METERS_PER_DEG_LON: f64 = 1e-6;

/// Meters spanned by one degree of longitude at the given latitude.
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    METERS_PER_DEG_LAT * lat_deg.to_radians().cos()
}

/// Shift a lat/lon by a local east/north displacement in meters.
///
/// Returns `None` when any input or the shifted result is non-finite, or at a
/// pole where longitude is undefined.
pub fn offset_meters(lat: f64, lon: f64, east_m: f64, north_m: f64) -> Option<(f64, f64)> {
    if !lat.is_finite() || !lon.is_finite() || !east_m.is_finite() || !north_m.is_finite() {
        return None;
    }

    let lon_scale = meters_per_deg_lon(lat);
    if lon_scale.abs() < MIN_METERS_PER_DEG_LON {
        return None;
    }

    let delta_lat = north_m / METERS_PER_DEG_LAT;
    let delta_lon = east_m / lon_scale;

    let new_lat = lat + delta_lat;
    let new_lon = lon + delta_lon;
    if !new_lat.is_finite() || !new_lon.is_finite() {
        return None;
    }
    Some((new_lat, new_lon))
}

/// Extrapolate the vehicle's position `horizon_s` seconds ahead.
///
/// Returns `None` if the position or velocity is unset (non-finite) or the
/// projection cannot be computed.
pub fn project(
    position: &GeoPosition,
    velocity: &Velocity,
    horizon_s: f64,
) -> Option<ProjectedPoint> {
    if !horizon_s.is_finite() {
        return None;
    }
    let dist_east = velocity.east_mps * horizon_s;
    let dist_north = velocity.north_mps * horizon_s;

    offset_meters(position.lat, position.lon, dist_east, dist_north)
        .map(|(lat, lon)| ProjectedPoint { lat, lon })
}
