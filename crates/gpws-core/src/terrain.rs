//! Terrain elevation access.
//!
//! The core never owns terrain data; it asks a [`TerrainOracle`] for the ground
//! elevation at a single point and normalizes whatever comes back.

use crate::models::ProjectedPoint;

/// Read-only elevation query service.
///
/// Implementations must answer without blocking the caller; if the elevation is
/// not known yet (tile not loaded, request in flight) they return `None`.
pub trait TerrainOracle: Send + Sync {
    /// Ground elevation above mean sea level at `point`, in meters.
    fn ground_elevation(&self, point: ProjectedPoint) -> Option<f64>;
}

impl<F> TerrainOracle for F
where
    F: Fn(ProjectedPoint) -> Option<f64> + Send + Sync,
{
    fn ground_elevation(&self, point: ProjectedPoint) -> Option<f64> {
        self(point)
    }
}

/// Result of a single terrain query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerrainSample {
    Elevation(f64),
    Unavailable,
}

impl TerrainSample {
    pub fn elevation_m(self) -> Option<f64> {
        match self {
            TerrainSample::Elevation(value) => Some(value),
            TerrainSample::Unavailable => None,
        }
    }
}

/// Query the oracle once. Missing and non-numeric answers collapse into
/// [`TerrainSample::Unavailable`].
pub fn sample_elevation(oracle: &dyn TerrainOracle, point: ProjectedPoint) -> TerrainSample {
    match oracle.ground_elevation(point) {
        Some(value) if value.is_finite() => TerrainSample::Elevation(value),
        _ => TerrainSample::Unavailable,
    }
}

/// Regular lat/lon elevation grid with bilinear interpolation.
///
/// Points outside the grid bounds are reported as unavailable rather than
/// clamped to the edge.
#[derive(Debug, Clone)]
pub struct TerrainGrid {
    min_lat: f64,
    min_lon: f64,
    lat_step_deg: f64,
    lon_step_deg: f64,
    rows: usize,
    cols: usize,
    elevations_m: Vec<f64>,
}

impl TerrainGrid {
    /// Build a grid from row-major elevations, row 0 at `min_lat`.
    ///
    /// Returns `None` if the dimensions don't match the sample count or the
    /// steps are not positive.
    pub fn new(
        min_lat: f64,
        min_lon: f64,
        lat_step_deg: f64,
        lon_step_deg: f64,
        rows: usize,
        cols: usize,
        elevations_m: Vec<f64>,
    ) -> Option<Self> {
        if rows < 2 || cols < 2 || rows.checked_mul(cols)? != elevations_m.len() {
            return None;
        }
        if !(lat_step_deg > 0.0 && lon_step_deg > 0.0) {
            return None;
        }
        Some(Self {
            min_lat,
            min_lon,
            lat_step_deg,
            lon_step_deg,
            rows,
            cols,
            elevations_m,
        })
    }

    /// Build a grid by evaluating `elevation(lat, lon)` at every node.
    pub fn from_fn(
        min_lat: f64,
        min_lon: f64,
        lat_step_deg: f64,
        lon_step_deg: f64,
        rows: usize,
        cols: usize,
        elevation: impl Fn(f64, f64) -> f64,
    ) -> Option<Self> {
        let mut elevations = Vec::with_capacity(rows.saturating_mul(cols));
        for row in 0..rows {
            let lat = min_lat + row as f64 * lat_step_deg;
            for col in 0..cols {
                let lon = min_lon + col as f64 * lon_step_deg;
                elevations.push(elevation(lat, lon));
            }
        }
        Self::new(min_lat, min_lon, lat_step_deg, lon_step_deg, rows, cols, elevations)
    }

    pub fn max_lat(&self) -> f64 {
        self.min_lat + (self.rows - 1) as f64 * self.lat_step_deg
    }

    pub fn max_lon(&self) -> f64 {
        self.min_lon + (self.cols - 1) as f64 * self.lon_step_deg
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat() && lon >= self.min_lon && lon <= self.max_lon()
    }

    pub fn sample(&self, lat: f64, lon: f64) -> Option<f64> {
        if !lat.is_finite() || !lon.is_finite() || !self.contains(lat, lon) {
            return None;
        }

        let max_y = (self.rows - 1) as f64;
        let max_x = (self.cols - 1) as f64;
        let y = ((lat - self.min_lat) / self.lat_step_deg).clamp(0.0, max_y);
        let x = ((lon - self.min_lon) / self.lon_step_deg).clamp(0.0, max_x);

        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(self.rows - 1);
        let x1 = (x0 + 1).min(self.cols - 1);
        let dy = y - y0 as f64;
        let dx = x - x0 as f64;

        let v00 = self.value_at(y0, x0)?;
        let v10 = self.value_at(y0, x1)?;
        let v01 = self.value_at(y1, x0)?;
        let v11 = self.value_at(y1, x1)?;

        let v0 = v00 + (v10 - v00) * dx;
        let v1 = v01 + (v11 - v01) * dx;
        Some(v0 + (v1 - v0) * dy)
    }

    fn value_at(&self, row: usize, col: usize) -> Option<f64> {
        let idx = row.checked_mul(self.cols)? + col;
        self.elevations_m.get(idx).copied()
    }
}

impl TerrainOracle for TerrainGrid {
    fn ground_elevation(&self, point: ProjectedPoint) -> Option<f64> {
        self.sample(point.lat, point.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lon: f64) -> ProjectedPoint {
        ProjectedPoint { lat, lon }
    }

    #[test]
    fn missing_and_nan_are_both_unavailable() {
        let missing = |_: ProjectedPoint| -> Option<f64> { None };
        let nan = |_: ProjectedPoint| -> Option<f64> { Some(f64::NAN) };
        let inf = |_: ProjectedPoint| -> Option<f64> { Some(f64::INFINITY) };

        assert_eq!(sample_elevation(&missing, point(0.0, 0.0)), TerrainSample::Unavailable);
        assert_eq!(sample_elevation(&nan, point(0.0, 0.0)), TerrainSample::Unavailable);
        assert_eq!(sample_elevation(&inf, point(0.0, 0.0)), TerrainSample::Unavailable);
    }

    #[test]
    fn finite_elevation_passes_through() {
        let flat = |_: ProjectedPoint| -> Option<f64> { Some(312.5) };
        let sample = sample_elevation(&flat, point(1.0, 2.0));
        assert_eq!(sample, TerrainSample::Elevation(312.5));
        assert_eq!(sample.elevation_m(), Some(312.5));
    }

    #[test]
    fn grid_interpolates_between_nodes() {
        // 2x2 grid: south edge 0 m, north edge 100 m
        let grid = TerrainGrid::new(10.0, 20.0, 0.01, 0.01, 2, 2, vec![0.0, 0.0, 100.0, 100.0])
            .unwrap();

        let mid = grid.sample(10.005, 20.005).unwrap();
        assert!((mid - 50.0).abs() < 1e-6);
        assert_eq!(grid.sample(10.0, 20.0), Some(0.0));
    }

    #[test]
    fn grid_outside_bounds_is_unavailable() {
        let grid = TerrainGrid::from_fn(10.0, 20.0, 0.01, 0.01, 3, 3, |_, _| 42.0).unwrap();
        assert_eq!(grid.ground_elevation(point(9.99, 20.0)), None);
        assert_eq!(grid.ground_elevation(point(10.01, 20.03)), None);
        assert_eq!(grid.ground_elevation(point(10.01, 20.01)), Some(42.0));
    }

    #[test]
    fn grid_rejects_mismatched_dimensions() {
        assert!(TerrainGrid::new(0.0, 0.0, 0.1, 0.1, 2, 2, vec![0.0; 3]).is_none());
        assert!(TerrainGrid::new(0.0, 0.0, 0.0, 0.1, 2, 2, vec![0.0; 4]).is_none());
        assert!(TerrainGrid::new(0.0, 0.0, 0.1, 0.1, 1, 4, vec![0.0; 4]).is_none());
    }
}
