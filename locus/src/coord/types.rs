//! Coordinate value types.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors raised when a coordinate or grid is out of range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be within -90..=90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be within -180..=180)")]
    InvalidLongitude(f64),

    #[error("Invalid sample grid: {0}")]
    InvalidGrid(String),
}

/// A geographic position in degrees.
///
/// Serialized as `{"lat": .., "lon": ..}`, the shape used by both the search
/// config and the location databases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Creates a validated coordinate.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        let coord = Self { lat, lon };
        coord.validate()?;
        Ok(coord)
    }

    /// Checks that latitude and longitude are finite and within range.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(CoordError::InvalidLatitude(self.lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&self.lon) {
            return Err(CoordError::InvalidLongitude(self.lon));
        }
        Ok(())
    }

    /// Planar position: `x` is longitude, `y` is latitude.
    #[inline]
    pub fn to_xy(self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    /// Inverse of [`LatLon::to_xy`].
    #[inline]
    pub fn from_xy(x: f64, y: f64) -> Self {
        Self { lat: y, lon: x }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Rectangular sampling grid over a bounding region.
///
/// `top_left` and `bottom_right` are the grid's corner samples; the grid has
/// `n_points_lat` rows and `n_points_lon` columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleGrid {
    pub top_left: LatLon,
    pub bottom_right: LatLon,
    pub n_points_lat: usize,
    pub n_points_lon: usize,
}

impl SampleGrid {
    /// Total number of sample points.
    pub fn len(&self) -> usize {
        self.n_points_lat * self.n_points_lon
    }

    /// Returns true if the grid has no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The four corners, clockwise from the top left.
    pub fn corners(&self) -> [LatLon; 4] {
        [
            self.top_left,
            LatLon {
                lat: self.top_left.lat,
                lon: self.bottom_right.lon,
            },
            self.bottom_right,
            LatLon {
                lat: self.bottom_right.lat,
                lon: self.top_left.lon,
            },
        ]
    }
}
