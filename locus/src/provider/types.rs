//! Provider traits and shared request/response types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{LatLon, SampleGrid};

/// Isochrone durations (minutes) the routing provider accepts.
pub const SUPPORTED_CONTOURS: [u32; 7] = [5, 10, 20, 30, 40, 50, 60];

/// Errors from routing and elevation providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The body could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported travel profile: {0} (expected driving, walking or cycling)")]
    UnsupportedProfile(String),

    #[error("Unsupported isochrone duration: {0} minutes")]
    UnsupportedDuration(u32),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::HttpError(_) | ProviderError::Timeout(_) => true,
            ProviderError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Travel mode for isochrone requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    Driving,
    Walking,
    Cycling,
}

impl TravelProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
            TravelProfile::Cycling => "cycling",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelProfile {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "driving" => Ok(TravelProfile::Driving),
            "walking" => Ok(TravelProfile::Walking),
            "cycling" => Ok(TravelProfile::Cycling),
            _ => Err(ProviderError::UnsupportedProfile(s.to_string())),
        }
    }
}

/// Checks an isochrone duration against [`SUPPORTED_CONTOURS`].
pub fn validate_contour(minutes: u32) -> Result<u32, ProviderError> {
    if SUPPORTED_CONTOURS.contains(&minutes) {
        Ok(minutes)
    } else {
        Err(ProviderError::UnsupportedDuration(minutes))
    }
}

/// A single isochrone request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsochroneRequest {
    pub profile: TravelProfile,
    pub origin: LatLon,
    pub minutes: u32,
}

/// A closed ring as parallel longitude/latitude sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
}

impl Ring {
    /// Builds a ring from `[lon, lat]` positions.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (lon, lat) = positions.into_iter().unzip();
        Self { lon, lat }
    }

    pub fn len(&self) -> usize {
        self.lon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }
}

/// One elevation sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationSample {
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
}

impl ElevationSample {
    pub fn position(&self) -> LatLon {
        LatLon {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Computes travel-time isochrones.
pub trait RoutingProvider: Send + Sync {
    /// Fetches the isochrone for a request.
    ///
    /// Returns one or more rings; disjoint reachable areas come back as
    /// separate rings.
    fn isochrone(&self, request: &IsochroneRequest) -> Result<Vec<Ring>, ProviderError>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

/// Samples terrain elevation over a grid.
pub trait ElevationProvider: Send + Sync {
    /// Fetches elevation samples for every point of the grid.
    ///
    /// Points the provider has no data for may be missing from the result.
    fn elevations(&self, grid: &SampleGrid) -> Result<Vec<ElevationSample>, ProviderError>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parsing() {
        assert_eq!("driving".parse::<TravelProfile>().unwrap(), TravelProfile::Driving);
        assert_eq!("Walking".parse::<TravelProfile>().unwrap(), TravelProfile::Walking);
        assert_eq!(
            "flying".parse::<TravelProfile>(),
            Err(ProviderError::UnsupportedProfile("flying".to_string()))
        );
    }

    #[test]
    fn test_validate_contour() {
        for minutes in SUPPORTED_CONTOURS {
            assert_eq!(validate_contour(minutes), Ok(minutes));
        }
        assert_eq!(validate_contour(15), Err(ProviderError::UnsupportedDuration(15)));
        assert_eq!(validate_contour(0), Err(ProviderError::UnsupportedDuration(0)));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::HttpError("reset".into()).is_transient());
        assert!(ProviderError::Timeout("30s".into()).is_transient());
        assert!(ProviderError::HttpStatus { status: 503, url: String::new() }.is_transient());
        assert!(ProviderError::HttpStatus { status: 429, url: String::new() }.is_transient());
        assert!(!ProviderError::HttpStatus { status: 401, url: String::new() }.is_transient());
        assert!(!ProviderError::InvalidResponse("bad".into()).is_transient());
    }

    #[test]
    fn test_ring_from_positions() {
        let ring = Ring::from_positions(vec![(18.0, 45.0), (18.1, 45.0), (18.1, 45.1)]);
        assert_eq!(ring.lon, vec![18.0, 18.1, 18.1]);
        assert_eq!(ring.lat, vec![45.0, 45.0, 45.1]);
        assert_eq!(ring.len(), 3);
    }
}
