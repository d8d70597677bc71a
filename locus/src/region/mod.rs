//! Region synthesis.
//!
//! A [`Region`] is the geometry one location contributes: the polygons built
//! for it, the coordinates it was built from and any raw provider data
//! behind it. [`RegionGenerator`] builds regions per [`LocationKind`]:
//!
//! | Kind        | Regions             | Geometry                                      |
//! |-------------|---------------------|-----------------------------------------------|
//! | `isochrone` | one per coordinate  | provider rings, one polygon per ring          |
//! | `line`      | one                 | corridor around the path                      |
//! | `circle`    | one                 | aspect-corrected ellipse at the first point   |
//! | `elevation` | one                 | union of in-band Voronoi cells                |
//! | `standard`  | one                 | the coordinate ring itself                    |
//!
//! Provider results are stored in the [`CacheStore`](crate::cache::CacheStore)
//! and reused on later runs.
//!
//! [`LocationKind`]: crate::location::LocationKind

mod elevation;
mod generator;

pub use elevation::{band_cells, elevation_band};
pub use generator::RegionGenerator;

use geo::{MultiPolygon, Polygon};
use thiserror::Error;

use crate::cache::CacheError;
use crate::coord::LatLon;
use crate::geometry::GeometryError;
use crate::location::LocationDescriptor;
use crate::provider::{ElevationSample, ProviderError, Ring};

/// Errors that exclude a location from aggregation.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("Location '{location}': provider request failed: {source}")]
    Provider {
        location: String,
        #[source]
        source: ProviderError,
    },

    #[error("Location '{location}': {source}")]
    Geometry {
        location: String,
        #[source]
        source: GeometryError,
    },

    #[error("Location '{location}': cannot triangulate elevation samples: {reason}")]
    Triangulation { location: String, reason: String },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Provider data a region was built from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawGeometry {
    /// Built locally from coordinates.
    #[default]
    None,

    /// Isochrone rings as returned by the routing provider.
    Rings(Vec<Ring>),

    /// Elevation samples as returned by the elevation provider.
    Samples(Vec<ElevationSample>),
}

/// Geometry contributed by one location (or one origin of an isochrone
/// location).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Coordinates the region was built from.
    pub source: Vec<LatLon>,
    pub raw: RawGeometry,
    pub polygons: Vec<Polygon<f64>>,
}

impl Region {
    /// A region built locally, with no provider data.
    pub fn from_polygons(source: Vec<LatLon>, polygons: Vec<Polygon<f64>>) -> Self {
        Self {
            source,
            raw: RawGeometry::None,
            polygons,
        }
    }

    /// The region's polygons as one multipolygon, without merging them.
    pub fn multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons.clone())
    }
}

/// A descriptor together with the regions generated for it.
#[derive(Debug, Clone)]
pub struct GeneratedLocation {
    pub descriptor: LocationDescriptor,
    pub regions: Vec<Region>,
}
