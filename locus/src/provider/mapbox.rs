//! Mapbox Isochrone API provider.
//!
//! # URL Pattern
//!
//! `https://api.mapbox.com/isochrone/v1/mapbox/{profile}/{lon},{lat}?contours_minutes={m}&polygons=true&access_token={token}`
//!
//! - `profile` is one of `driving`, `walking`, `cycling`
//! - `contours_minutes` must be one of [`SUPPORTED_CONTOURS`]
//! - `polygons=true` makes the API return polygon geometries instead of
//!   contour lines
//!
//! # Response
//!
//! A GeoJSON `FeatureCollection`. Every ring of every feature geometry is
//! returned as a separate [`Ring`]; nothing is merged here.

use serde::Deserialize;

use super::retry::{retry, RequestPacer, RetryPolicy};
use super::types::{validate_contour, IsochroneRequest, ProviderError, Ring, RoutingProvider};
use super::HttpClient;

/// Base URL for the Mapbox isochrone endpoint.
pub const MAPBOX_ISOCHRONE_URL: &str = "https://api.mapbox.com/isochrone/v1/mapbox";

/// Routing provider backed by the Mapbox Isochrone API.
///
/// # Example
///
/// ```ignore
/// use locus::provider::{MapboxIsochroneProvider, ReqwestClient};
///
/// let client = ReqwestClient::new()?;
/// let provider = MapboxIsochroneProvider::new(client, token);
/// ```
pub struct MapboxIsochroneProvider<C: HttpClient> {
    http_client: C,
    access_token: String,
    base_url: String,
    retry_policy: RetryPolicy,
    pacer: RequestPacer,
}

impl<C: HttpClient> MapboxIsochroneProvider<C> {
    /// Creates a provider with no retries and no pacing.
    pub fn new(http_client: C, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
            base_url: MAPBOX_ISOCHRONE_URL.to_string(),
            retry_policy: RetryPolicy::None,
            pacer: RequestPacer::unpaced(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_pacer(mut self, pacer: RequestPacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Overrides the endpoint (self-hosted proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_url(&self, request: &IsochroneRequest) -> String {
        format!(
            "{}/{}/{},{}?contours_minutes={}&polygons=true&access_token={}",
            self.base_url,
            request.profile,
            request.origin.lon,
            request.origin.lat,
            request.minutes,
            self.access_token
        )
    }
}

impl<C: HttpClient> RoutingProvider for MapboxIsochroneProvider<C> {
    fn isochrone(&self, request: &IsochroneRequest) -> Result<Vec<Ring>, ProviderError> {
        validate_contour(request.minutes)?;
        request
            .origin
            .validate()
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;

        let url = self.build_url(request);
        let body = retry(&self.retry_policy, "mapbox isochrone", || {
            self.pacer.wait();
            self.http_client.get(&url)
        })?;
        parse_isochrone(&body)
    }

    fn name(&self) -> &str {
        "Mapbox"
    }
}

#[derive(Deserialize)]
struct FeatureCollectionBody {
    features: Vec<FeatureBody>,
}

#[derive(Deserialize)]
struct FeatureBody {
    geometry: GeometryBody,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GeometryBody {
    LineString { coordinates: Vec<Vec<f64>> },
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
}

/// Parses an isochrone response body into rings.
pub fn parse_isochrone(body: &[u8]) -> Result<Vec<Ring>, ProviderError> {
    let collection: FeatureCollectionBody = serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("isochrone body: {}", e)))?;

    let mut rings = Vec::new();
    for feature in collection.features {
        match feature.geometry {
            GeometryBody::LineString { coordinates } => rings.push(to_ring(coordinates)?),
            GeometryBody::Polygon { coordinates } => {
                for ring in coordinates {
                    rings.push(to_ring(ring)?);
                }
            }
            GeometryBody::MultiPolygon { coordinates } => {
                for ring in coordinates.into_iter().flatten() {
                    rings.push(to_ring(ring)?);
                }
            }
        }
    }

    if rings.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "isochrone response contains no geometry".to_string(),
        ));
    }
    Ok(rings)
}

fn to_ring(positions: Vec<Vec<f64>>) -> Result<Ring, ProviderError> {
    let pairs = positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok((*lon, *lat)),
            _ => Err(ProviderError::InvalidResponse(format!(
                "position with {} values",
                p.len()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Ring::from_positions(pairs))
}
