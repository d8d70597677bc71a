//! OpenTopoData elevation provider.
//!
//! Samples a [`SampleGrid`] with [`hex_sample_grid`] and queries
//! `https://api.opentopodata.org/v1/{dataset}?locations=lat,lon|lat,lon|...`
//! in batches. The public API caps a request at 100 locations and asks
//! clients to wait between requests, so batches are paced.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::retry::{retry, RequestPacer, RetryPolicy};
use super::types::{ElevationProvider, ElevationSample, ProviderError};
use super::HttpClient;
use crate::coord::{hex_sample_grid, LatLon, SampleGrid};

/// Base URL for the public OpenTopoData API.
pub const OPENTOPODATA_URL: &str = "https://api.opentopodata.org/v1";

/// Default dataset (ASTER global DEM, 30m).
pub const DEFAULT_DATASET: &str = "aster30m";

/// Maximum locations per request accepted by the public API.
pub const MAX_BATCH_SIZE: usize = 100;

/// Default delay between batches.
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(1);

/// Elevation provider backed by OpenTopoData.
pub struct OpenTopoDataProvider<C: HttpClient> {
    http_client: C,
    base_url: String,
    dataset: String,
    batch_size: usize,
    retry_policy: RetryPolicy,
    pacer: RequestPacer,
}

impl<C: HttpClient> OpenTopoDataProvider<C> {
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            base_url: OPENTOPODATA_URL.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
            batch_size: MAX_BATCH_SIZE,
            retry_policy: RetryPolicy::None,
            pacer: RequestPacer::new(DEFAULT_BATCH_DELAY),
        }
    }

    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Sets the batch size, clamped to `1..=MAX_BATCH_SIZE`.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    /// Sets the minimum delay between batch requests.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.pacer = RequestPacer::new(delay);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn build_url(&self, batch: &[LatLon]) -> String {
        let locations = batch
            .iter()
            .map(|p| format!("{},{}", p.lat, p.lon))
            .collect::<Vec<_>>()
            .join("|");
        format!("{}/{}?locations={}", self.base_url, self.dataset, locations)
    }
}

impl<C: HttpClient> ElevationProvider for OpenTopoDataProvider<C> {
    fn elevations(&self, grid: &SampleGrid) -> Result<Vec<ElevationSample>, ProviderError> {
        let points =
            hex_sample_grid(grid).map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
        let batches = points.len().div_ceil(self.batch_size);
        info!(
            points = points.len(),
            batches,
            dataset = %self.dataset,
            "Requesting elevation samples"
        );

        let mut samples = Vec::with_capacity(points.len());
        for (index, batch) in points.chunks(self.batch_size).enumerate() {
            let url = self.build_url(batch);
            let body = retry(&self.retry_policy, "opentopodata batch", || {
                self.pacer.wait();
                self.http_client.get(&url)
            })?;
            let parsed = parse_elevations(&body)?;
            debug!(batch = index + 1, batches, samples = parsed.len(), "Elevation batch received");
            samples.extend(parsed);
        }
        Ok(samples)
    }

    fn name(&self) -> &str {
        "OpenTopoData"
    }
}

#[derive(Deserialize)]
struct ElevationBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Vec<ResultBody>,
}

#[derive(Deserialize)]
struct ResultBody {
    elevation: Option<f64>,
    location: LocationBody,
}

#[derive(Deserialize)]
struct LocationBody {
    lat: f64,
    lng: f64,
}

/// Parses one batch response. Results with a null elevation are skipped.
pub fn parse_elevations(body: &[u8]) -> Result<Vec<ElevationSample>, ProviderError> {
    let parsed: ElevationBody = serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("elevation body: {}", e)))?;

    if let Some(status) = parsed.status.as_deref() {
        if status != "OK" {
            return Err(ProviderError::InvalidResponse(format!(
                "status {}: {}",
                status,
                parsed.error.unwrap_or_default()
            )));
        }
    }

    Ok(parsed
        .results
        .into_iter()
        .filter_map(|r| {
            r.elevation.map(|elevation| ElevationSample {
                lat: r.location.lat,
                lon: r.location.lng,
                elevation,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn grid(n_lat: usize, n_lon: usize) -> SampleGrid {
        SampleGrid {
            top_left: LatLon { lat: 45.6, lon: 18.6 },
            bottom_right: LatLon { lat: 45.5, lon: 18.7 },
            n_points_lat: n_lat,
            n_points_lon: n_lon,
        }
    }

    fn body(n: usize) -> Vec<u8> {
        let results: Vec<String> = (0..n)
            .map(|i| {
                format!(
                    r#"{{"dataset":"aster30m","elevation":{},"location":{{"lat":45.5,"lng":18.6}}}}"#,
                    100 + i
                )
            })
            .collect();
        format!(r#"{{"results":[{}],"status":"OK"}}"#, results.join(",")).into_bytes()
    }

    fn provider(client: MockHttpClient) -> OpenTopoDataProvider<MockHttpClient> {
        OpenTopoDataProvider::new(client).with_batch_delay(Duration::ZERO)
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider(MockHttpClient::new(Ok(vec![]))).name(), "OpenTopoData");
    }

    #[test]
    fn test_batch_size_is_capped() {
        let p = provider(MockHttpClient::new(Ok(vec![]))).with_batch_size(500);
        assert_eq!(p.batch_size(), MAX_BATCH_SIZE);
        let p = provider(MockHttpClient::new(Ok(vec![]))).with_batch_size(0);
        assert_eq!(p.batch_size(), 1);
    }

    #[test]
    fn test_url_format() {
        let p = provider(MockHttpClient::new(Ok(vec![])));
        let url = p.build_url(&[LatLon { lat: 45.5, lon: 18.6 }, LatLon { lat: 45.6, lon: 18.7 }]);
        assert_eq!(
            url,
            "https://api.opentopodata.org/v1/aster30m?locations=45.5,18.6|45.6,18.7"
        );
    }

    #[test]
    fn test_grid_is_split_into_batches() {
        // 5 x 5 = 25 points, batch size 10 -> 3 requests
        let client = MockHttpClient::sequence(vec![Ok(body(10)), Ok(body(10)), Ok(body(5))]);
        let p = provider(client).with_batch_size(10);

        let samples = p.elevations(&grid(5, 5)).unwrap();
        assert_eq!(samples.len(), 25);

        let requests = p.http_client.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].matches('|').count(), 9);
        assert_eq!(requests[2].matches('|').count(), 4);
    }

    #[test]
    fn test_null_elevation_skipped() {
        let body = br#"{"results":[
            {"elevation":null,"location":{"lat":1.0,"lng":2.0}},
            {"elevation":87.5,"location":{"lat":3.0,"lng":4.0}}
        ],"status":"OK"}"#;
        let samples = parse_elevations(body).unwrap();
        assert_eq!(
            samples,
            vec![ElevationSample { lat: 3.0, lon: 4.0, elevation: 87.5 }]
        );
    }

    #[test]
    fn test_error_status_is_invalid_response() {
        let body = br#"{"error":"Too many locations","status":"INVALID_REQUEST"}"#;
        let result = parse_elevations(body);
        assert!(matches!(
            result,
            Err(ProviderError::InvalidResponse(msg)) if msg.contains("Too many")
        ));
    }

    #[test]
    fn test_degenerate_grid_makes_no_request() {
        let p = provider(MockHttpClient::new(Ok(body(1))));
        let result = p.elevations(&grid(1, 5));
        assert!(matches!(result, Err(ProviderError::InvalidRequest(_))));
        assert!(p.http_client.requests().is_empty());
    }

    #[test]
    fn test_failed_batch_fails_request() {
        let client = MockHttpClient::sequence(vec![
            Ok(body(10)),
            Err(ProviderError::HttpStatus { status: 400, url: "u".into() }),
        ]);
        let p = provider(client).with_batch_size(10);
        assert!(p.elevations(&grid(5, 5)).is_err());
    }
}
