//! External geometry providers.
//!
//! Two provider traits sit at the network boundary:
//!
//! - [`RoutingProvider`]: travel-time isochrones ([`MapboxIsochroneProvider`])
//! - [`ElevationProvider`]: terrain samples over a grid ([`OpenTopoDataProvider`])
//!
//! Both talk HTTP through the [`HttpClient`] trait so tests can swap in a
//! scripted client. Requests go through a [`RetryPolicy`] and a
//! [`RequestPacer`].

mod http;
mod mapbox;
mod opentopodata;
mod retry;
mod types;

pub use http::{redact, HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use mapbox::{parse_isochrone, MapboxIsochroneProvider, MAPBOX_ISOCHRONE_URL};
pub use opentopodata::{
    parse_elevations, OpenTopoDataProvider, DEFAULT_BATCH_DELAY, DEFAULT_DATASET, MAX_BATCH_SIZE,
    OPENTOPODATA_URL,
};
pub use retry::{
    retry, RequestPacer, RetryPolicy, DEFAULT_BACKOFF_MULTIPLIER, DEFAULT_INITIAL_DELAY_MS,
    DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_SECS,
};
pub use types::{
    validate_contour, ElevationProvider, ElevationSample, IsochroneRequest, ProviderError, Ring,
    RoutingProvider, TravelProfile, SUPPORTED_CONTOURS,
};

#[cfg(test)]
pub use http::tests::MockHttpClient;
