//! Wiring of real providers, cache and export around the pipeline.

use std::path::Path;

use tracing::info;

use super::config::AppConfig;
use super::error::AppError;
use crate::cache::CacheStore;
use crate::config::{read_token, Database, SearchConfig};
use crate::pipeline::{self, Outcome};
use crate::provider::{
    MapboxIsochroneProvider, OpenTopoDataProvider, RequestPacer, ReqwestClient,
};
use crate::region::RegionGenerator;
use crate::render::{to_feature_collection, write_geojson, RenderInput};

/// Production region generator.
pub type LiveGenerator =
    RegionGenerator<MapboxIsochroneProvider<ReqwestClient>, OpenTopoDataProvider<ReqwestClient>>;

/// Result of [`run`].
#[derive(Debug)]
pub struct RunReport {
    pub config: SearchConfig,
    pub outcome: Outcome,
}

/// Loads the search config and its databases.
///
/// Everything that can fail before a provider request fails here.
pub fn load_inputs(
    app: &AppConfig,
    config_path: &Path,
) -> Result<(SearchConfig, Database), AppError> {
    let config = SearchConfig::load(config_path)?;
    let database = Database::load(&app.database_dir, config.database_categories())?;
    info!(
        config = %config_path.display(),
        locations = config.locations.len(),
        steps = config.logic.len(),
        "Search config loaded"
    );
    Ok((config, database))
}

/// Builds the generator with HTTP-backed providers.
///
/// The token file is only read when `needs_token` is set, so configs without
/// isochrone locations run without one.
pub fn build_generator(app: &AppConfig, needs_token: bool) -> Result<LiveGenerator, AppError> {
    let token = if needs_token {
        read_token(&app.token_path)?
    } else {
        String::new()
    };

    let client = ReqwestClient::with_timeout(app.http_timeout)?;
    let routing = MapboxIsochroneProvider::new(client.clone(), token)
        .with_retry_policy(app.retry_policy.clone())
        .with_pacer(RequestPacer::new(app.routing_interval));
    let elevation = OpenTopoDataProvider::new(client)
        .with_dataset(app.elevation.dataset.clone())
        .with_batch_size(app.elevation.batch_size)
        .with_batch_delay(app.elevation.batch_delay)
        .with_retry_policy(app.retry_policy.clone());

    Ok(RegionGenerator::new(
        CacheStore::new(&app.cache_dir),
        routing,
        elevation,
    ))
}

/// Runs the full pipeline and writes the GeoJSON export.
pub fn run(app: &AppConfig, config_path: &Path) -> Result<RunReport, AppError> {
    let (config, database) = load_inputs(app, config_path)?;
    let needs_token = config.locations.iter().any(|e| e.kind == "isochrone");
    let generator = build_generator(app, needs_token)?;

    let outcome = pipeline::run(&config, &database, &generator)?;

    let input = RenderInput::from_outcome(config.center, &outcome);
    write_geojson(&app.output_path, &to_feature_collection(&input))?;

    Ok(RunReport { config, outcome })
}
