//! End-to-end run: resolve, generate, aggregate, compose.
//!
//! Config-level problems (unknown operators, duplicate canonical names) abort
//! the run before any provider request. Per-location problems exclude only
//! that location: it is logged, recorded in [`Outcome::excluded`] and left
//! out of aggregation.

use thiserror::Error;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::compose::{compose_all, Composition};
use crate::config::{ConfigError, Database, SearchConfig};
use crate::geometry::area;
use crate::location::resolve_all;
use crate::provider::{ElevationProvider, RoutingProvider};
use crate::region::{GeneratedLocation, RegionGenerator};

/// Fatal pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a location was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    pub location: String,
    pub reason: String,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Successfully generated locations, in config order.
    pub locations: Vec<GeneratedLocation>,

    /// Final region and per-category aggregates.
    pub composition: Composition,

    /// Locations left out, in the order they failed.
    pub excluded: Vec<Exclusion>,
}

impl Outcome {
    /// Area of the final region in squared degrees, zero if there is none.
    pub fn final_area(&self) -> f64 {
        self.composition.final_region.as_ref().map_or(0.0, area)
    }
}

/// Runs the whole pipeline over a loaded config and database.
pub fn run<R, E>(
    config: &SearchConfig,
    database: &Database,
    generator: &RegionGenerator<R, E>,
) -> Result<Outcome, PipelineError>
where
    R: RoutingProvider,
    E: ElevationProvider,
{
    let steps = config.steps()?;
    let resolution = resolve_all(&config.locations, database)?;
    info!(
        resolved = resolution.descriptors.len(),
        rejected = resolution.rejected.len(),
        "Locations resolved"
    );

    let mut excluded = Vec::new();
    for error in resolution.rejected {
        warn!(location = %error.location(), error = %error, "Excluding location");
        excluded.push(Exclusion {
            location: error.location().to_string(),
            reason: error.to_string(),
        });
    }

    let mut locations = Vec::with_capacity(resolution.descriptors.len());
    for descriptor in resolution.descriptors {
        match generator.generate(&descriptor) {
            Ok(regions) => {
                info!(
                    location = %descriptor.name,
                    category = %descriptor.category,
                    kind = %descriptor.kind,
                    regions = regions.len(),
                    "Regions generated"
                );
                locations.push(GeneratedLocation {
                    descriptor,
                    regions,
                });
            }
            Err(e) => {
                warn!(location = %descriptor.name, error = %e, "Excluding location");
                excluded.push(Exclusion {
                    location: descriptor.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let aggregates = aggregate(&locations);
    let composition = compose_all(&steps, aggregates);
    let outcome = Outcome {
        locations,
        composition,
        excluded,
    };

    info!(
        generated = outcome.locations.len(),
        excluded = outcome.excluded.len(),
        categories = outcome.composition.aggregates.len(),
        final_area = outcome.final_area(),
        "Composition complete"
    );
    Ok(outcome)
}
