//! Config entry + database → descriptor.

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use super::descriptor::{canonical_name, LocationDescriptor, LocationKind};
use crate::config::{ConfigError, Database, LocationEntry};
use crate::coord::SampleGrid;
use crate::provider::{validate_contour, TravelProfile};

/// Per-location resolution failure. The location is excluded; the run goes
/// on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Location '{name}' not found in the '{category}' database")]
    MissingDescriptor { name: String, category: String },

    #[error("Location '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl ResolveError {
    /// Config name of the location that failed.
    pub fn location(&self) -> &str {
        match self {
            ResolveError::MissingDescriptor { name, .. }
            | ResolveError::InvalidParameter { name, .. } => {
                name
            }
        }
    }
}

/// Outcome of resolving every entry of a config.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Resolved descriptors, in config order.
    pub descriptors: Vec<LocationDescriptor>,

    /// Entries that could not be resolved.
    pub rejected: Vec<ResolveError>,
}

/// Resolves one config entry against the database.
///
/// Elevation entries take their coordinates from the grid corners and never
/// consult the database. An unrecognized `type` is resolved as
/// [`LocationKind::Standard`] with a warning.
pub fn resolve(
    entry: &LocationEntry,
    database: &Database,
) -> Result<LocationDescriptor, ResolveError> {
    let kind = parse_kind(entry)?;

    let coordinates = match &kind {
        LocationKind::Elevation { grid, .. } => grid.corners().to_vec(),
        _ => database
            .lookup(&entry.category, &entry.name)
            .ok_or_else(|| ResolveError::MissingDescriptor {
                name: entry.name.clone(),
                category: entry.category.clone(),
            })?
            .to_vec(),
    };
    if coordinates.is_empty() {
        return Err(invalid(entry, "database entry has no coordinates"));
    }
    for coordinate in &coordinates {
        coordinate
            .validate()
            .map_err(|e| invalid(entry, &e.to_string()))?;
    }

    Ok(LocationDescriptor {
        name: entry.name.clone(),
        canonical_name: canonical_name(entry),
        category: entry.category.clone(),
        color: entry.color.clone(),
        kind,
        coordinates,
    })
}

/// Resolves every entry.
///
/// # Errors
///
/// Two entries with the same canonical name abort the whole run with
/// [`ConfigError::DuplicateLocation`]. Per-entry failures are collected in
/// [`Resolution::rejected`] instead.
pub fn resolve_all(
    entries: &[LocationEntry],
    database: &Database,
) -> Result<Resolution, ConfigError> {
    check_unique(entries)?;

    let mut resolution = Resolution::default();
    for entry in entries {
        match resolve(entry, database) {
            Ok(descriptor) => resolution.descriptors.push(descriptor),
            Err(e) => resolution.rejected.push(e),
        }
    }
    Ok(resolution)
}

/// Fails on the first repeated canonical name.
pub fn check_unique(entries: &[LocationEntry]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for entry in entries {
        let name = canonical_name(entry);
        if !seen.insert(name.clone()) {
            return Err(ConfigError::DuplicateLocation(name));
        }
    }
    Ok(())
}

fn parse_kind(entry: &LocationEntry) -> Result<LocationKind, ResolveError> {
    match entry.kind.as_str() {
        "isochrone" => {
            let profile = entry
                .profile
                .as_deref()
                .ok_or_else(|| invalid(entry, "isochrone requires 'profile'"))?
                .parse::<TravelProfile>()
                .map_err(|e| invalid(entry, &e.to_string()))?;
            let minutes = entry
                .contours_minutes
                .ok_or_else(|| invalid(entry, "isochrone requires 'contours_minutes'"))?;
            validate_contour(minutes).map_err(|e| invalid(entry, &e.to_string()))?;
            Ok(LocationKind::Isochrone { profile, minutes })
        }
        "line" => {
            let buffer_distance = entry
                .buffer_distance
                .ok_or_else(|| invalid(entry, "line requires 'buffer_distance'"))?;
            if !buffer_distance.is_finite() || buffer_distance < 0.0 {
                return Err(invalid(entry, "'buffer_distance' must be non-negative"));
            }
            Ok(LocationKind::Line { buffer_distance })
        }
        "circle" => {
            let radius = entry
                .radius
                .ok_or_else(|| invalid(entry, "circle requires 'radius'"))?;
            if !radius.is_finite() || radius <= 0.0 {
                return Err(invalid(entry, "'radius' must be positive"));
            }
            Ok(LocationKind::Circle { radius })
        }
        "elevation" => {
            let grid = entry
                .region
                .ok_or_else(|| invalid(entry, "elevation requires 'region'"))?;
            validate_grid(entry, &grid)?;
            let (min, max) = match (entry.elevation_min, entry.elevation_max) {
                (Some(min), Some(max)) => (min, max),
                _ => {
                    return Err(invalid(
                        entry,
                        "elevation requires 'elevation_min' and 'elevation_max'",
                    ))
                }
            };
            if min > max {
                return Err(invalid(entry, "'elevation_min' exceeds 'elevation_max'"));
            }
            Ok(LocationKind::Elevation { grid, min, max })
        }
        "standard" => Ok(LocationKind::Standard),
        other => {
            warn!(
                location = %entry.name,
                category = %entry.category,
                location_type = other,
                "Unrecognized location type, treating coordinates as a closed ring"
            );
            Ok(LocationKind::Standard)
        }
    }
}

fn validate_grid(entry: &LocationEntry, grid: &SampleGrid) -> Result<(), ResolveError> {
    grid.top_left
        .validate()
        .and_then(|_| grid.bottom_right.validate())
        .map_err(|e| invalid(entry, &e.to_string()))?;
    if grid.n_points_lat < 2 || grid.n_points_lon < 2 {
        return Err(invalid(entry, "'region' needs at least 2 points per axis"));
    }
    Ok(())
}

fn invalid(entry: &LocationEntry, reason: &str) -> ResolveError {
    ResolveError::InvalidParameter {
        name: entry.name.clone(),
        reason: reason.to_string(),
    }
}
