//! Resolved location descriptors.

use std::fmt;

use crate::config::LocationEntry;
use crate::coord::{LatLon, SampleGrid};
use crate::provider::TravelProfile;

/// Separator between fields of a canonical name.
pub const CANONICAL_SEPARATOR: &str = "_";

/// Type-specific parameters of a location.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationKind {
    /// Area reachable from each coordinate within `minutes`.
    Isochrone { profile: TravelProfile, minutes: u32 },

    /// Corridor around the path through all coordinates.
    Line { buffer_distance: f64 },

    /// Aspect-corrected circle around the first coordinate.
    Circle { radius: f64 },

    /// Terrain inside an elevation band, sampled over a grid.
    Elevation { grid: SampleGrid, min: f64, max: f64 },

    /// The coordinates themselves form a closed ring.
    Standard,
}

impl LocationKind {
    /// The config `type` value for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            LocationKind::Isochrone { .. } => "isochrone",
            LocationKind::Line { .. } => "line",
            LocationKind::Circle { .. } => "circle",
            LocationKind::Elevation { .. } => "elevation",
            LocationKind::Standard => "standard",
        }
    }

    /// Field values that take part in the canonical name, after the type.
    fn name_parts(&self) -> Vec<String> {
        match self {
            LocationKind::Isochrone { profile, minutes } => {
                vec![profile.to_string(), minutes.to_string()]
            }
            LocationKind::Line { buffer_distance } => vec![buffer_distance.to_string()],
            LocationKind::Circle { radius } => vec![radius.to_string()],
            LocationKind::Elevation { min, max, .. } => vec![min.to_string(), max.to_string()],
            LocationKind::Standard => Vec::new(),
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A fully specified location, ready for region generation.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDescriptor {
    /// Name as written in the config.
    pub name: String,

    /// Unique key within a run; also the cache key prefix.
    pub canonical_name: String,

    pub category: String,
    pub color: Option<String>,
    pub kind: LocationKind,

    /// Database coordinates, or the grid corners for elevation locations.
    pub coordinates: Vec<LatLon>,
}

impl LocationDescriptor {
    /// Builds a descriptor directly from typed parameters.
    ///
    /// The canonical name is derived from the name, category and the kind's
    /// parameters.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        kind: LocationKind,
        coordinates: Vec<LatLon>,
    ) -> Self {
        let name = name.into();
        let category = category.into();
        let mut parts = vec![name.clone(), category.clone(), kind.type_name().to_string()];
        parts.extend(kind.name_parts());

        Self {
            canonical_name: parts.join(CANONICAL_SEPARATOR),
            name,
            category,
            color: None,
            kind,
            coordinates,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Canonical name of a config entry.
///
/// Every present field except `color` and `region` is stringified and joined
/// with [`CANONICAL_SEPARATOR`], in the order name, category, type, profile,
/// contours_minutes, buffer_distance, radius, elevation_min, elevation_max.
pub fn canonical_name(entry: &LocationEntry) -> String {
    let mut parts = vec![entry.name.clone(), entry.category.clone(), entry.kind.clone()];
    if let Some(profile) = &entry.profile {
        parts.push(profile.clone());
    }
    if let Some(minutes) = entry.contours_minutes {
        parts.push(minutes.to_string());
    }
    let numbers = [
        entry.buffer_distance,
        entry.radius,
        entry.elevation_min,
        entry.elevation_max,
    ];
    parts.extend(numbers.iter().flatten().map(|v| v.to_string()));
    parts.join(CANONICAL_SEPARATOR)
}
