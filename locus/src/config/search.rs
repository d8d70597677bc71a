//! Search configuration: map center, location entries and composition logic.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logic::LogicTable;
use super::{read_json, ConfigError};
use crate::compose::CompositionStep;
use crate::coord::{LatLon, SampleGrid};

/// Location type used when an entry omits `type`.
pub const DEFAULT_LOCATION_TYPE: &str = "standard";

/// Top-level search config file.
///
/// ```json
/// {
///   "center": {"lat": 45.558, "lon": 18.684},
///   "locations": [{"name": "Office", "category": "work", "type": "isochrone",
///                  "profile": "driving", "contours_minutes": 20}],
///   "logic": {"union": ["work"]}
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Map center handed to the renderer.
    pub center: LatLon,

    /// Location entries in config order.
    pub locations: Vec<LocationEntry>,

    /// Composition steps in config order.
    #[serde(default)]
    pub logic: LogicTable,
}

/// One entry of the `locations` list, before database lookup.
///
/// Only `name` and `category` are always required; the remaining fields are
/// checked against the declared `type` by [`crate::location::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub name: String,
    pub category: String,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(rename = "type", default = "default_location_type")]
    pub kind: String,

    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default)]
    pub contours_minutes: Option<u32>,

    #[serde(default)]
    pub buffer_distance: Option<f64>,

    #[serde(default)]
    pub radius: Option<f64>,

    /// Bounding region and grid resolution for elevation entries.
    #[serde(default)]
    pub region: Option<SampleGrid>,

    #[serde(default)]
    pub elevation_min: Option<f64>,

    #[serde(default)]
    pub elevation_max: Option<f64>,
}

fn default_location_type() -> String {
    DEFAULT_LOCATION_TYPE.to_string()
}

impl LocationEntry {
    /// Creates an entry with only the required fields set.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            color: None,
            kind: kind.into(),
            profile: None,
            contours_minutes: None,
            buffer_distance: None,
            radius: None,
            region: None,
            elevation_min: None,
            elevation_max: None,
        }
    }

    /// Returns true if this entry takes its geometry from a sample grid
    /// rather than from database coordinates.
    pub fn is_elevation(&self) -> bool {
        self.kind == "elevation"
    }
}

impl SearchConfig {
    /// Loads and parses a search config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid JSON for this schema,
    /// or names an unknown composition operator.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: SearchConfig = read_json(path)?;
        config.steps()?;
        Ok(config)
    }

    /// Parses a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        config.steps()?;
        Ok(config)
    }

    /// Composition steps in config order.
    pub fn steps(&self) -> Result<Vec<CompositionStep>, ConfigError> {
        self.logic
            .entries()
            .iter()
            .map(|(name, categories)| CompositionStep::parse(name, categories.clone()))
            .collect()
    }

    /// Categories that need a database file (every category with at least
    /// one non-elevation entry), in first-seen order.
    pub fn database_categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for entry in self.locations.iter().filter(|e| !e.is_elevation()) {
            if !categories.contains(&entry.category.as_str()) {
                categories.push(&entry.category);
            }
        }
        categories
    }
}
