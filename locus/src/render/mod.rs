//! GeoJSON export of a run's result.
//!
//! The map renderer is a separate tool; this module only hands it the data
//! it needs as one `FeatureCollection`:
//!
//! | `role`     | Geometry       | Properties                        |
//! |------------|----------------|-----------------------------------|
//! | `category` | `MultiPolygon` | `category`, `area`                |
//! | `final`    | `MultiPolygon` | `area`                            |
//! | `marker`   | `MultiPoint`   | `name`, `category`, `color`       |
//!
//! The map center is stored as the foreign member `center` (`[lon, lat]`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use geo::{MultiPolygon, Polygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::aggregate::CategoryAggregates;
use crate::coord::LatLon;
use crate::geometry::area;
use crate::pipeline::Outcome;

/// Errors writing the export file.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to serialize GeoJSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A location pin on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    pub category: String,
    pub color: Option<String>,
    pub coordinates: Vec<LatLon>,
}

/// Everything the renderer reads.
#[derive(Debug, Clone)]
pub struct RenderInput<'a> {
    pub center: LatLon,
    pub aggregates: &'a CategoryAggregates,
    pub final_region: Option<&'a MultiPolygon<f64>>,
    pub markers: Vec<Marker>,
}

impl<'a> RenderInput<'a> {
    /// Collects the render input from a pipeline outcome.
    pub fn from_outcome(center: LatLon, outcome: &'a Outcome) -> Self {
        let markers = outcome
            .locations
            .iter()
            .map(|location| Marker {
                name: location.descriptor.name.clone(),
                category: location.descriptor.category.clone(),
                color: location.descriptor.color.clone(),
                coordinates: location.descriptor.coordinates.clone(),
            })
            .collect();

        Self {
            center,
            aggregates: &outcome.composition.aggregates,
            final_region: outcome.composition.final_region.as_ref(),
            markers,
        }
    }
}

/// Converts the render input into a feature collection.
pub fn to_feature_collection(input: &RenderInput<'_>) -> FeatureCollection {
    let mut features = Vec::new();

    for (category, region) in input.aggregates.iter() {
        let mut properties = JsonObject::new();
        properties.insert("role".into(), json!("category"));
        properties.insert("category".into(), json!(category));
        properties.insert("area".into(), json!(area(region)));
        features.push(feature(multi_polygon_value(region), properties));
    }

    if let Some(region) = input.final_region {
        let mut properties = JsonObject::new();
        properties.insert("role".into(), json!("final"));
        properties.insert("area".into(), json!(area(region)));
        features.push(feature(multi_polygon_value(region), properties));
    }

    for marker in &input.markers {
        let mut properties = JsonObject::new();
        properties.insert("role".into(), json!("marker"));
        properties.insert("name".into(), json!(marker.name));
        properties.insert("category".into(), json!(marker.category));
        if let Some(color) = &marker.color {
            properties.insert("color".into(), json!(color));
        }
        let points = marker.coordinates.iter().map(|c| vec![c.lon, c.lat]).collect();
        features.push(feature(Value::MultiPoint(points), properties));
    }

    let mut foreign_members = JsonObject::new();
    foreign_members.insert("center".into(), json!([input.center.lon, input.center.lat]));
    foreign_members.insert("generator".into(), json!(format!("locus {}", crate::VERSION)));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    }
}

/// Writes a feature collection, replacing `path` atomically.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<(), RenderError> {
    let io_error = |source: io::Error| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let body = serde_json::to_vec_pretty(collection)?;
    let temp_path = path.with_extension("geojson.tmp");
    fs::write(&temp_path, &body).map_err(io_error)?;
    fs::rename(&temp_path, path).map_err(io_error)?;

    info!(path = %path.display(), features = collection.features.len(), "GeoJSON written");
    Ok(())
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn multi_polygon_value(region: &MultiPolygon<f64>) -> Value {
    Value::MultiPolygon(region.0.iter().map(polygon_rings).collect())
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|c| vec![c.x, c.y]).collect())
        .collect()
}
