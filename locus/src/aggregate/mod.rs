//! Per-category aggregation of generated regions.
//!
//! [`aggregate`] is a pure fold: it reads the generated locations and returns
//! a fresh [`CategoryAggregates`] value. Nothing is cached between calls, so
//! any change to the regions means calling it again.

use geo::{MultiPolygon, Polygon};

use crate::geometry::union_all;
use crate::region::GeneratedLocation;

/// Union of all region geometry per category, in first-seen category order.
///
/// Categories that contributed no geometry are absent. Consumers must treat
/// an absent category as "no constraint".
#[derive(Debug, Clone, Default)]
pub struct CategoryAggregates {
    entries: Vec<(String, MultiPolygon<f64>)>,
}

impl CategoryAggregates {
    /// Builds aggregates from precomputed entries, keeping their order.
    pub fn from_entries(entries: Vec<(String, MultiPolygon<f64>)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, category: &str) -> Option<&MultiPolygon<f64>> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, region)| region)
    }

    /// `(category, aggregate)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MultiPolygon<f64>)> {
        self.entries.iter().map(|(name, region)| (name.as_str(), region))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Buckets every region polygon by its location's category and unions each
/// bucket.
pub fn aggregate(locations: &[GeneratedLocation]) -> CategoryAggregates {
    let mut buckets: Vec<(String, Vec<Polygon<f64>>)> = Vec::new();

    for location in locations {
        let category = location.descriptor.category.as_str();
        let polygons = location
            .regions
            .iter()
            .flat_map(|region| region.polygons.iter().cloned());

        match buckets.iter_mut().find(|(name, _)| name == category) {
            Some((_, bucket)) => bucket.extend(polygons),
            None => buckets.push((category.to_string(), polygons.collect())),
        }
    }

    let entries = buckets
        .into_iter()
        .filter(|(_, polygons)| !polygons.is_empty())
        .map(|(category, polygons)| (category, union_all(polygons)))
        .filter(|(_, region)| !region.0.is_empty())
        .collect();

    CategoryAggregates { entries }
}
