//! Per-category location databases.
//!
//! Each category has one JSON file, `<dir>/<category>.json`, mapping location
//! names to their coordinates:
//!
//! ```json
//! {"Office": {"coordinates": [{"lat": 45.56, "lon": 18.69}]}}
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{read_json, ConfigError};
use crate::coord::LatLon;

/// A single database record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub coordinates: Vec<LatLon>,
}

/// Location records for a set of categories.
#[derive(Debug, Clone, Default)]
pub struct Database {
    categories: HashMap<String, HashMap<String, DatabaseEntry>>,
}

impl Database {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the file holding `category` under `dir`.
    pub fn category_path(dir: &Path, category: &str) -> PathBuf {
        dir.join(format!("{}.json", category))
    }

    /// Loads the files for the given categories.
    ///
    /// # Errors
    ///
    /// A missing or malformed file for any requested category is an error;
    /// the caller aborts the run before fetching anything.
    pub fn load<'a, I>(dir: &Path, categories: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut database = Self::new();
        for category in categories {
            let path = Self::category_path(dir, category);
            let records: HashMap<String, DatabaseEntry> = read_json(&path)?;
            debug!(category, path = %path.display(), records = records.len(), "Loaded database");
            database.categories.insert(category.to_string(), records);
        }
        Ok(database)
    }

    /// Adds or replaces one record.
    pub fn insert(&mut self, category: &str, name: &str, coordinates: Vec<LatLon>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string(), DatabaseEntry { coordinates });
    }

    /// Looks up a location's coordinates within its category.
    pub fn lookup(&self, category: &str, name: &str) -> Option<&[LatLon]> {
        self.categories
            .get(category)
            .and_then(|records| records.get(name))
            .map(|entry| entry.coordinates.as_slice())
    }

    /// Returns true if a file for `category` was loaded.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_and_lookup() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("work.json"),
            r#"{"Office": {"coordinates": [{"lat": 45.56, "lon": 18.69}]}}"#,
        )
        .unwrap();

        let db = Database::load(dir.path(), ["work"]).unwrap();
        assert!(db.has_category("work"));
        let coords = db.lookup("work", "Office").unwrap();
        assert_eq!(coords, &[LatLon { lat: 45.56, lon: 18.69 }]);
        assert!(db.lookup("work", "Gym").is_none());
        assert!(db.lookup("school", "Office").is_none());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = Database::load(dir.path(), ["nature"]);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("nature.json"), "{not json").unwrap();
        let result = Database::load(dir.path(), ["nature"]);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_insert() {
        let mut db = Database::new();
        db.insert("sport", "Pool", vec![LatLon { lat: 1.0, lon: 2.0 }]);
        assert_eq!(db.lookup("sport", "Pool").unwrap().len(), 1);
    }
}
