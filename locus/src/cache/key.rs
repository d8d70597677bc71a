//! Structured cache keys.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Number of hex characters of the digest kept in file names.
const HASH_LEN: usize = 16;

/// Longest slug kept in file names.
const MAX_SLUG_LEN: usize = 48;

/// Identifies one persisted provider result.
///
/// Keys are hashed over their full serialized form, so two keys collide only
/// if every field matches. The `location` field is the location's canonical
/// name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CacheKey {
    /// One isochrone request: canonical name plus the origin coordinate.
    Isochrone { location: String, lat: f64, lon: f64 },

    /// One elevation grid: canonical name plus category.
    Elevation { location: String, category: String },
}

impl CacheKey {
    pub fn isochrone(location: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::Isochrone {
            location: location.into(),
            lat,
            lon,
        }
    }

    pub fn elevation(location: impl Into<String>, category: impl Into<String>) -> Self {
        Self::Elevation {
            location: location.into(),
            category: category.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CacheKey::Isochrone { .. } => "isochrone",
            CacheKey::Elevation { .. } => "elevation",
        }
    }

    pub fn location(&self) -> &str {
        match self {
            CacheKey::Isochrone { location, .. } | CacheKey::Elevation { location, .. } => location,
        }
    }

    /// Hex SHA-256 digest of the key's JSON form.
    pub fn digest(&self) -> String {
        // Serializing a plain enum of strings and floats cannot fail.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let hash = Sha256::digest(&canonical);
        hash.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// File name for this key: `<kind>-<slug>-<hash>.bin`.
    pub fn file_name(&self) -> String {
        let digest = self.digest();
        format!(
            "{}-{}-{}.bin",
            self.kind(),
            slug(self.location()),
            &digest[..HASH_LEN]
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Isochrone { location, lat, lon } => {
                write!(f, "isochrone:{}@{},{}", location, lat, lon)
            }
            CacheKey::Elevation { location, category } => {
                write!(f, "elevation:{}/{}", location, category)
            }
        }
    }
}

/// Reduces a name to `[A-Za-z0-9_-]`, truncated.
fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SLUG_LEN)
        .collect();
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug
    }
}
