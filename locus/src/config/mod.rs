//! Search config and location database loading.
//!
//! Both file kinds are JSON. Any failure here is fatal for a run: it happens
//! before a single provider request is made.

mod database;
mod logic;
mod search;

pub use database::{Database, DatabaseEntry};
pub use logic::LogicTable;
pub use search::{LocationEntry, SearchConfig, DEFAULT_LOCATION_TYPE};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown composition operator in logic step '{0}' (expected union, intersection or difference)")]
    UnknownOperator(String),

    #[error("Duplicate location '{0}': canonical names must be unique")]
    DuplicateLocation(String),

    #[error("Failed to read token file {path}: {reason}")]
    Token { path: PathBuf, reason: String },
}

/// Reads and deserializes a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an API token from a text file, trimming surrounding whitespace.
pub fn read_token(path: &Path) -> Result<String, ConfigError> {
    let token = fs::read_to_string(path).map_err(|e| ConfigError::Token {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::Token {
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        });
    }
    Ok(token.to_string())
}
