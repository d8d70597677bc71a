//! Application wiring.
//!
//! [`run`] is what the CLI calls: load the search config and databases,
//! build HTTP-backed providers, run the pipeline and write the export.
//!
//! # Example
//!
//! ```ignore
//! use locus::app::{run, AppConfig};
//!
//! let app = AppConfig::default().with_cache_dir("/tmp/locus-cache");
//! let report = run(&app, Path::new("config.json"))?;
//! println!("{} locations excluded", report.outcome.excluded.len());
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{build_generator, load_inputs, run, LiveGenerator, RunReport};
pub use config::{
    AppConfig, ElevationSettings, DEFAULT_CACHE_DIR, DEFAULT_DATABASE_DIR, DEFAULT_OUTPUT_PATH,
    DEFAULT_ROUTING_INTERVAL_MS, DEFAULT_TOKEN_PATH,
};
pub use error::AppError;
