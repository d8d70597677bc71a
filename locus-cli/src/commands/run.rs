//! `locus run`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use locus::app::{
    self, AppConfig, RunReport, DEFAULT_CACHE_DIR, DEFAULT_DATABASE_DIR, DEFAULT_OUTPUT_PATH,
    DEFAULT_TOKEN_PATH,
};
use locus::provider::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS};
use tracing::info;

use crate::error::CliError;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Search config (center, locations, logic)
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Directory of per-category database files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATABASE_DIR)]
    pub database: PathBuf,

    /// Provider cache directory
    #[arg(long, value_name = "DIR", default_value = DEFAULT_CACHE_DIR)]
    pub cache: PathBuf,

    /// File holding the Mapbox access token
    #[arg(long, value_name = "FILE", default_value = DEFAULT_TOKEN_PATH)]
    pub token: PathBuf,

    /// GeoJSON output file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// HTTP timeout per request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Attempts per request including the first; 1 disables retries
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub retries: u32,
}

impl RunArgs {
    fn to_app_config(&self) -> AppConfig {
        AppConfig::default()
            .with_database_dir(&self.database)
            .with_cache_dir(&self.cache)
            .with_token_path(&self.token)
            .with_output_path(&self.output)
            .with_http_timeout(Duration::from_secs(self.timeout))
            .with_max_attempts(self.retries)
    }
}

pub fn run(args: RunArgs) -> Result<(), CliError> {
    let app_config = args.to_app_config();
    info!(
        config = %args.config.display(),
        database = %app_config.database_dir.display(),
        cache = %app_config.cache_dir.display(),
        "Starting run"
    );
    let report = app::run(&app_config, &args.config)?;
    print_summary(&report, &app_config);
    Ok(())
}

fn print_summary(report: &RunReport, app_config: &AppConfig) {
    let outcome = &report.outcome;

    println!(
        "Generated {} of {} locations",
        outcome.locations.len(),
        report.config.locations.len()
    );
    if !outcome.excluded.is_empty() {
        println!("Excluded:");
        for exclusion in &outcome.excluded {
            println!("  {}: {}", exclusion.location, exclusion.reason);
        }
    }

    let categories: Vec<&str> = outcome.composition.aggregates.categories().collect();
    if categories.is_empty() {
        println!("Categories: none");
    } else {
        println!("Categories: {}", categories.join(", "));
    }

    match &outcome.composition.final_region {
        Some(region) => println!(
            "Final area: {:.6} sq. degrees in {} polygon(s)",
            outcome.final_area(),
            region.0.len()
        ),
        None => println!("Final area: none (no logic step matched an aggregate)"),
    }
    println!("Wrote {}", app_config.output_path.display());
}
