//! CLI error type.

use thiserror::Error;

use locus::app::AppError;
use locus::cache::CacheError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    App(#[from] AppError),

    #[error("Failed to read cache statistics: {0}")]
    CacheStats(#[source] CacheError),

    #[error("Failed to clear cache: {0}")]
    CacheClear(#[source] CacheError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::App(AppError::Config(_)) => 2,
            CliError::App(_) => 1,
            CliError::CacheStats(_) | CliError::CacheClear(_) => 1,
            CliError::Logging(_) => 3,
        }
    }
}
