//! Application error types.

use std::fmt;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::pipeline::PipelineError;
use crate::provider::ProviderError;
use crate::render::RenderError;

/// Errors that abort a run.
#[derive(Debug)]
pub enum AppError {
    /// Config, database or token file problem.
    Config(ConfigError),

    /// Failed to build the HTTP client.
    Provider(ProviderError),

    Pipeline(PipelineError),

    /// Failed to write the export.
    Render(RenderError),

    Cache(CacheError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Provider(e) => write!(f, "Failed to set up providers: {}", e),
            AppError::Pipeline(e) => write!(f, "Pipeline failed: {}", e),
            AppError::Render(e) => write!(f, "Export failed: {}", e),
            AppError::Cache(e) => write!(f, "Cache error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Provider(e) => Some(e),
            AppError::Pipeline(e) => Some(e),
            AppError::Render(e) => Some(e),
            AppError::Cache(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Provider(e)
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        AppError::Pipeline(e)
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e)
    }
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::Cache(e)
    }
}
