// ABOUTME: Error types for the blogagogo site generator
// ABOUTME: Separates fatal configuration errors from per-file and per-pass failures

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to read content file {path:?}: {source}")]
    ContentReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {path:?}: {source}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error in {name}: {message}")]
    TemplateError { name: String, message: String },

    #[error("Front matter could not be decoded: {0}")]
    MetadataError(String),

    #[error("Tracking state error: {0}")]
    StateError(String),

    #[error("No mapping for resource: {0}")]
    NoMapping(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

impl SiteError {
    /// Errors that mean the site cannot be built correctly at all.
    ///
    /// A broken template or config is a property of the system rather than of
    /// one content file, so callers stop the process instead of moving on to
    /// the next pass.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SiteError::ConfigError(_)
                | SiteError::TemplateError { .. }
                | SiteError::ValidationError(_)
                | SiteError::PathNotFoundError(_)
        )
    }
}

// Implement conversion from anyhow::Error to our SiteError
impl From<anyhow::Error> for SiteError {
    fn from(err: anyhow::Error) -> Self {
        SiteError::UnknownError(err.to_string())
    }
}

impl From<serde_yaml_ng::Error> for SiteError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        SiteError::MetadataError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
