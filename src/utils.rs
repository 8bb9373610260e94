// ABOUTME: Utility functions for the blogagogo site generator
// ABOUTME: Directory helpers and the timestamp format used by the change tracker

use crate::errors::{Result, SiteError};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

/// Validate that a directory exists
pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SiteError::PathNotFoundError(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(SiteError::ValidationError(format!(
            "Path is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(SiteError::FileReadError)?;
    } else if !path.is_dir() {
        return Err(SiteError::ValidationError(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent_directory_exists(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory_exists(parent)?;
        }
    }
    Ok(())
}

/// Format a modification time the way the tracker stores it.
///
/// RFC 3339 in UTC with nanoseconds, so two different mtimes never format
/// the same.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// The formatted modification time of a file
pub fn last_seen(metadata: &Metadata) -> Result<String> {
    let modified = metadata.modified().map_err(SiteError::FileReadError)?;
    Ok(format_timestamp(modified))
}
