// ABOUTME: Change tracking for incremental builds
// ABOUTME: Remembers what each content file rendered to and when, persisted as YAML

use crate::errors::{Result, SiteError};
use crate::page::PageInfo;
use crate::utils;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// What is remembered about one successfully rendered content file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    pub content: PageInfo,
    /// Modification time of the file when it was rendered,
    /// formatted by [`utils::format_timestamp`]
    #[serde(rename = "lastSeen")]
    pub last_seen: String,
}

/// Content-file path to [`TrackedFile`].
///
/// Keys are the paths as they were found while walking the content tree. A
/// `BTreeMap` keeps the dump file stable between runs so an unchanged site
/// writes an identical dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tracker {
    files: BTreeMap<String, TrackedFile>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the tracking state from a dump file.
    ///
    /// A missing file is an empty tracker. A file that cannot be read or
    /// parsed is a [`SiteError::StateError`]; the caller decides whether to
    /// start over.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No tracking state at {:?}, starting empty", path);
                return Ok(Self::new());
            }
            Err(e) => {
                return Err(SiteError::StateError(format!(
                    "Unable to read {:?}: {}",
                    path, e
                )))
            }
        };
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let tracker: Self = serde_yaml_ng::from_str(&raw)
            .map_err(|e| SiteError::StateError(format!("Malformed {:?}: {}", path, e)))?;
        info!("Loaded {} tracked files from {:?}", tracker.len(), path);
        Ok(tracker)
    }

    /// Write the tracking state. Not atomic: a crash mid-write leaves a
    /// corrupt dump, which the next start treats as "rebuild everything".
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml_ng::to_string(self)
            .map_err(|e| SiteError::StateError(format!("Unable to serialize state: {}", e)))?;
        utils::ensure_parent_directory_exists(path)?;
        fs::write(path, yaml).map_err(|source| SiteError::OutputWriteError {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved {} tracked files to {:?}", self.len(), path);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&TrackedFile> {
        self.files.get(key)
    }

    /// True when the file was rendered before and has not been touched since
    pub fn is_unchanged(&self, key: &str, last_seen: &str) -> bool {
        self.files
            .get(key)
            .map(|tracked| tracked.last_seen == last_seen)
            .unwrap_or(false)
    }

    pub fn record(&mut self, key: String, tracked: TrackedFile) {
        self.files.insert(key, tracked);
    }

    pub fn remove(&mut self, key: &str) -> Option<TrackedFile> {
        self.files.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TrackedFile)> {
        self.files.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.files.keys()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
