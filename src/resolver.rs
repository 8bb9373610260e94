// ABOUTME: Resource resolution for serving the generated site
// ABOUTME: Maps a logical request path to a static file or a generated page

use crate::config::Config;
use crate::errors::{Result, SiteError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Logical path served for an empty request
pub const DEFAULT_PAGE: &str = "index";

/// Finds the file to serve for a request path.
///
/// A physical file under the static root wins over a generated page, so
/// untracked assets (CSS, images) are served as they are.
#[derive(Debug, Clone)]
pub struct Resolver {
    static_root: PathBuf,
    output_dir: PathBuf,
}

impl Resolver {
    pub fn new(static_root: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_root: static_root.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.static_root, &config.output_dir)
    }

    /// Resolve `request` (e.g. `/post/hello/`) to a file on disk.
    ///
    /// Returns [`SiteError::NoMapping`] when nothing exists for it, which is
    /// a 404 rather than a failure. Parent, root and hidden path segments
    /// never map to anything.
    pub fn resolve(&self, request: &str) -> Result<PathBuf> {
        let logical = request.trim_matches('/');
        let logical = if logical.is_empty() {
            DEFAULT_PAGE
        } else {
            logical
        };

        if !is_safe(Path::new(logical)) {
            return Err(SiteError::NoMapping(logical.to_string()));
        }

        let exact = self.static_root.join(logical);
        if is_regular_file(&exact)? {
            return Ok(exact);
        }

        let generated = self.output_dir.join(format!("{}.html", logical));
        if is_regular_file(&generated)? {
            return Ok(generated);
        }

        Err(SiteError::NoMapping(logical.to_string()))
    }
}

fn is_safe(path: &Path) -> bool {
    path.components().all(|component| match component {
        Component::Normal(segment) => !segment.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

fn is_regular_file(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(false),
        Err(e) => Err(SiteError::FileReadError(e)),
    }
}
