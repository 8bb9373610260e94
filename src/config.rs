// ABOUTME: Configuration module for the blogagogo site generator
// ABOUTME: Loads config.yaml and maps content paths to output paths and URLs

use crate::errors::{Result, SiteError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Site configuration, normally read from `config.yaml`.
///
/// Every key is optional; missing keys fall back to [`Config::default`].
/// Unknown keys are rejected. Short key names (`tmpldir`, `outdir`,
/// `watchfile`, ...) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the base, post and index templates
    #[serde(alias = "tmpldir")]
    pub template_dir: PathBuf,

    /// Content files ending with this are rendered as templated pages
    #[serde(alias = "tmplext")]
    pub template_ext: String,

    /// Shared outer template, relative to `template_dir`
    #[serde(alias = "basetmpl")]
    pub base_template: String,

    /// Template used for every post, relative to `template_dir`
    #[serde(alias = "posttmpl")]
    pub post_template: String,

    /// Template used for the list of posts, relative to `template_dir`
    #[serde(alias = "blogtmpl")]
    pub index_template: String,

    /// Content files ending with this are rendered as Markdown posts
    #[serde(alias = "postext")]
    pub post_ext: String,

    /// Root of the content tree
    #[serde(alias = "contentdir")]
    pub content_dir: PathBuf,

    /// Root of the generated site
    #[serde(alias = "outdir")]
    pub output_dir: PathBuf,

    /// Where the tracking state is persisted between runs
    #[serde(alias = "watchfile")]
    pub dump_file: PathBuf,

    /// Directory searched first when resolving requests (static assets)
    pub static_root: PathBuf,

    /// Whether to keep rescanning the content tree after the first pass
    pub watch: bool,

    /// Seconds between two rescans in watch mode
    pub scan_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
            template_ext: ".tmpl".to_string(),
            base_template: "base.tmpl".to_string(),
            post_template: "post.tmpl".to_string(),
            index_template: "blog.tmpl".to_string(),
            post_ext: ".md".to_string(),
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("public"),
            dump_file: PathBuf::from(".blogagogo.yaml"),
            static_root: PathBuf::from("static"),
            watch: false,
            scan_interval_secs: 5,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file.
    ///
    /// An unreadable or malformed file is a configuration error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            SiteError::ConfigError(format!("Unable to load configuration file {:?}: {}", path, e))
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(raw)
            .map_err(|e| SiteError::ConfigError(format!("Malformed configuration: {}", e)))
    }

    /// Check that the template directory and the three named templates exist
    pub fn validate(&self) -> Result<()> {
        if !self.template_dir.is_dir() {
            return Err(SiteError::ConfigError(format!(
                "Template directory does not exist: {:?}",
                self.template_dir
            )));
        }
        for template in [self.base_path(), self.post_path(), self.index_path()] {
            if !template.is_file() {
                return Err(SiteError::ConfigError(format!(
                    "Template not found: {:?}",
                    template
                )));
            }
        }
        if self.template_ext.is_empty() || self.post_ext.is_empty() {
            return Err(SiteError::ConfigError(
                "template_ext and post_ext must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base_path(&self) -> PathBuf {
        self.template_dir.join(&self.base_template)
    }

    pub fn post_path(&self) -> PathBuf {
        self.template_dir.join(&self.post_template)
    }

    pub fn index_path(&self) -> PathBuf {
        self.template_dir.join(&self.index_template)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    /// Whether a content file is rendered at all
    pub fn is_supported(&self, path: &Path) -> bool {
        self.is_template(path) || self.is_post(path)
    }

    /// Whether a content file is a Markdown post
    pub fn is_post(&self, path: &Path) -> bool {
        file_name_ends_with(path, &self.post_ext)
    }

    /// Whether a content file is a templated page
    pub fn is_template(&self, path: &Path) -> bool {
        file_name_ends_with(path, &self.template_ext)
    }

    /// The logical URL path of a content file: `content/post/a.md` -> `post/a`
    pub fn logical_path(&self, content_path: &Path) -> String {
        let relative = content_path
            .strip_prefix(&self.content_dir)
            .unwrap_or(content_path);
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let stripped = relative
            .strip_suffix(self.template_ext.as_str())
            .unwrap_or(&relative);
        let stripped = stripped
            .strip_suffix(self.post_ext.as_str())
            .unwrap_or(stripped);
        stripped.to_string()
    }

    /// Where the rendered HTML for a content file is written.
    ///
    /// The content root is replaced by the output root, the template or post
    /// extension is dropped and `.html` appended. The resolver relies on this
    /// being the exact inverse of its `<path>.html` lookup.
    pub fn output_path(&self, content_path: &Path) -> PathBuf {
        self.output_dir
            .join(format!("{}.html", self.logical_path(content_path)))
    }

    /// Where the aggregated blog index is written
    pub fn index_output_path(&self) -> PathBuf {
        let name = self
            .index_template
            .strip_suffix(self.template_ext.as_str())
            .unwrap_or(&self.index_template);
        let name = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "index".to_string());
        self.output_dir.join(format!("{}.html", name))
    }
}

fn file_name_ends_with(path: &Path, ext: &str) -> bool {
    if ext.is_empty() {
        return false;
    }
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(ext))
        .unwrap_or(false)
}
