// ABOUTME: Build orchestrator for the blogagogo site generator
// ABOUTME: Walks the content tree, re-renders stale files and republishes the blog index

use crate::blog;
use crate::config::Config;
use crate::errors::{Result, SiteError};
use crate::frontmatter;
use crate::html;
use crate::page::{Page, PageInfo};
use crate::render::{Renderer, TemplateSource};
use crate::resolver::Resolver;
use crate::tracker::{TrackedFile, Tracker};
use crate::utils;
use log::{debug, error, info, warn};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

/// What one build pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Files rendered this pass
    pub rendered: usize,
    /// Supported files skipped because their mtime matched the tracker
    pub unchanged: usize,
    /// Files with neither the template nor the post extension, and entries
    /// that are not readable regular files
    pub unsupported: usize,
    /// Tracker entries dropped because their content file is gone
    pub pruned: usize,
    /// Files that could not be written, retried next pass
    pub failed: usize,
    /// Set when the blog index was rewritten
    pub index: Option<PathBuf>,
}

impl BuildReport {
    pub fn changed(&self) -> bool {
        self.index.is_some()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rendered, {} unchanged, {} unsupported, {} pruned, {} failed",
            self.rendered, self.unchanged, self.unsupported, self.pruned, self.failed
        )
    }
}

/// Owns the configuration and the tracking state and runs build passes.
///
/// Passes are strictly serial: `build` takes `&mut self`, so two passes over
/// the same generator can never overlap.
pub struct Generator {
    config: Config,
    renderer: Renderer,
    tracker: Tracker,
    // Tracker changes not yet flushed to the index and the dump. Survives a
    // pass that aborts halfway so the next pass publishes what was rendered.
    pending: bool,
}

impl Generator {
    /// Validate the configuration and load the tracking state from the dump.
    ///
    /// A corrupt dump is not fatal: every file is rendered again.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        utils::validate_directory_exists(&config.content_dir).map_err(|e| {
            SiteError::ConfigError(format!(
                "Content directory {:?} is unusable: {}",
                config.content_dir, e
            ))
        })?;

        let tracker = match Tracker::load(&config.dump_file) {
            Ok(tracker) => tracker,
            Err(e) => {
                warn!("{}; rebuilding every file", e);
                Tracker::new()
            }
        };

        Ok(Self::with_tracker(config, tracker))
    }

    /// Build a generator around existing tracking state without touching disk
    pub fn with_tracker(config: Config, tracker: Tracker) -> Self {
        let renderer = Renderer::new(config.base_path());
        Self {
            config,
            renderer,
            tracker,
            pending: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// A resolver over this site's static root and output tree
    pub fn resolver(&self) -> Resolver {
        Resolver::from_config(&self.config)
    }

    /// Run one build pass.
    ///
    /// Stale files are rendered, deleted files pruned, and if anything changed
    /// the blog index is rebuilt and the tracking state saved. Errors returned
    /// here abort the pass; [`SiteError::is_fatal`] tells whether to stop
    /// altogether.
    pub fn build(&mut self) -> Result<BuildReport> {
        info!("Building site from {:?}", self.config.content_dir);

        utils::ensure_directory_exists(&self.config.output_dir).map_err(|e| {
            SiteError::ConfigError(format!(
                "Unable to create output directory {:?}: {}",
                self.config.output_dir, e
            ))
        })?;

        let mut report = BuildReport::default();
        let mut unmirrored: Vec<PathBuf> = Vec::new();

        for entry in WalkDir::new(&self.config.content_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if entry.file_type().is_dir() {
                if entry.depth() > 0 {
                    if let Err(e) = self.mirror_directory(path) {
                        warn!("Unable to mirror {:?} into the output tree: {}", path, e);
                        unmirrored.push(path.to_path_buf());
                    }
                }
                continue;
            }

            if unmirrored.iter().any(|dir| path.starts_with(dir)) {
                debug!("Skipping {:?}, its output directory is missing", path);
                if self.config.is_supported(path) {
                    report.failed += 1;
                }
                continue;
            }

            self.visit_file(path, &mut report)?;
        }

        report.pruned = self.prune();
        if report.pruned > 0 {
            self.pending = true;
        }

        if self.pending {
            let index = blog::write_index(&self.config, &self.renderer, &self.tracker)?;
            self.tracker.save(&self.config.dump_file)?;
            self.pending = false;
            report.index = Some(index);
        }

        info!("Build pass finished: {}", report);
        Ok(report)
    }

    fn visit_file(&mut self, path: &Path, report: &mut BuildReport) -> Result<()> {
        if !self.config.is_supported(path) {
            report.unsupported += 1;
            return Ok(());
        }

        // Keys must name the file exactly or pruning would drop it every pass
        let Some(key) = path.to_str().map(str::to_string) else {
            warn!("Skipping {:?}, its name is not valid UTF-8", path);
            report.unsupported += 1;
            return Ok(());
        };

        // Follows symlinks; dangling ones (editor lock files) are skipped
        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => {
                debug!("Skipping {:?}, not a regular file", path);
                report.unsupported += 1;
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Skipping {:?}, it does not resolve to a file", path);
                report.unsupported += 1;
                return Ok(());
            }
            Err(source) => {
                return Err(SiteError::ContentReadError {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let last_seen = utils::last_seen(&metadata)?;

        if self.tracker.is_unchanged(&key, &last_seen) {
            report.unchanged += 1;
            return Ok(());
        }

        match self.render_file(path) {
            Ok(content) => {
                self.tracker.record(key, TrackedFile { content, last_seen });
                self.pending = true;
                report.rendered += 1;
            }
            Err(e @ SiteError::OutputWriteError { .. }) => {
                error!("Skipping {:?}: {}", path, e);
                report.failed += 1;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Render one content file and return the metadata to track for it
    fn render_file(&self, path: &Path) -> Result<PageInfo> {
        let (metadata, body) = frontmatter::read_and_split(path)?;
        let mut info = match frontmatter::decode_page_info(&metadata) {
            Ok(info) => info,
            Err(e) => {
                warn!("{:?}: {}; rendering with empty metadata", path, e);
                PageInfo::default()
            }
        };

        let is_post = self.config.is_post(path);
        if is_post {
            info.path = self.config.logical_path(path);
        }

        let output_path = self.config.output_path(path);
        debug!("Rendering {:?} -> {:?}", path, output_path);
        let write_error = |source| SiteError::OutputWriteError {
            path: output_path.clone(),
            source,
        };
        let mut writer = BufWriter::new(File::create(&output_path).map_err(write_error)?);

        if is_post {
            let page = Page::new(info.clone(), html::markdown_to_html_body(&body));
            let post_template = self.config.post_path();
            self.renderer.render(
                &mut writer,
                TemplateSource::File(&post_template),
                &page_context(&page, path)?,
            )?;
        } else {
            // The body of a page is itself the content template
            let page = Page::new(info.clone(), String::new());
            let name = path.display().to_string();
            self.renderer.render(
                &mut writer,
                TemplateSource::Inline {
                    name: &name,
                    source: &body,
                },
                &page_context(&page, path)?,
            )?;
        }

        writer.flush().map_err(write_error)?;
        Ok(info)
    }

    fn mirror_directory(&self, dir: &Path) -> Result<()> {
        let relative = dir.strip_prefix(&self.config.content_dir).unwrap_or(dir);
        let mirrored = self.config.output_dir.join(relative);
        if !mirrored.is_dir() {
            fs::create_dir_all(&mirrored).map_err(|source| SiteError::OutputWriteError {
                path: mirrored.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Forget files that no longer exist and delete what they rendered to
    fn prune(&mut self) -> usize {
        let missing: Vec<String> = self
            .tracker
            .keys()
            .filter(|key| !Path::new(key.as_str()).exists())
            .cloned()
            .collect();

        for key in &missing {
            self.tracker.remove(key);
            let output = self.config.output_path(Path::new(key));
            match fs::remove_file(&output) {
                Ok(()) => info!("Removed {:?}, its source {} is gone", output, key),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!("Unable to remove stale output {:?}: {}", output, e),
            }
        }
        missing.len()
    }
}

fn page_context(page: &Page, path: &Path) -> Result<Context> {
    Context::from_serialize(page).map_err(|e| SiteError::TemplateError {
        name: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Remove everything a previous run produced: the output tree and the dump
pub fn clean_previous_run(config: &Config) -> Result<()> {
    if config.output_dir.exists() {
        info!("Removing previous output {:?}", config.output_dir);
        fs::remove_dir_all(&config.output_dir)?;
    }
    match fs::remove_file(&config.dump_file) {
        Ok(()) => info!("Removed tracking state {:?}", config.dump_file),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(SiteError::FileReadError(e)),
    }
    Ok(())
}
