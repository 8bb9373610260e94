// ABOUTME: Blog index aggregation
// ABOUTME: Collects every tracked post and renders them as one list through the index template

use crate::config::Config;
use crate::errors::{Result, SiteError};
use crate::page::PageInfo;
use crate::render::{Renderer, TemplateSource};
use crate::tracker::Tracker;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tera::Context;

/// The metadata of every tracked post, newest first.
///
/// Dates are free-form so they are compared as strings, which orders ISO
/// dates correctly. Equal dates fall back to the post's path.
pub fn collect_posts(config: &Config, tracker: &Tracker) -> Vec<PageInfo> {
    let mut posts: Vec<PageInfo> = tracker
        .iter()
        .filter(|(key, _)| config.is_post(Path::new(key.as_str())))
        .map(|(_, tracked)| tracked.content.clone())
        .collect();

    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path)));
    posts
}

/// Render the blog index and overwrite the previous one.
///
/// The index template sees the list as `posts`.
pub fn write_index(config: &Config, renderer: &Renderer, tracker: &Tracker) -> Result<PathBuf> {
    let posts = collect_posts(config, tracker);
    let mut context = Context::new();
    context.insert("posts", &posts);

    let output_path = config.index_output_path();
    let file = File::create(&output_path).map_err(|source| SiteError::OutputWriteError {
        path: output_path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let index_template = config.index_path();
    renderer.render(&mut writer, TemplateSource::File(&index_template), &context)?;
    writer.flush().map_err(|source| SiteError::OutputWriteError {
        path: output_path.clone(),
        source,
    })?;

    info!("Blog index written with {} posts: {:?}", posts.len(), output_path);
    Ok(output_path)
}
