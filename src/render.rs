// ABOUTME: Template rendering module for the blogagogo site generator
// ABOUTME: Composes a content template with the shared base template using Tera

use crate::errors::{Result, SiteError};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

/// Name the base template is registered under
pub const BASE_TEMPLATE_NAME: &str = "base.html";

/// Name the content template is registered under
pub const CONTENT_TEMPLATE_NAME: &str = "content.html";

/// Where the content template comes from
#[derive(Debug, Clone, Copy)]
pub enum TemplateSource<'a> {
    /// A template file, e.g. the post or index template
    File(&'a Path),
    /// Template source held in memory, e.g. the body of a page.
    /// `name` only shows up in error messages.
    Inline { name: &'a str, source: &'a str },
}

impl TemplateSource<'_> {
    fn describe(&self) -> String {
        match self {
            TemplateSource::File(path) => path.display().to_string(),
            TemplateSource::Inline { name, .. } => name.to_string(),
        }
    }
}

/// Renders content templates inside the shared base template.
///
/// Two ways of composing are supported:
///
/// * the content template starts with `{% extends "base.html" %}` and
///   overrides blocks; the content template is rendered.
/// * the content template is a plain fragment; the base template is rendered
///   and pulls it in with `{% include "content.html" %}`.
///
/// A site uses one style or the other: a base that includes `content.html`
/// must not be extended by it.
///
/// Templates are parsed on every call so edits to the base template are
/// picked up by the next pass.
#[derive(Debug, Clone)]
pub struct Renderer {
    base_template: PathBuf,
}

impl Renderer {
    pub fn new(base_template: impl Into<PathBuf>) -> Self {
        Self {
            base_template: base_template.into(),
        }
    }

    pub fn base_template(&self) -> &Path {
        &self.base_template
    }

    /// Render `content` with `context` bound and stream the result to `out`.
    ///
    /// Any parse or render failure is a [`SiteError::TemplateError`].
    pub fn render<W: Write>(
        &self,
        out: W,
        content: TemplateSource<'_>,
        context: &Context,
    ) -> Result<()> {
        let tera = self.load(content)?;
        let entry = entry_template(&tera, &content)?;
        debug!("Rendering {} through {}", content.describe(), entry);

        tera.render_to(entry, context, out)
            .map_err(|e| template_error(&content.describe(), &e))
    }

    /// Render into a string, mostly useful for tests and previews
    pub fn render_to_string(&self, content: TemplateSource<'_>, context: &Context) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(&mut buffer, content, context)?;
        String::from_utf8(buffer).map_err(|e| SiteError::TemplateError {
            name: content.describe(),
            message: format!("rendered output is not UTF-8: {}", e),
        })
    }

    fn load(&self, content: TemplateSource<'_>) -> Result<Tera> {
        let base = fs::read_to_string(&self.base_template).map_err(|e| {
            SiteError::ConfigError(format!(
                "Unable to read base template {:?}: {}",
                self.base_template, e
            ))
        })?;
        let content_source = match content {
            TemplateSource::File(path) => fs::read_to_string(path).map_err(|e| {
                SiteError::ConfigError(format!("Unable to read template {:?}: {}", path, e))
            })?,
            TemplateSource::Inline { source, .. } => source.to_string(),
        };

        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (BASE_TEMPLATE_NAME, base.as_str()),
            (CONTENT_TEMPLATE_NAME, content_source.as_str()),
        ])
        .map_err(|e| template_error(&content.describe(), &e))?;
        Ok(tera)
    }
}

/// Inheriting templates are rendered directly, fragments through the base.
fn entry_template(tera: &Tera, content: &TemplateSource<'_>) -> Result<&'static str> {
    let template = tera
        .get_template(CONTENT_TEMPLATE_NAME)
        .map_err(|e| template_error(&content.describe(), &e))?;
    if template.parent.is_some() {
        Ok(CONTENT_TEMPLATE_NAME)
    } else {
        Ok(BASE_TEMPLATE_NAME)
    }
}

fn template_error(name: &str, err: &tera::Error) -> SiteError {
    SiteError::TemplateError {
        name: name.to_string(),
        message: collect_error_chain(err).join(": "),
    }
}

/// Tera hides the useful part of a failure in the source chain
fn collect_error_chain(err: &dyn std::error::Error) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();

    while let Some(err) = source {
        chain.push(err.to_string());
        source = err.source();
    }

    chain
}
