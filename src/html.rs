// ABOUTME: Markdown conversion for posts
// ABOUTME: Turns the body of a post into HTML that templates embed unescaped

use comrak::{markdown_to_html, ComrakOptions};
use log::debug;

/// Options matching what authors expect from a blog: tables, strikethrough,
/// autolinks and anchor ids on headings.
fn markdown_options() -> ComrakOptions {
    let mut options = ComrakOptions::default();
    options.render.unsafe_ = true; // Allow raw HTML, posts are author content
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.header_ids = Some(String::new());
    options
}

/// Convert the Markdown body of a post to HTML
pub fn markdown_to_html_body(markdown: &str) -> String {
    debug!("Converting {} bytes of markdown", markdown.len());
    markdown_to_html(markdown, &markdown_options())
}
