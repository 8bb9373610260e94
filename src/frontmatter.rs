// ABOUTME: Front matter handling for content files
// ABOUTME: Splits a file into its `---` metadata block and body, and decodes the metadata

use crate::errors::{Result, SiteError};
use crate::page::PageInfo;
use std::fs;
use std::path::Path;

const DELIMITER: &str = "---";

/// Split the text of a content file into `(metadata, body)`.
///
/// Every line that is exactly `---` toggles metadata mode. Blank lines are
/// dropped from both halves. A block that is opened but never closed takes
/// the rest of the file as metadata.
pub fn split_front_matter(text: &str) -> (String, String) {
    let mut metadata = String::new();
    let mut body = String::new();
    let mut in_metadata = false;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line == DELIMITER {
            in_metadata = !in_metadata;
            continue;
        }
        let target = if in_metadata { &mut metadata } else { &mut body };
        target.push_str(line);
        target.push('\n');
    }

    (metadata, body)
}

/// Read a content file and split it
pub fn read_and_split(path: &Path) -> Result<(String, String)> {
    let text = fs::read_to_string(path).map_err(|source| SiteError::ContentReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(split_front_matter(&text))
}

/// Decode a metadata block into a [`PageInfo`].
///
/// An empty block is the zero record. Anything the YAML decoder rejects comes
/// back as [`SiteError::MetadataError`]; callers render with the zero record.
pub fn decode_page_info(metadata: &str) -> Result<PageInfo> {
    if metadata.trim().is_empty() {
        return Ok(PageInfo::default());
    }
    let info = serde_yaml_ng::from_str(metadata)?;
    Ok(info)
}
