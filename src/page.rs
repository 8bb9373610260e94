// ABOUTME: Page data types shared by the renderer, tracker and blog index
// ABOUTME: PageInfo is decoded from front matter and persisted with each tracked file

use serde::{Deserialize, Serialize};

/// Metadata an author writes at the top of a content file.
///
/// Unknown keys are ignored and missing keys stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub title: String,
    pub blurb: String,
    /// Free-form, whatever the author typed
    pub date: String,
    /// Logical URL path, only filled in for posts
    pub path: String,
}

/// What a content template sees while rendering: `info` and `body`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub info: PageInfo,
    /// Rendered HTML; templates must emit it with `| safe`
    pub body: String,
}

impl Page {
    pub fn new(info: PageInfo, body: String) -> Self {
        Self { info, body }
    }
}
