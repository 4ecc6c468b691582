//! Primary content lookup.

use crate::error::{Error, Result};
use crate::tree::{find_file, WorkTree};
use serde::{Deserialize, Serialize};

/// Filename prefix of the primary content page.
pub const CONTENT_PREFIX: &str = "chapter";

/// Filename suffix of the primary content page.
pub const CONTENT_SUFFIX: &str = ".html";

/// Relative path of the primary content page within the package tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentRef(String);

impl ContentRef {
    /// Create a content reference from a `/`-separated relative path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The relative path as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path component.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ContentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a file name qualifies as primary content (`chapter*.html`).
pub fn is_content_name(name: &str) -> bool {
    name.starts_with(CONTENT_PREFIX) && name.ends_with(CONTENT_SUFFIX)
}

/// Find the primary content page of `tree`.
///
/// Files are visited in walk order (see [`crate::tree::walk_files`]) and
/// the first `chapter*.html` wins. The walk stops there; directories after
/// the match are not listed.
pub fn locate_content<T: WorkTree + ?Sized>(tree: &T) -> Result<ContentRef> {
    let found = find_file(tree, "", |path| {
        let name = path.rsplit('/').next().unwrap_or(path);
        is_content_name(name)
    })?;

    match found {
        Some(path) => {
            log::debug!("primary content page: {}", path);
            Ok(ContentRef(path))
        }
        None => Err(Error::MainContentNotFound),
    }
}
