//! Content directory collection.
//!
//! Thin wrapper around the parser: lists one content directory
//! (non-recursive), filters to eligible markdown files, parses each, and
//! returns the entities sorted by filename.
//!
//! ## Eligibility
//!
//! - `.md` extension only; anything else in the directory is ignored.
//! - Names starting with `_` are skipped (draft convention).
//!
//! ## Ordering
//!
//! Entries are sorted by filename (byte order) before parsing. Directory
//! listing order is filesystem-dependent and never leaks into the output;
//! collection order defines page order and search-index order downstream.

use crate::content::{self, ContentEntity, ContentError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error listing {0}: {1}")]
    ReadDir(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ContentError),
}

/// Collect every eligible markdown file in `dir`, sorted by filename.
///
/// A missing directory is an error; an empty one yields an empty vec. The
/// first file that fails to parse aborts the whole collection — partial
/// results are never returned.
pub fn collect_dir(dir: &Path) -> Result<Vec<ContentEntity>, CollectError> {
    let entries =
        fs::read_dir(dir).map_err(|e| CollectError::ReadDir(dir.to_path_buf(), e))?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_content_file(path))
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    paths
        .iter()
        .map(|path| content::parse_file(path).map_err(CollectError::from))
        .collect()
}

fn is_content_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".md") && !name.starts_with('_')
}
