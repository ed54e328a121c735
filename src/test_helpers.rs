//! Shared test utilities for the trombi test suite.
//!
//! Content fixtures are synthesized per test rather than checked in:
//! a content file is three lines of front-matter plus a body, so tests
//! build exactly the tree they need inside a `TempDir`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::write_md;
//!
//! let dir = TempDir::new().unwrap();
//! write_md(dir.path(), "alice.md", "---\ntitre: Dev\n---\nHi\n");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

/// Write a markdown file into `dir`, creating the directory first.
/// Returns the full path for follow-up assertions.
pub fn write_md(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
