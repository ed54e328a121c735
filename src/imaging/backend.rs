//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait carries the one operation the pipeline
//! needs: thumbnail generation. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, zero
//! external binaries, statically linked.

use super::params::ThumbnailParams;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed for {0}: {1}")]
    ProcessingFailed(PathBuf, String),
}

/// Trait for thumbnail backends.
///
/// `Sync` so one backend instance can be shared by reference across
/// rayon workers.
pub trait ImageBackend: Sync {
    /// Execute a thumbnail operation (decode, resize to width, encode).
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
