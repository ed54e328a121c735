//! Parameter types for imaging operations.

use std::path::PathBuf;

/// JPEG encoding quality. Values outside the encoder's 1-100 range are
/// clamped; range errors for user input happen at the config boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// One thumbnail operation: decode `source`, resize to `width` preserving
/// aspect ratio (smaller sources are scaled up), encode to `output`.
#[derive(Debug, Clone)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub quality: Quality,
}
