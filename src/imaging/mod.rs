//! Image processing: thumbnail generation behind a backend trait.
//!
//! The trait seam exists for tests — orchestration code is exercised with
//! a recording mock instead of real pixel work. Production always uses
//! [`RustBackend`].

pub mod backend;
pub mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{Quality, ThumbnailParams};
pub use rust_backend::{RustBackend, is_supported_source, supported_input_extensions};
