//! Pure Rust image processing backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image` crate (pure Rust decoders) |
//! | Resize | `image::DynamicImage::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at configured quality |
//! | Encode → PNG | `image::codecs::png::PngEncoder` at maximum compression |
//!
//! Thumbnails keep their source format: `a.jpg` produces a JPEG thumbnail,
//! `b.png` a PNG one. Smaller sources are scaled up to the target width,
//! matching how the published site sizes its cards.

use super::backend::{BackendError, ImageBackend};
use super::params::ThumbnailParams;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Extensions whose decoders and encoders are compiled in.
const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Returns the image file extensions the thumbnail pipeline picks up.
pub fn supported_input_extensions() -> &'static [&'static str] {
    SUPPORTED_EXTENSIONS
}

/// Whether the thumbnail pipeline handles this source file.
pub fn is_supported_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| e.eq_ignore_ascii_case(s))
        })
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(path.to_path_buf(), format!("decode failed: {e}"))
        })
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let file = File::create(path).map_err(BackendError::Io)?;
    let writer = BufWriter::new(file);

    let result = match ext.as_str() {
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel; flatten before encoding.
            let rgb = DynamicImage::ImageRgb8(img.into_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(writer, quality as u8))
        }
        "png" => img.write_with_encoder(PngEncoder::new_with_quality(
            writer,
            CompressionType::Best,
            image::codecs::png::FilterType::Adaptive,
        )),
        other => {
            return Err(BackendError::ProcessingFailed(
                path.to_path_buf(),
                format!("unsupported output format: {other}"),
            ));
        }
    };
    result.map_err(|e| {
        BackendError::ProcessingFailed(path.to_path_buf(), format!("encode failed: {e}"))
    })
}

impl ImageBackend for RustBackend {
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;

        // resize() treats the bounds as a fit box; an unbounded height
        // pins the scale to the target width.
        let resized = img.resize(params.width, u32::MAX, FilterType::Lanczos3);

        save_image(resized, &params.output, params.quality.value())
    }
}
