//! Site configuration.
//!
//! One optional `config.toml` at the root of the content directory. Every
//! key has a default; unknown keys are rejected to catch typos early. The
//! parsed [`SiteConfig`] is an explicit value threaded through the
//! pipeline — no global state.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! static_dir = "static"      # Copied verbatim into the output root
//!
//! [site]
//! title = "Trombinoscope"    # <title> and homepage header
//! description = ""           # Meta description (empty = omitted)
//!
//! [homepage]
//! # shuffle_seed = 42        # Omit for a fresh card shuffle per build
//!
//! [thumbnails]
//! width = 300                # Card width in pixels (height follows)
//! quality = 90               # JPEG encoding quality (1-100)
//!
//! [processing]
//! # max_processes = 4        # Max parallel workers (omit for auto = CPU cores)
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("TOML parse error in {0}: {1}")]
    Toml(PathBuf, #[source] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory copied verbatim into the output root. Person photos live
    /// under `<static_dir>/photos/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Site identity (title, meta description).
    pub site: SiteSection,
    /// Homepage settings (card shuffle).
    pub homepage: HomepageConfig,
    /// Thumbnail generation settings (width, JPEG quality).
    pub thumbnails: ThumbnailsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            site: SiteSection::default(),
            homepage: HomepageConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.title must not be empty".into(),
            ));
        }
        if self.thumbnails.width == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.width must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(format!(
                "thumbnails.quality must be 1-100, got {}",
                self.thumbnails.quality
            )));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}

/// Site identity settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Used in `<title>` and the homepage header.
    pub title: String,
    /// Meta description for the homepage. Empty = omitted.
    pub description: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Trombinoscope".to_string(),
            description: String::new(),
        }
    }
}

/// Homepage settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomepageConfig {
    /// Seed for the homepage card shuffle. Same seed, same order.
    /// When absent, every build shuffles freshly.
    pub shuffle_seed: Option<u64>,
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Card width in pixels; height follows the source aspect ratio.
    pub width: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            width: 300,
            quality: 90,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match config.max_processes {
        Some(n) if n > 0 => n.min(cores),
        _ => cores,
    }
}

/// Load config from `config.toml` in the given directory.
///
/// A missing file yields the defaults; a present file is parsed strictly
/// (unknown keys rejected) and validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let raw = fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;
    let config: SiteConfig = toml::from_str(&raw).map_err(|e| ConfigError::Toml(path, e))?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command. Parses back to the defaults.
pub fn stock_config_toml() -> &'static str {
    r##"# Trombi Configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the root of the content directory, next to the
# pages/ and persons/ subdirectories. Unknown keys will cause an error.

# Directory copied verbatim into the output root. Photos referenced by
# person pages live under <static_dir>/photos/.
static_dir = "static"

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Used in <title> and the homepage header.
title = "Trombinoscope"

# Meta description for the homepage. Empty = omitted.
description = ""

# ---------------------------------------------------------------------------
# Homepage
# ---------------------------------------------------------------------------
[homepage]
# Seed for the homepage card shuffle. Builds with the same seed produce
# the same order; omit for a fresh shuffle on every build.
# shuffle_seed = 42

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Cards are resized to this width; height follows the aspect ratio.
width = 300

# JPEG encoding quality (1 = worst, 100 = best). PNG sources always use
# maximum compression instead.
quality = 90

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel thumbnail workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
