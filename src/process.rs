//! Thumbnail batch processing.
//!
//! Plans one thumbnail per photo in the output photos directory and runs
//! the batch on the rayon pool. Every task runs to completion before the
//! stage returns; per-file failures are collected and reported together
//! at the end, so one broken photo never hides the state of the rest.
//!
//! The backend is injected ([`ImageBackend`]) so orchestration tests can
//! record operations without touching pixels.

use crate::config::SiteConfig;
use crate::imaging::{ImageBackend, Quality, RustBackend, ThumbnailParams, is_supported_source};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error at {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Thumbnail generation failed for {failed} of {total} photos:\n{details}")]
    Thumbnails {
        failed: usize,
        total: usize,
        details: String,
    },
}

/// One planned thumbnail: a source photo and its derived output path.
/// The output keeps the source's file name (and therefore its format).
#[derive(Debug, Clone)]
pub struct ThumbnailPlan {
    pub source: PathBuf,
    pub output: PathBuf,
    pub filename: String,
}

/// Progress events streamed to the CLI printer thread during processing.
/// `index` is the plan position (1-based); events arrive in completion
/// order, not plan order.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    ThumbnailCreated {
        index: usize,
        total: usize,
        filename: String,
    },
    ThumbnailFailed {
        index: usize,
        total: usize,
        filename: String,
        message: String,
    },
}

/// Summary of a completed thumbnail stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessStats {
    pub created: usize,
}

/// Plan one thumbnail per supported photo under `photos_dir`, sorted by
/// filename. A missing photos directory yields an empty plan — a site
/// whose persons all use gravatar has no local photos at all.
pub fn plan_thumbnails(
    photos_dir: &Path,
    thumbnails_dir: &Path,
) -> Result<Vec<ThumbnailPlan>, ProcessError> {
    if !photos_dir.exists() {
        return Ok(Vec::new());
    }
    let entries =
        fs::read_dir(photos_dir).map_err(|e| ProcessError::Io(photos_dir.to_path_buf(), e))?;

    let mut plans: Vec<ThumbnailPlan> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_source(path))
        .filter_map(|path| {
            let filename = path.file_name()?.to_str()?.to_string();
            Some(ThumbnailPlan {
                output: thumbnails_dir.join(&filename),
                source: path,
                filename,
            })
        })
        .collect();
    plans.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(plans)
}

/// Run the thumbnail stage against the production backend.
pub fn process(
    output_root: &Path,
    config: &SiteConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessStats, ProcessError> {
    process_with_backend(&RustBackend::new(), output_root, config, events)
}

/// Process thumbnails using a specific backend (allows testing with mock).
pub fn process_with_backend(
    backend: &impl ImageBackend,
    output_root: &Path,
    config: &SiteConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<ProcessStats, ProcessError> {
    let photos_dir = output_root.join("photos");
    let thumbnails_dir = output_root.join("thumbnails");

    let plans = plan_thumbnails(&photos_dir, &thumbnails_dir)?;
    if plans.is_empty() {
        return Ok(ProcessStats::default());
    }
    fs::create_dir_all(&thumbnails_dir)
        .map_err(|e| ProcessError::Io(thumbnails_dir.clone(), e))?;

    let total = plans.len();
    let width = config.thumbnails.width;
    let quality = Quality::new(config.thumbnails.quality);

    // Collected, never raced: the whole batch runs even when files fail.
    let failures: Vec<String> = plans
        .par_iter()
        .enumerate()
        .filter_map(|(i, plan)| {
            let params = ThumbnailParams {
                source: plan.source.clone(),
                output: plan.output.clone(),
                width,
                quality,
            };
            match backend.thumbnail(&params) {
                Ok(()) => {
                    if let Some(tx) = &events {
                        let _ = tx.send(ProcessEvent::ThumbnailCreated {
                            index: i + 1,
                            total,
                            filename: plan.filename.clone(),
                        });
                    }
                    None
                }
                Err(e) => {
                    if let Some(tx) = &events {
                        let _ = tx.send(ProcessEvent::ThumbnailFailed {
                            index: i + 1,
                            total,
                            filename: plan.filename.clone(),
                            message: e.to_string(),
                        });
                    }
                    Some(format!("{}: {e}", plan.filename))
                }
            }
        })
        .collect();

    if !failures.is_empty() {
        return Err(ProcessError::Thumbnails {
            failed: failures.len(),
            total,
            details: failures.join("\n"),
        });
    }
    Ok(ProcessStats { created: total })
}
