//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (person, page) is its semantic identity — display name
//! and positional index — with filesystem paths shown as secondary context
//! via indented `Source:` lines. This makes `check` readable as a content
//! inventory while still letting users trace data back to specific files.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Persons
//!     001 Jean Dupont (Lead developer)
//!         Source: jean-dupont.md
//!         Photo: /photos/jean.jpg (missing)
//!         Keywords: web, php, Lead developer
//!     002 Alice Martin (Dev)
//!         Source: alice-martin.md
//!         Photo: https://www.gravatar.com/avatar/…?s=500
//!
//! Pages
//!     001 Qui sommes-nous
//!         Source: qui-sommes-nous.md
//!
//! 2 persons, 1 pages (1 photo missing)
//! ```
//!
//! ## Process
//!
//! ```text
//! [001/012] alice.jpg
//! [002/012] broken.png FAILED: decode failed: unsupported feature
//! ```
//!
//! ## Build summary
//!
//! ```text
//! Generated 1 pages, 12 person pages, 12 index entries
//! Created 12 thumbnails
//! Site written to _site
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function for testability and a `print_*`
//! wrapper that writes to stdout. Format functions are pure — no I/O beyond
//! the photo existence probe, no side effects.

use crate::content::ContentEntity;
use crate::generate::GenerateStats;
use crate::person::Person;
use crate::process::{ProcessEvent, ProcessStats};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format a person header: positional index + display name, with the titre
/// in parens when present.
///
/// ```text
/// 001 Jean Dupont (Lead developer)
/// 002 Alice Martin
/// ```
fn person_header(index: usize, person: &Person) -> String {
    match person.front.titre.as_deref() {
        Some(titre) if !titre.is_empty() => {
            format!("{} {} ({})", format_index(index), person.display_name(), titre)
        }
        _ => format!("{} {}", format_index(index), person.display_name()),
    }
}

/// True when the person references a local photo that is not on disk.
/// Gravatar URLs are remote and never checked. Also used by `check` to
/// decide its exit status.
pub fn local_photo_missing(person: &Person, photos_dir: &Path) -> bool {
    match person.photo_url.strip_prefix("/photos/") {
        Some(file) => !photos_dir.join(file).is_file(),
        None => false,
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the `check` inventory: every person and page with its source
/// file, plus referenced photos that are missing from `photos_dir`.
pub fn format_check_output(
    persons: &[Person],
    pages: &[ContentEntity],
    photos_dir: &Path,
) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Persons".to_string());
    for (i, person) in persons.iter().enumerate() {
        lines.push(format!("    {}", person_header(i + 1, person)));
        lines.push(format!("        Source: {}", person.entity.filename));
        if local_photo_missing(person, photos_dir) {
            lines.push(format!("        Photo: {} (missing)", person.photo_url));
        } else {
            lines.push(format!("        Photo: {}", person.photo_url));
        }
        if !person.search_keywords.is_empty() {
            lines.push(format!(
                "        Keywords: {}",
                person.search_keywords.join(", ")
            ));
        }
    }

    if !pages.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        for (i, page) in pages.iter().enumerate() {
            let title = page.field_str("titre").unwrap_or(&page.slug);
            lines.push(format!("    {} {}", format_index(i + 1), title));
            lines.push(format!("        Source: {}", page.filename));
        }
    }

    let missing = persons
        .iter()
        .filter(|p| local_photo_missing(p, photos_dir))
        .count();
    let mut trailer = format!("{} persons, {} pages", persons.len(), pages.len());
    match missing {
        0 => {}
        1 => trailer.push_str(" (1 photo missing)"),
        n => trailer.push_str(&format!(" ({} photos missing)", n)),
    }
    lines.push(String::new());
    lines.push(trailer);

    lines
}

/// Print check output to stdout.
pub fn print_check_output(persons: &[Person], pages: &[ContentEntity], photos_dir: &Path) {
    for line in format_check_output(persons, pages, photos_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Process output
// ============================================================================

/// Format a single thumbnail progress event.
///
/// Events arrive in completion order, so the bracketed counter counts
/// finished work, not plan position.
pub fn format_process_event(event: &ProcessEvent) -> String {
    match event {
        ProcessEvent::ThumbnailCreated {
            index,
            total,
            filename,
        } => {
            format!("[{:0>3}/{:0>3}] {}", index, total, filename)
        }
        ProcessEvent::ThumbnailFailed {
            index,
            total,
            filename,
            message,
        } => {
            format!("[{:0>3}/{:0>3}] {} FAILED: {}", index, total, filename, message)
        }
    }
}

/// Print a process event to stdout.
pub fn print_process_event(event: &ProcessEvent) {
    println!("{}", format_process_event(event));
}

// ============================================================================
// Build summary
// ============================================================================

/// Format the end-of-build summary.
pub fn format_build_summary(
    generated: &GenerateStats,
    thumbnails: &ProcessStats,
    output_dir: &Path,
) -> Vec<String> {
    vec![
        format!(
            "Generated {} pages, {} person pages, {} index entries",
            generated.pages, generated.persons, generated.index_entries
        ),
        format!("Created {} thumbnails", thumbnails.created),
        format!("Site written to {}", output_dir.display()),
    ]
}

/// Print the build summary to stdout.
pub fn print_build_summary(
    generated: &GenerateStats,
    thumbnails: &ProcessStats,
    output_dir: &Path,
) {
    for line in format_build_summary(generated, thumbnails, output_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
