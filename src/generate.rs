//! HTML site generation.
//!
//! The final stage of the build pipeline. Takes the collected pages, the
//! enriched persons, and the search index, and writes the complete static
//! site.
//!
//! ## Generated Output
//!
//! - **Homepage** (`/index.html`): shuffled person cards plus a search box
//! - **Content pages** (`/pages/<slug>.html`): rendered markdown
//! - **Person pages** (`/person/<slug>.html`): photo, contact links, bio
//! - **Search index** (`/api/search-index.json`): consumed by the embedded
//!   search script
//!
//! ## Output Structure
//!
//! ```text
//! _site/
//! ├── index.html
//! ├── api/
//! │   └── search-index.json
//! ├── pages/
//! │   └── qui-sommes-nous.html
//! ├── person/
//! │   ├── jean-dupont.html
//! │   └── ...
//! ├── photos/                    # copied from the static directory
//! └── thumbnails/                # written later by the thumbnail stage
//! ```
//!
//! The output directory is deleted and recreated on every run. The static
//! directory is copied in before any page is written, so person photos are
//! already in place when the thumbnail stage scans `photos/`.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time and inlined into every page:
//! - `static/style.css`: base styles
//! - `static/search.js`: homepage card filtering (reads the search index)
//! - `static/contact.js`: decodes the obfuscated contact links
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating
//! with automatic XSS escaping. Escaping is bypassed in exactly two places:
//! rendered markdown bodies (authored, trusted content) and the embedded
//! compile-time assets above. Every other interpolation stays escaped.

use crate::config::{SiteConfig, SiteSection};
use crate::content::ContentEntity;
use crate::person::Person;
use crate::search::{self, SearchIndexEntry};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error writing {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the generator consumes, assembled by the build pipeline.
#[derive(Debug)]
pub struct Site {
    pub pages: Vec<ContentEntity>,
    pub persons: Vec<Person>,
    pub index: Vec<SearchIndexEntry>,
}

/// Counts of what was written, for the build summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateStats {
    pub pages: usize,
    pub persons: usize,
    pub index_entries: usize,
}

const CSS: &str = include_str!("../static/style.css");
const SEARCH_JS: &str = include_str!("../static/search.js");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// Write the complete site under `output_dir`.
///
/// The previous output is removed first, then the static directory is
/// copied in, then every page is rendered. Nothing here prints; the
/// returned [`GenerateStats`] feeds the CLI summary.
pub fn generate(
    static_dir: &Path,
    output_dir: &Path,
    config: &SiteConfig,
    site: &Site,
) -> Result<GenerateStats, GenerateError> {
    clean_output(output_dir)?;
    copy_static(static_dir, output_dir)?;

    let cards = shuffled(&site.persons, config.homepage.shuffle_seed);
    let index_html = render_index(&cards, config);
    write_file(&output_dir.join("index.html"), &index_html.into_string())?;

    for page in &site.pages {
        let path = output_dir.join("pages").join(format!("{}.html", page.slug));
        write_file(&path, &render_page(page, config).into_string())?;
    }

    for person in &site.persons {
        let path = output_dir
            .join("person")
            .join(format!("{}.html", person.slug()));
        write_file(&path, &render_person(person, config).into_string())?;
    }

    let index_json = search::to_json(&site.index)?;
    write_file(&output_dir.join("api").join("search-index.json"), &index_json)?;

    Ok(GenerateStats {
        pages: site.pages.len(),
        persons: site.persons.len(),
        index_entries: site.index.len(),
    })
}

/// Delete and recreate the output directory.
fn clean_output(output_dir: &Path) -> Result<(), GenerateError> {
    if output_dir.exists() {
        fs::remove_dir_all(output_dir)
            .map_err(|e| GenerateError::Io(output_dir.to_path_buf(), e))?;
    }
    fs::create_dir_all(output_dir).map_err(|e| GenerateError::Io(output_dir.to_path_buf(), e))
}

/// Copy the static directory into the output root, preserving structure.
/// A missing static directory is fine (a site can be all gravatars).
fn copy_static(static_dir: &Path, output_dir: &Path) -> Result<(), GenerateError> {
    if !static_dir.is_dir() {
        return Ok(());
    }
    for entry in WalkDir::new(static_dir).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(static_dir).to_path_buf();
            GenerateError::Io(path, e.into())
        })?;
        // Entries always live under the walk root.
        let Ok(rel) = entry.path().strip_prefix(static_dir) else {
            continue;
        };
        let dest = output_dir.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| GenerateError::Io(dest.clone(), e))?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| GenerateError::Io(parent.to_path_buf(), e))?;
            }
            fs::copy(entry.path(), &dest).map_err(|e| GenerateError::Io(dest.clone(), e))?;
        }
    }
    Ok(())
}

/// Write a file, creating parent directories first.
fn write_file(path: &Path, contents: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GenerateError::Io(parent.to_path_buf(), e))?;
    }
    fs::write(path, contents).map_err(|e| GenerateError::Io(path.to_path_buf(), e))
}

/// Shuffled card order for the homepage. A seed pins the order; without
/// one, every build deals a fresh hand.
fn shuffled<'a>(persons: &'a [Person], seed: Option<u64>) -> Vec<&'a Person> {
    let mut cards: Vec<&Person> = persons.iter().collect();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    cards.shuffle(&mut rng);
    cards
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, description: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="fr" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if !description.is_empty() {
                    meta name="description" content=(description);
                }
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with the title linking home
fn site_header(site: &SiteSection) -> Markup {
    html! {
        header.site-header {
            a.site-title href="/" { (site.title) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the homepage: person card grid plus the search box
fn render_index(cards: &[&Person], config: &SiteConfig) -> Markup {
    let content = html! {
        (site_header(&config.site))
        main.index-page {
            @if !config.site.description.is_empty() {
                p.site-description { (config.site.description) }
            }
            input #search type="search" placeholder="Rechercher par domaine, techno, titre…" autocomplete="off";
            div.person-grid {
                @for person in cards {
                    a.person-card data-id=(person.slug()) href={ "/person/" (person.slug()) ".html" } {
                        img src=(person.thumbnail_url) alt=(person.display_name()) loading="lazy";
                        span.person-name { (person.display_name()) }
                        @if let Some(titre) = &person.front.titre {
                            span.person-title { (titre) }
                        }
                    }
                }
            }
        }
        script { (PreEscaped(SEARCH_JS)) }
    };
    base_document(&config.site.title, &config.site.description, content)
}

/// Renders a content page from its markdown body
fn render_page(entity: &ContentEntity, config: &SiteConfig) -> Markup {
    let title = entity.field_str("titre").unwrap_or(&entity.slug);
    let content = html! {
        (site_header(&config.site))
        main.content-page {
            article {
                (PreEscaped(&entity.html_body))
            }
        }
    };
    base_document(title, "", content)
}

/// Renders a person page: photo, identity, keywords, contact links, bio
fn render_person(person: &Person, config: &SiteConfig) -> Markup {
    let name = person.display_name();
    let content = html! {
        (site_header(&config.site))
        main.person-page {
            header.person-header {
                img.person-photo src=(person.photo_url) alt=(name);
                h1 { (name) }
                @if let Some(titre) = &person.front.titre {
                    p.person-title { (titre) }
                }
            }
            @if !person.search_keywords.is_empty() {
                ul.keyword-list {
                    @for keyword in &person.search_keywords {
                        li { (keyword) }
                    }
                }
            }
            div.contact-links {
                @if !person.encoded_mail.is_empty() {
                    a.contact-mail href="#" data-mail=(person.encoded_mail) { "Mail" }
                }
                @if !person.encoded_phone.is_empty() {
                    a.contact-phone href="#" data-phone=(person.encoded_phone) { "Téléphone" }
                }
            }
            article.person-bio {
                (PreEscaped(&person.entity.html_body))
            }
        }
        script { (PreEscaped(CONTACT_JS)) }
    };
    base_document(&name, "", content)
}

// ============================================================================
// Tests
// ============================================================================
