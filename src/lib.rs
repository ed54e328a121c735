//! # Trombi
//!
//! A minimal static site generator for team directories (trombinoscopes).
//! Markdown files with YAML front-matter are the data source: one file per
//! collaborator becomes a card on the homepage and a profile page, plain
//! pages hold the editorial content, and a JSON index feeds client-side
//! search.
//!
//! # Architecture: One-Pass Pipeline
//!
//! A build runs five stages in order, each a function from plain values to
//! plain values:
//!
//! ```text
//! 1. Collect   content/pages/, content/persons/  →  entities        (parse + sort)
//! 2. Enrich    person entities                   →  persons         (keywords, contact, avatar)
//! 3. Index     persons                           →  search index    (wire-format JSON)
//! 4. Generate  pages + persons + index           →  _site/          (HTML + assets + api/)
//! 5. Process   _site/photos/                     →  _site/thumbnails/  (parallel resize)
//! ```
//!
//! Only the edges touch the filesystem: collection reads, generation and
//! processing write. The middle stages are pure, so unit tests exercise
//! enrichment and indexing without a single temp file.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collect`] | Lists a content directory, filters drafts, sorts by filename |
//! | [`config`] | `config.toml` loading, defaults, validation |
//! | [`content`] | Markdown + YAML front-matter parsing, slugs, bare-URL autolinking |
//! | [`generate`] | Renders the HTML site from pages, persons, and the index using Maud |
//! | [`imaging`] | Pure-Rust image operations behind the [`imaging::ImageBackend`] trait |
//! | [`output`] | CLI output formatting — check inventory, progress lines, build summary |
//! | [`person`] | Person enrichment: search keywords, contact encoding, photo/gravatar URLs |
//! | [`process`] | Parallel thumbnail generation over the copied photos |
//! | [`search`] | Search index construction and its JSON wire form |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system, rather than Handlebars or Tera. Advantages:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions — no stringly-typed lookups.
//! - **XSS-safe by default**: interpolation is auto-escaped. The deliberate
//!   exceptions are rendered markdown bodies (authored content, inserted
//!   verbatim) and the embedded compile-time CSS/JS; every runtime value
//!   stays escaped.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## Pure-Rust Imaging (No ImageMagick)
//!
//! The [`imaging`] module uses the `image` crate (Lanczos3 resampling) for
//! thumbnails. No system dependencies: no `apt install`, no Homebrew, no
//! version conflicts. The binary is fully self-contained — download it and
//! point it at a content directory.
//!
//! ## Seedable Homepage Shuffle
//!
//! The homepage deals the person cards in random order so the same faces do
//! not permanently lead the grid. That shuffle is the only randomness in a
//! build, and `homepage.shuffle_seed` (or `--seed`) pins it, making a build
//! bit-for-bit reproducible when that matters — CI diffs, caching proxies,
//! tests.
//!
//! ## Obfuscated Contact Data
//!
//! Mail addresses and phone numbers never appear in the HTML source. They
//! are base64-encoded into `data-` attributes and decoded on click by a few
//! lines of embedded JavaScript — enough to keep addresses out of the hands
//! of scrapers that grep raw pages, without a server round-trip.
//!
//! # Plain Output
//!
//! The generated site is plain HTML, one inlined stylesheet, two short
//! vanilla scripts, and a single JSON file under `api/`. Drop `_site/` on
//! any static file server — no Node, no PHP, no database.

pub mod collect;
pub mod config;
pub mod content;
pub mod generate;
pub mod imaging;
pub mod output;
pub mod person;
pub mod process;
pub mod search;

#[cfg(test)]
pub(crate) mod test_helpers;
