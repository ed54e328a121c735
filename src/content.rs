//! Markdown content parsing.
//!
//! Stage 1 of the trombi build pipeline. Each content file is a markdown
//! document with an optional YAML front-matter block:
//!
//! ```text
//! ---
//! titre: Lead Developer
//! mail: jean@example.org
//! technologies:
//!   - rust
//!   - postgres
//! ---
//!
//! Markdown body, rendered to HTML on the generated page...
//! ```
//!
//! Parsing splits the block from the body, reads the YAML into a
//! schema-agnostic mapping, renders the body to HTML, and derives the
//! entity slug from the filename.
//!
//! ## Slugs
//!
//! The slug is the file name minus its `.md` extension, slugified:
//! lowercased, diacritics transliterated to ASCII, non-alphanumeric runs
//! collapsed to single hyphens (`Héloïse Fournier.md` → `heloise-fournier`).
//! Slugs are NOT deduplicated — two files whose names differ only by case
//! or accents collide, and the later one overwrites the earlier at write
//! time. Renaming the source file is the fix.
//!
//! ## Rendering
//!
//! Markdown is rendered with tables and strikethrough enabled. Raw HTML in
//! the source passes through unescaped (content authors are trusted), and
//! bare `http://`/`https://`/`www.` URLs in plain text become hyperlinks.

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, html};
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Invalid front-matter in {0}: {1}")]
    FrontMatter(PathBuf, String),
    #[error("Markdown rendering failed for {0}: {1}")]
    MarkdownRender(PathBuf, String),
}

/// A parsed content file: front-matter fields plus rendered body.
#[derive(Debug, Clone)]
pub struct ContentEntity {
    /// URL-safe identifier derived from the filename.
    pub slug: String,
    /// Original file name, kept for error reporting and traceability.
    pub filename: String,
    /// Markdown body rendered to HTML.
    pub html_body: String,
    /// Every front-matter key, schema-agnostic. Consumers layer typed
    /// views on top (see `person::PersonFront`).
    pub fields: Mapping,
}

impl ContentEntity {
    /// String value of a front-matter field, if present and a string.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_str())
    }
}

/// Parse a single markdown file into a [`ContentEntity`].
///
/// Any failure (unreadable file, malformed YAML, renderer error) is fatal
/// and carries the file path.
pub fn parse_file(path: &Path) -> Result<ContentEntity, ContentError> {
    let raw =
        fs::read_to_string(path).map_err(|e| ContentError::Io(path.to_path_buf(), e))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (front, body) = split_front_matter(&raw);
    let fields = match front {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)
            .map_err(|e| ContentError::FrontMatter(path.to_path_buf(), e.to_string()))?,
        _ => Mapping::new(),
    };
    let html_body = render_markdown(body)
        .map_err(|e| ContentError::MarkdownRender(path.to_path_buf(), e.to_string()))?;

    Ok(ContentEntity {
        slug: slug_from_filename(&filename),
        filename,
        html_body,
        fields,
    })
}

/// Split an optional leading front-matter block from the body.
///
/// A block opens with a `---` line at the very start of the file and closes
/// at the next `---` line. Files without a block (or with an unterminated
/// one) are all body. CRLF line endings are tolerated.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let Some(first) = raw.split_inclusive('\n').next() else {
        return (None, raw);
    };
    if first.trim_end() != "---" {
        return (None, raw);
    }
    let after_open = &raw[first.len()..];
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body = &after_open[offset + line.len()..];
            return (Some(&after_open[..offset]), body);
        }
        offset += line.len();
    }
    (None, raw)
}

/// Derive the URL slug for a content file name.
pub fn slug_from_filename(filename: &str) -> String {
    let stem = filename.strip_suffix(".md").unwrap_or(filename);
    slug::slugify(stem)
}

/// Render a markdown body to HTML.
///
/// Raw HTML passes through (renderer default); tables and strikethrough are
/// enabled to match what content authors were writing against. The writer
/// only fails on formatter errors, which `parse_file` maps to
/// [`ContentError::MarkdownRender`].
pub fn render_markdown(markdown: &str) -> Result<String, std::fmt::Error> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let events = autolink(Parser::new_ext(markdown, options));
    let mut out = String::new();
    html::write_html_fmt(&mut out, events.into_iter())?;
    Ok(out)
}

/// Rewrite bare URLs in text events into links.
///
/// Text inside code blocks and existing links is left untouched; inline
/// code arrives as `Event::Code` and never enters the text arm.
fn autolink(parser: Parser<'_>) -> Vec<Event<'_>> {
    let mut events = Vec::new();
    let mut link_depth = 0usize;
    let mut code_depth = 0usize;
    for event in parser {
        match &event {
            Event::Start(Tag::Link { .. }) => link_depth += 1,
            Event::End(TagEnd::Link) => link_depth -= 1,
            Event::Start(Tag::CodeBlock(_)) => code_depth += 1,
            Event::End(TagEnd::CodeBlock) => code_depth -= 1,
            Event::Text(text) if link_depth == 0 && code_depth == 0 => {
                if let Some(mut linked) = linkify_text(text) {
                    events.append(&mut linked);
                    continue;
                }
            }
            _ => {}
        }
        events.push(event);
    }
    events
}

/// Split a text run around its bare URLs, or `None` when it has none.
fn linkify_text<'a>(text: &str) -> Option<Vec<Event<'a>>> {
    let (mut start, mut end, mut needs_scheme) = next_url(text)?;
    let mut events = Vec::new();
    let mut cursor = 0;
    loop {
        if start > cursor {
            events.push(Event::Text(CowStr::from(text[cursor..start].to_string())));
        }
        let raw = &text[start..end];
        let href = if needs_scheme {
            format!("http://{raw}")
        } else {
            raw.to_string()
        };
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(CowStr::from(raw.to_string())));
        events.push(Event::End(TagEnd::Link));
        cursor = end;
        match next_url(&text[cursor..]) {
            Some((s, e, n)) => (start, end, needs_scheme) = (cursor + s, cursor + e, n),
            None => break,
        }
    }
    if cursor < text.len() {
        events.push(Event::Text(CowStr::from(text[cursor..].to_string())));
    }
    Some(events)
}

/// Locate the next bare URL in `s`: byte range plus whether an `http://`
/// prefix must be added (`www.` form). Trailing sentence punctuation is
/// excluded from the match.
fn next_url(s: &str) -> Option<(usize, usize, bool)> {
    const PATTERNS: [&str; 3] = ["http://", "https://", "www."];
    let mut from = 0;
    while from < s.len() {
        let (start, pattern) = PATTERNS
            .iter()
            .filter_map(|p| s[from..].find(p).map(|i| (from + i, *p)))
            .min_by_key(|(i, _)| *i)?;
        // Word boundary: "awww.cool" is not a URL.
        let bounded = s[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let tail = &s[start..];
        let len = tail
            .find(|c: char| c.is_whitespace() || c == '<' || c == '>')
            .unwrap_or(tail.len());
        let url = tail[..len].trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '"', '\'']);
        if bounded && url.len() > pattern.len() {
            return Some((start, start + url.len(), pattern == "www."));
        }
        from = start + pattern.len();
    }
    None
}
