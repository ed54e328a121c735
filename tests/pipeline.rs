//! End-to-end build over a synthesized content tree.
//!
//! Drives the public pipeline exactly the way the CLI does — collect →
//! enrich → index → generate → thumbnails — then asserts on the files a
//! site visitor actually gets.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trombi::collect::collect_dir;
use trombi::config::SiteConfig;
use trombi::generate::{self, GenerateStats, Site};
use trombi::person::enrich_all;
use trombi::process::{self, ProcessStats};
use trombi::search::{SearchIndexEntry, build_index};

const ALICE: &str = "---\n\
titre: Dev\n\
domaines_metiers: [web]\n\
technologies: [js]\n\
photo: alice.jpg\n\
mail: alice@x.com\n\
---\n\
Alice builds things. See https://alice.example for more.\n";

const BOB: &str = "---\n\
titre: SRE\n\
domaines_metiers: [ops]\n\
technologies: [go]\n\
gravatar: true\n\
mail: bob@x.com\n\
---\n";

const ABOUT: &str = "---\n\
titre: Qui sommes-nous\n\
---\n\
# Qui sommes-nous\n\
\n\
Une petite équipe.\n";

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path).unwrap();
}

/// Lay out a realistic project: two persons (one local photo, one
/// gravatar), one page, a draft, a stray non-markdown file, one photo.
fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(&root.join("content/persons/alice.md"), ALICE);
    write(&root.join("content/persons/bob.md"), BOB);
    write(&root.join("content/persons/_draft.md"), "---\ntitre: X\n---\n");
    write(&root.join("content/persons/notes.txt"), "not content");
    write(&root.join("content/pages/qui-sommes-nous.md"), ABOUT);
    write_test_jpeg(&root.join("static/photos/alice.jpg"), 600, 400);
    tmp
}

/// Run the pipeline with a pinned shuffle seed, mirroring `trombi build`.
fn run_build(root: &Path) -> (GenerateStats, ProcessStats) {
    let mut config = SiteConfig::default();
    config.homepage.shuffle_seed = Some(42);

    let pages = collect_dir(&root.join("content/pages")).unwrap();
    let persons = enrich_all(&collect_dir(&root.join("content/persons")).unwrap()).unwrap();
    let index = build_index(&persons);
    let site = Site {
        pages,
        persons,
        index,
    };

    let out = root.join("_site");
    let stats = generate::generate(&root.join("static"), &out, &config, &site).unwrap();
    let thumbnails = process::process(&out, &config, None).unwrap();
    (stats, thumbnails)
}

#[test]
fn full_build_produces_a_browsable_site() {
    let tmp = setup_project();
    let root = tmp.path();
    let (stats, thumbnails) = run_build(root);

    assert_eq!(
        stats,
        GenerateStats {
            pages: 1,
            persons: 2,
            index_entries: 2
        }
    );
    assert_eq!(thumbnails.created, 1);

    let out = root.join("_site");

    // Homepage: both cards present, drafts absent.
    let index_html = fs::read_to_string(out.join("index.html")).unwrap();
    assert!(index_html.contains(r#"href="/person/alice.html""#));
    assert!(index_html.contains(r#"href="/person/bob.html""#));
    assert!(!index_html.contains("draft"));

    // Alice uses the local thumbnail; Bob's card points straight at gravatar.
    assert!(index_html.contains(r#"src="/thumbnails/alice.jpg""#));
    assert!(index_html.contains(
        "https://www.gravatar.com/avatar/5cb6a827a3eaf66640c2cbe61a94454b?s=500"
    ));

    // Person page: obfuscated mail, bare URL in the bio autolinked.
    let alice_html = fs::read_to_string(out.join("person/alice.html")).unwrap();
    assert!(alice_html.contains(r#"data-mail="YWxpY2VAeC5jb20=""#));
    assert!(
        alice_html.contains(r#"<a href="https://alice.example">https://alice.example</a>"#)
    );

    // Content page rendered from markdown.
    let about_html = fs::read_to_string(out.join("pages/qui-sommes-nous.html")).unwrap();
    assert!(about_html.contains("<h1>Qui sommes-nous</h1>"));
    assert!(about_html.contains("Une petite équipe."));

    // Thumbnail written at the configured width, aspect preserved.
    assert_eq!(
        image::image_dimensions(out.join("thumbnails/alice.jpg")).unwrap(),
        (300, 200)
    );
}

#[test]
fn search_index_lists_persons_in_collection_order() {
    let tmp = setup_project();
    let root = tmp.path();
    run_build(root);

    let json = fs::read_to_string(root.join("_site/api/search-index.json")).unwrap();
    let entries: Vec<SearchIndexEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        entries,
        vec![
            SearchIndexEntry {
                id: "alice".to_string(),
                keywords: vec!["web".to_string(), "js".to_string(), "Dev".to_string()],
            },
            SearchIndexEntry {
                id: "bob".to_string(),
                keywords: vec!["ops".to_string(), "go".to_string(), "SRE".to_string()],
            },
        ]
    );
}

#[test]
fn rebuilds_with_the_same_seed_are_identical() {
    let tmp = setup_project();
    let root = tmp.path();

    run_build(root);
    let first_index = fs::read_to_string(root.join("_site/index.html")).unwrap();
    let first_json = fs::read_to_string(root.join("_site/api/search-index.json")).unwrap();

    run_build(root);
    let second_index = fs::read_to_string(root.join("_site/index.html")).unwrap();
    let second_json = fs::read_to_string(root.join("_site/api/search-index.json")).unwrap();

    assert_eq!(first_index, second_index);
    assert_eq!(first_json, second_json);
}

#[test]
fn malformed_front_matter_fails_the_collection() {
    let tmp = TempDir::new().unwrap();
    let persons = tmp.path().join("content/persons");
    write(&persons.join("broken.md"), "---\ntitre: [unclosed\n---\nbio\n");

    let err = collect_dir(&persons).unwrap_err();
    assert!(err.to_string().contains("broken.md"), "got: {err}");
}

#[test]
fn person_without_photo_or_gravatar_fails_enrichment() {
    let tmp = TempDir::new().unwrap();
    let persons = tmp.path().join("content/persons");
    write(&persons.join("carl.md"), "---\nmail: c@x.com\n---\n");

    let entities = collect_dir(&persons).unwrap();
    let err = enrich_all(&entities).unwrap_err();
    assert!(err.to_string().contains("photo"), "got: {err}");
    assert!(err.to_string().contains("carl.md"), "got: {err}");
}
