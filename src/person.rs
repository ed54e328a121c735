//! Person enrichment.
//!
//! Stage 2 for the persons content set. Each parsed entity gains the
//! derived fields the generated site needs: a search-keyword list,
//! obfuscated contact fields, and a resolved photo/avatar URL pair.
//! Enrichment is a pure map — one entity in, one person out, input never
//! mutated, collection order preserved.
//!
//! ## Photo resolution
//!
//! Two modes, selected by the `gravatar` front-matter key:
//!
//! - **Local** (key absent, `false`, or an empty string): the `photo` key
//!   names a file under `static/photos/`; URLs point at `/photos/<file>`
//!   and `/thumbnails/<file>`. A missing `photo` is fatal.
//! - **Gravatar** (`true`, or an override address string): the avatar URL
//!   is derived from the MD5 hex digest of the lowercased, trimmed address
//!   (`true` reads the `mail` key). No resolvable address is fatal —
//!   a malformed gravatar URL must never reach the generated site.

use crate::content::ContentEntity;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use md5::{Digest, Md5};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Missing required field `{1}` in {0}")]
    MissingField(String, &'static str),
    #[error("Invalid front-matter fields in {0}: {1}")]
    InvalidFields(String, String),
}

/// The `gravatar` front-matter key accepts two forms: a boolean (`true`
/// derives the avatar from `mail`) or a string (an override address).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Gravatar {
    Enabled(bool),
    Address(String),
}

/// Typed view over person front-matter.
///
/// Field names are the ones content authors write (the content format
/// predates this tool and is French). Unknown keys collect into `extra`
/// and pass through untouched for themes that read them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonFront {
    pub titre: Option<String>,
    pub mail: Option<String>,
    pub telephone: Option<String>,
    pub photo: Option<String>,
    pub gravatar: Option<Gravatar>,
    pub domaines_metiers: Vec<String>,
    pub technologies: Vec<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// An enriched person: the parsed entity plus every derived field.
#[derive(Debug, Clone)]
pub struct Person {
    pub entity: ContentEntity,
    pub front: PersonFront,
    /// `domaines_metiers ++ technologies ++ [titre]`, order preserved,
    /// duplicates retained. Feeds the search index as-is.
    pub search_keywords: Vec<String>,
    /// Base64 of `mail`, empty when absent. Decoded client-side.
    pub encoded_mail: String,
    /// Base64 of `telephone`, empty when absent.
    pub encoded_phone: String,
    /// Full-size image: `/photos/<file>` or a gravatar URL.
    pub photo_url: String,
    /// Card-size image: `/thumbnails/<file>`, or the gravatar URL again
    /// (no local thumbnail exists in gravatar mode).
    pub thumbnail_url: String,
}

impl Person {
    pub fn slug(&self) -> &str {
        &self.entity.slug
    }

    /// Display name recovered from the slug (`jean-dupont` → `Jean Dupont`).
    pub fn display_name(&self) -> String {
        display_name(&self.entity.slug)
    }
}

/// Enrich one parsed entity into a [`Person`].
pub fn enrich(entity: &ContentEntity) -> Result<Person, EnrichError> {
    let front: PersonFront =
        serde_yaml::from_value(serde_yaml::Value::Mapping(entity.fields.clone()))
            .map_err(|e| EnrichError::InvalidFields(entity.filename.clone(), e.to_string()))?;

    let mut search_keywords = Vec::new();
    search_keywords.extend(front.domaines_metiers.iter().cloned());
    search_keywords.extend(front.technologies.iter().cloned());
    if let Some(titre) = front.titre.as_deref().filter(|t| !t.is_empty()) {
        search_keywords.push(titre.to_string());
    }

    let encoded_mail = front
        .mail
        .as_deref()
        .map(|m| BASE64.encode(m))
        .unwrap_or_default();
    let encoded_phone = front
        .telephone
        .as_deref()
        .map(|t| BASE64.encode(t))
        .unwrap_or_default();

    let (photo_url, thumbnail_url) = resolve_photo(&front, &entity.filename)?;

    Ok(Person {
        entity: entity.clone(),
        front,
        search_keywords,
        encoded_mail,
        encoded_phone,
        photo_url,
        thumbnail_url,
    })
}

/// Enrich a whole collection, preserving order. The first failure aborts.
pub fn enrich_all(entities: &[ContentEntity]) -> Result<Vec<Person>, EnrichError> {
    entities.iter().map(enrich).collect()
}

/// Recover a display name from a slug: `jean-dupont` → `Jean Dupont`.
pub fn display_name(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn resolve_photo(front: &PersonFront, filename: &str) -> Result<(String, String), EnrichError> {
    match gravatar_address(front) {
        Some(address) => {
            let address = address.trim().to_lowercase();
            if address.is_empty() {
                return Err(EnrichError::MissingField(filename.to_string(), "mail"));
            }
            let url = gravatar_url(&address);
            Ok((url.clone(), url))
        }
        None => {
            let photo = front
                .photo
                .as_deref()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| EnrichError::MissingField(filename.to_string(), "photo"))?;
            Ok((format!("/photos/{photo}"), format!("/thumbnails/{photo}")))
        }
    }
}

/// The address to hash, when gravatar mode is active. `false`, an empty
/// string, and an absent key all mean local-photo mode.
fn gravatar_address(front: &PersonFront) -> Option<&str> {
    match front.gravatar.as_ref()? {
        Gravatar::Enabled(true) => Some(front.mail.as_deref().unwrap_or("")),
        Gravatar::Enabled(false) => None,
        Gravatar::Address(address) if address.is_empty() => None,
        Gravatar::Address(address) => Some(address),
    }
}

/// Gravatar URL for an already-normalized address. The service's contract
/// is an MD5 hex digest of the lowercased, trimmed address.
fn gravatar_url(address: &str) -> String {
    let digest = Md5::digest(address.as_bytes());
    format!("https://www.gravatar.com/avatar/{digest:x}?s=500")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;

    fn entity_from_yaml(filename: &str, yaml: &str) -> ContentEntity {
        let fields: Mapping = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str(yaml).unwrap()
        };
        ContentEntity {
            slug: crate::content::slug_from_filename(filename),
            filename: filename.to_string(),
            html_body: String::new(),
            fields,
        }
    }

    fn enrich_yaml(yaml: &str) -> Result<Person, EnrichError> {
        enrich(&entity_from_yaml("alice.md", yaml))
    }

    // ==================== Search keywords ====================

    #[test]
    fn keywords_concatenate_domains_then_technologies_then_titre() {
        let person = enrich_yaml(
            "photo: a.jpg\n\
             domaines_metiers: [web, design]\n\
             technologies: [js]\n\
             titre: Dev\n",
        )
        .unwrap();
        assert_eq!(person.search_keywords, ["web", "design", "js", "Dev"]);
    }

    #[test]
    fn duplicate_keywords_are_retained() {
        let person = enrich_yaml(
            "photo: a.jpg\n\
             domaines_metiers: [web]\n\
             technologies: [web]\n",
        )
        .unwrap();
        assert_eq!(person.search_keywords, ["web", "web"]);
    }

    #[test]
    fn absent_titre_contributes_no_keyword() {
        let person = enrich_yaml("photo: a.jpg\ntechnologies: [go]\n").unwrap();
        assert_eq!(person.search_keywords, ["go"]);
    }

    // ==================== Contact encoding ====================

    #[test]
    fn contact_fields_are_base64_encoded() {
        let person = enrich_yaml(
            "photo: a.jpg\n\
             mail: alice@x.com\n\
             telephone: \"+33 6 12 34 56 78\"\n",
        )
        .unwrap();
        assert_eq!(person.encoded_mail, "YWxpY2VAeC5jb20=");
        assert_eq!(person.encoded_phone, "KzMzIDYgMTIgMzQgNTYgNzg=");
    }

    #[test]
    fn absent_contact_fields_encode_empty() {
        let person = enrich_yaml("photo: a.jpg\n").unwrap();
        assert_eq!(person.encoded_mail, "");
        assert_eq!(person.encoded_phone, "");
    }

    // ==================== Photo resolution ====================

    #[test]
    fn local_photo_builds_both_urls() {
        let person = enrich_yaml("photo: alice.jpg\n").unwrap();
        assert_eq!(person.photo_url, "/photos/alice.jpg");
        assert_eq!(person.thumbnail_url, "/thumbnails/alice.jpg");
    }

    #[test]
    fn local_mode_without_photo_is_fatal() {
        let err = enrich_yaml("mail: alice@x.com\n").unwrap_err();
        match err {
            EnrichError::MissingField(filename, field) => {
                assert_eq!(filename, "alice.md");
                assert_eq!(field, "photo");
            }
            other => panic!("Expected MissingField, got: {other}"),
        }
    }

    #[test]
    fn gravatar_true_hashes_the_normalized_mail() {
        // Digest input is lowercased and trimmed before hashing.
        let person = enrich_yaml("mail: \"Test@Example.com \"\ngravatar: true\n").unwrap();
        assert_eq!(
            person.photo_url,
            "https://www.gravatar.com/avatar/55502f40dc8b7c769880b10874abc9d0?s=500"
        );
        assert_eq!(person.thumbnail_url, person.photo_url);
    }

    #[test]
    fn gravatar_string_overrides_mail() {
        let person = enrich_yaml("mail: other@x.com\ngravatar: test@example.com\n").unwrap();
        assert_eq!(
            person.photo_url,
            "https://www.gravatar.com/avatar/55502f40dc8b7c769880b10874abc9d0?s=500"
        );
    }

    #[test]
    fn gravatar_without_mail_is_fatal() {
        let err = enrich_yaml("gravatar: true\n").unwrap_err();
        match err {
            EnrichError::MissingField(_, field) => assert_eq!(field, "mail"),
            other => panic!("Expected MissingField, got: {other}"),
        }
    }

    #[test]
    fn gravatar_false_means_local_mode() {
        let person = enrich_yaml("photo: a.jpg\ngravatar: false\nmail: a@x.com\n").unwrap();
        assert_eq!(person.photo_url, "/photos/a.jpg");
    }

    #[test]
    fn gravatar_empty_string_means_local_mode() {
        let person = enrich_yaml("photo: a.jpg\ngravatar: \"\"\n").unwrap();
        assert_eq!(person.photo_url, "/photos/a.jpg");
    }

    // ==================== Typed fields ====================

    #[test]
    fn unknown_keys_pass_through_in_extra() {
        let person = enrich_yaml("photo: a.jpg\ntwitter: \"@alice\"\n").unwrap();
        assert_eq!(
            person.front.extra.get("twitter").and_then(|v| v.as_str()),
            Some("@alice")
        );
    }

    #[test]
    fn malformed_typed_field_is_fatal() {
        let err = enrich_yaml("photo: a.jpg\ndomaines_metiers: not-a-list\n").unwrap_err();
        match err {
            EnrichError::InvalidFields(filename, _) => assert_eq!(filename, "alice.md"),
            other => panic!("Expected InvalidFields, got: {other}"),
        }
    }

    // ==================== Collections ====================

    #[test]
    fn enrich_all_preserves_collection_order() {
        let entities = vec![
            entity_from_yaml("bob.md", "photo: b.jpg\n"),
            entity_from_yaml("alice.md", "photo: a.jpg\n"),
        ];
        let persons = enrich_all(&entities).unwrap();
        let slugs: Vec<&str> = persons.iter().map(Person::slug).collect();
        assert_eq!(slugs, ["bob", "alice"]);
    }

    #[test]
    fn display_name_capitalizes_slug_parts() {
        assert_eq!(display_name("jean-dupont"), "Jean Dupont");
        assert_eq!(display_name("alice"), "Alice");
    }
}
