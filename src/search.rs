//! Search index construction.
//!
//! The one stable wire contract of the generated site: a JSON array of
//! `{id, keywords}` records consumed by the embedded client-side search
//! script. Entry order is collection order; keywords keep their authored
//! case and duplicates (the client lowercases at query time).

use crate::person::Person;
use serde::{Deserialize, Serialize};

/// One person's search record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexEntry {
    pub id: String,
    pub keywords: Vec<String>,
}

/// Project enriched persons to index entries, order preserved. No dedup,
/// no filtering, no sorting — the index mirrors the collection exactly.
pub fn build_index(persons: &[Person]) -> Vec<SearchIndexEntry> {
    persons
        .iter()
        .map(|person| SearchIndexEntry {
            id: person.slug().to_string(),
            keywords: person.search_keywords.clone(),
        })
        .collect()
}

/// Serialize the index in its wire form: a compact JSON array.
pub fn to_json(index: &[SearchIndexEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(index)
}
