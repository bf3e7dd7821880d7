use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

lazy_static! {
    static ref EMPTY_POSTINGS: HashMap<String, u32> = HashMap::new();
}

/// Inverted index: term -> (document id -> occurrence count).
///
/// The term set grows monotonically and counts accumulate across repeated
/// indexing of the same document; nothing is ever removed.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    terms: HashMap<String, HashMap<String, u32>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `term` in `doc_id`, creating entries as
    /// needed.
    pub fn add_occurrence(&mut self, term: &str, doc_id: &str) {
        *self
            .terms
            .entry(term.to_owned())
            .or_default()
            .entry(doc_id.to_owned())
            .or_insert(0) += 1;
    }

    /// Postings for `term`. An unseen term yields an empty map, never an
    /// error; the scorer detects zero-hit terms by the map being empty.
    pub fn postings(&self, term: &str) -> &HashMap<String, u32> {
        self.terms.get(term).unwrap_or(&EMPTY_POSTINGS)
    }

    /// Number of distinct documents with a nonzero posting for `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings(term).len()
    }

    /// Number of distinct terms seen so far.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}
