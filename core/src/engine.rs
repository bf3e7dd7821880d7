use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::persist;
use crate::store::DocumentStore;
use crate::tokenizer::tokenize;

pub const DEFAULT_K1: f32 = 1.5;
pub const DEFAULT_B: f32 = 0.75;

/// BM25 search engine holding the inverted index and the document store
/// behind a single handle, so indexing, scoring, and persistence always
/// see a consistent pair.
#[derive(Debug)]
pub struct SearchEngine {
    index: InvertedIndex,
    documents: DocumentStore,
    k1: f32,
    b: f32,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::with_params(DEFAULT_K1, DEFAULT_B)
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// `k1` controls term-frequency saturation, `b` the strength of
    /// document-length normalization. Fixed for the engine's lifetime.
    pub fn with_params(k1: f32, b: f32) -> Self {
        Self {
            index: InvertedIndex::new(),
            documents: DocumentStore::new(),
            k1,
            b,
        }
    }

    /// Store `content` under `id` and count its tokens into the index.
    ///
    /// Repeated calls for the same id overwrite the stored content but
    /// accumulate on top of the id's prior postings; frequencies are not
    /// reset. See `bulk_index` for batch ingestion.
    pub fn index(&mut self, id: &str, content: &str) {
        self.documents.put(id, content);
        for token in tokenize(content) {
            self.index.add_occurrence(&token, id);
        }
        tracing::debug!(id, "indexed document");
    }

    /// Index `documents` in order. No atomicity across the batch: entries
    /// indexed before a caller-side failure stay committed.
    pub fn bulk_index<I, S>(&mut self, documents: I)
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut count = 0usize;
        for (id, content) in documents {
            self.index(id.as_ref(), content.as_ref());
            count += 1;
        }
        tracing::info!(count, total = self.documents.len(), "bulk indexed");
    }

    /// Robertson-Spärck-Jones inverse document frequency:
    /// `ln((N - n + 0.5) / (n + 0.5) + 1)`. Decreases as the term gets
    /// more common; the raw formula value is returned unclamped.
    pub fn idf(&self, term: &str) -> Result<f32> {
        let n_docs = self.documents.len();
        if n_docs == 0 {
            return Err(Error::EmptyCorpus);
        }
        let df = self.index.document_frequency(term) as f32;
        Ok(((n_docs as f32 - df + 0.5) / (df + 0.5) + 1.0).ln())
    }

    /// Per-document BM25 contributions of a single term. Document length
    /// is the character count of the stored content, and the average
    /// length is recomputed from the store on every call.
    pub fn score_term(&self, term: &str) -> Result<HashMap<String, f32>> {
        let idf = self.idf(term)?;
        let avdl = self.documents.average_length()?;
        let mut scores = HashMap::new();
        for (doc_id, freq) in self.index.postings(term) {
            let freq = *freq as f32;
            let dl = self.documents.document_length(doc_id)? as f32;
            let numerator = freq * (self.k1 + 1.0);
            let denominator = freq + self.k1 * (1.0 - self.b + self.b * dl / avdl);
            scores.insert(doc_id.clone(), idf * numerator / denominator);
        }
        Ok(scores)
    }

    /// Rank documents against a free-text query.
    ///
    /// Query keywords come from the same tokenizer as indexing. A document
    /// matching several keywords gets the sum of their contributions.
    /// Results are sorted by score descending, ties broken by id ascending
    /// so a fixed input always ranks the same way. Fails with
    /// `EmptyCorpus` when nothing has been indexed; a query made solely of
    /// unknown terms returns an empty list.
    pub fn search(&self, query: &str) -> Result<Vec<(String, f32)>> {
        let mut merged: HashMap<String, f32> = HashMap::new();
        for keyword in tokenize(query) {
            for (doc_id, score) in self.score_term(&keyword)? {
                *merged.entry(doc_id).or_insert(0.0) += score;
            }
        }
        let mut ranked: Vec<(String, f32)> = merged.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        Ok(ranked)
    }

    pub fn document(&self, id: &str) -> Result<&str> {
        self.documents.get(id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.ids()
    }

    pub fn average_length(&self) -> Result<f32> {
        self.documents.average_length()
    }

    /// Raw postings for a term, mainly for embedding callers that want
    /// occurrence counts rather than scores.
    pub fn postings(&self, term: &str) -> &HashMap<String, u32> {
        self.index.postings(term)
    }

    /// Serialize the index/store pair to `writer`.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        persist::save(&self.index, &self.documents, writer)
    }

    /// Replace the engine's index and store with a previously saved pair.
    /// The current state is untouched if loading fails.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<()> {
        let (index, documents) = persist::load(reader)?;
        self.index = index;
        self.documents = documents;
        Ok(())
    }

    pub fn save_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist::save_path(&self.index, &self.documents, path)
    }

    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let (index, documents) = persist::load_path(path)?;
        self.index = index;
        self.documents = documents;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_corpus() -> SearchEngine {
        let mut engine = SearchEngine::new();
        engine.index("a", "the cat sat");
        engine.index("b", "the cat sat on the mat");
        engine.index("c", "dogs chase cats");
        engine
    }

    #[test]
    fn idf_on_empty_corpus_fails() {
        let engine = SearchEngine::new();
        assert!(matches!(engine.idf("cat"), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn idf_decreases_with_document_frequency() {
        let engine = build_corpus();
        // "cat" appears in two documents, "mat" in one
        let common = engine.idf("cat").unwrap();
        let rare = engine.idf("mat").unwrap();
        assert!(rare > common);
    }

    #[test]
    fn idf_of_unseen_term_is_finite() {
        let engine = build_corpus();
        let idf = engine.idf("zebra").unwrap();
        assert!(idf.is_finite() && idf > 0.0);
    }

    #[test]
    fn shorter_document_outranks_longer_at_equal_frequency() {
        let engine = build_corpus();
        let results = engine.search("cat").unwrap();
        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(results[0].1 >= results[1].1);
    }

    #[test]
    fn scores_sum_across_keywords() {
        let engine = build_corpus();
        let cat = engine.score_term("cat").unwrap();
        let mat = engine.score_term("mat").unwrap();
        let results = engine.search("cat mat").unwrap();
        let b_score = results
            .iter()
            .find(|(id, _)| id == "b")
            .map(|(_, s)| *s)
            .unwrap();
        assert!((b_score - (cat["b"] + mat["b"])).abs() < 1e-6);
    }

    #[test]
    fn results_sorted_descending() {
        let engine = build_corpus();
        let results = engine.search("cat mat dogs").unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn ties_break_by_id_ascending() {
        let mut engine = SearchEngine::new();
        engine.index("b", "cat");
        engine.index("a", "cat");
        let results = engine.search("cat").unwrap();
        assert_eq!(results[0].0, "a");
        assert_eq!(results[1].0, "b");
        assert_eq!(results[0].1, results[1].1);
    }

    #[test]
    fn unknown_terms_yield_empty_results_not_an_error() {
        let engine = build_corpus();
        let results = engine.search("zebra quagga").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn search_on_empty_corpus_fails() {
        let engine = SearchEngine::new();
        assert!(matches!(engine.search("cat"), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn reindexing_accumulates_frequencies() {
        let mut engine = SearchEngine::new();
        engine.index("a", "cat cat");
        assert_eq!(engine.postings("cat")["a"], 2);
        engine.index("a", "cat cat");
        // stored content is overwritten, postings keep accumulating
        assert_eq!(engine.postings("cat")["a"], 4);
        assert_eq!(engine.document_count(), 1);
    }

    #[test]
    fn reindexing_keeps_stale_postings_searchable() {
        let mut engine = SearchEngine::new();
        engine.index("a", "cat");
        engine.index("a", "dog");
        assert_eq!(engine.document("a").unwrap(), "dog");
        let results = engine.search("cat").unwrap();
        assert_eq!(results[0].0, "a");
    }

    #[test]
    fn empty_content_indexes_an_empty_token() {
        let mut engine = SearchEngine::new();
        engine.index("a", "");
        assert_eq!(engine.postings("")["a"], 1);
    }
}
