use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Raw document contents keyed by identifier. Identifiers are opaque
/// strings (typically URLs); iteration order is unspecified.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct DocumentStore {
    docs: HashMap<String, String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the content stored under `id`.
    pub fn put(&mut self, id: impl Into<String>, content: impl Into<String>) {
        self.docs.insert(id.into(), content.into());
    }

    pub fn get(&self, id: &str) -> Result<&str> {
        self.docs
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| Error::NotFound(id.to_owned()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.docs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Character count of the content stored under `id`. Lengths are
    /// counted in characters, not tokens.
    pub fn document_length(&self, id: &str) -> Result<usize> {
        Ok(self.get(id)?.chars().count())
    }

    /// Mean character count across all stored documents. Recomputed from
    /// current contents on every call, never cached.
    pub fn average_length(&self) -> Result<f32> {
        if self.docs.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let total: usize = self.docs.values().map(|d| d.chars().count()).sum();
        Ok(total as f32 / self.docs.len() as f32)
    }
}
