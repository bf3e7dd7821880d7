use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the search core. Never coerced to default scores;
/// callers decide whether to retry I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// Document identifier absent from the store.
    #[error("document not found: {0}")]
    NotFound(String),

    /// An operation needing average length or idf ran with zero documents.
    #[error("no documents indexed")]
    EmptyCorpus,

    /// Persisted stream does not match the expected layout.
    #[error("corrupt index data: {0}")]
    CorruptData(String),

    #[error("index i/o: {0}")]
    Io(#[from] std::io::Error),
}
