//! Similarity index abstraction and implementations.

mod file;
mod memory;

pub use file::FileIndex;
pub use memory::InMemoryIndex;

use crate::error::IndexError;
use crate::model::{IndexEntry, SearchHit};
use std::collections::HashSet;

/// Read-mostly store supporting nearest-neighbour lookup by cosine similarity.
///
/// The only write is [`SimilarityIndex::seed_if_empty`], which must publish a
/// whole batch at once: readers see either no entries or all of them.
pub trait SimilarityIndex: Send + Sync {
    /// Number of stored entries.
    fn count(&self) -> usize;

    /// Embedding length of stored entries, `None` while empty.
    fn dimensions(&self) -> Option<usize>;

    /// Insert `entries` only if the index is currently empty.
    ///
    /// Returns the number of inserted entries (0 when already populated).
    fn seed_if_empty(&self, entries: Vec<IndexEntry>) -> Result<usize, IndexError>;

    /// Return up to `top_k` entries ranked by similarity to `embedding`.
    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>, IndexError>;
}

/// Check a seed batch: unique ids, non-empty embeddings of one length.
pub(crate) fn validate_batch(entries: &[IndexEntry]) -> Result<(), IndexError> {
    let mut seen = HashSet::new();
    let mut dimensions = None;
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(IndexError::DuplicateId(entry.id.clone()));
        }
        let actual = entry.embedding.len();
        if actual == 0 {
            return Err(IndexError::EmptyEmbedding(entry.id.clone()));
        }
        let expected = *dimensions.get_or_insert(actual);
        if expected != actual {
            return Err(IndexError::DimensionMismatch { expected, actual });
        }
    }
    Ok(())
}

/// Shared query path over a snapshot of entries.
pub(crate) fn query_entries(
    entries: &[IndexEntry],
    embedding: &[f32],
    top_k: usize,
) -> Result<Vec<SearchHit>, IndexError> {
    let Some(first) = entries.first() else {
        return Ok(Vec::new());
    };
    let expected = first.embedding.len();
    if expected != embedding.len() {
        return Err(IndexError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(crate::similarity::rank(entries, embedding, top_k))
}
