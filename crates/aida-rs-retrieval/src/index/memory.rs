//! Process-local similarity index.

use super::{SimilarityIndex, query_entries, validate_batch};
use crate::error::IndexError;
use crate::model::{IndexEntry, SearchHit};
use log::{debug, info};
use parking_lot::RwLock;

/// In-memory index; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    entries: RwLock<Vec<IndexEntry>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SimilarityIndex for InMemoryIndex {
    fn count(&self) -> usize {
        self.entries.read().len()
    }

    fn dimensions(&self) -> Option<usize> {
        self.entries
            .read()
            .first()
            .map(|entry| entry.embedding.len())
    }

    fn seed_if_empty(&self, entries: Vec<IndexEntry>) -> Result<usize, IndexError> {
        validate_batch(&entries)?;
        let mut guard = self.entries.write();
        if !guard.is_empty() {
            debug!("index already populated (count={})", guard.len());
            return Ok(0);
        }
        let inserted = entries.len();
        *guard = entries;
        info!("seeded in-memory index (count={inserted})");
        Ok(inserted)
    }

    fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchHit>, IndexError> {
        let guard = self.entries.read();
        query_entries(&guard, embedding, top_k)
    }
}
