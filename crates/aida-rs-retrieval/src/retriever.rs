//! Retriever service: seeds the index and answers top-k queries.

use crate::embedding::EmbeddingFunction;
use crate::error::{EmbeddingError, IndexError, RetrievalError};
use crate::index::SimilarityIndex;
use crate::model::{IndexEntry, Record, SearchHit};
use log::{debug, info};
use std::sync::Arc;

/// Result count used when the caller does not ask for one.
pub const DEFAULT_TOP_K: usize = 3;

/// Embeds queries and ranks indexed records by cosine similarity.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<dyn SimilarityIndex>,
    embedder: Arc<dyn EmbeddingFunction>,
}

impl Retriever {
    /// Wrap an index without touching its contents.
    pub fn new(index: Arc<dyn SimilarityIndex>, embedder: Arc<dyn EmbeddingFunction>) -> Self {
        Self { index, embedder }
    }

    /// Build a retriever and seed the index with `records` if it is empty.
    pub async fn load(
        index: Arc<dyn SimilarityIndex>,
        embedder: Arc<dyn EmbeddingFunction>,
        records: Vec<Record>,
    ) -> Result<Self, RetrievalError> {
        let retriever = Self::new(index, embedder);
        retriever.populate(records).await?;
        Ok(retriever)
    }

    /// Embed and insert `records` unless the index already holds entries.
    ///
    /// Returns the number of inserted records.
    pub async fn populate(&self, records: Vec<Record>) -> Result<usize, RetrievalError> {
        if let Some(expected) = self.index.dimensions() {
            let actual = self.embedder.dimensions();
            if expected != actual {
                return Err(IndexError::DimensionMismatch { expected, actual }.into());
            }
            debug!(
                "skipping seed, index already populated (count={})",
                self.index.count()
            );
            return Ok(0);
        }
        if records.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = records.iter().map(|record| record.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != records.len() {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} embeddings, got {}",
                records.len(),
                embeddings.len()
            ))
            .into());
        }
        let entries = records
            .iter()
            .zip(embeddings)
            .map(|(record, embedding)| IndexEntry::new(record, embedding))
            .collect();
        let inserted = self.index.seed_if_empty(entries)?;
        info!(
            "populated retrieval index (model={}, inserted={inserted})",
            self.embedder.model_name()
        );
        Ok(inserted)
    }

    /// Return up to `top_k` records most similar to `query`.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        if top_k == 0 {
            return Err(RetrievalError::InvalidTopK(top_k));
        }
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyQuery);
        }
        if self.index.count() == 0 {
            return Ok(Vec::new());
        }
        let embedding = self.embedder.embed(query).await?;
        let hits = self.index.query(&embedding, top_k)?;
        debug!(
            "retrieved documents (top_k={top_k}, returned={}, best_score={:?})",
            hits.len(),
            hits.first().map(|hit| hit.score)
        );
        Ok(hits)
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.index.count()
    }

    pub fn is_empty(&self) -> bool {
        self.index.count() == 0
    }
}
