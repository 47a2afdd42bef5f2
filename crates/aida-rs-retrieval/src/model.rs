//! Knowledge records and retrieval results.

use aida_rs_protocol::Metadata;
use serde::{Deserialize, Serialize};

/// Immutable knowledge-base record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Stable record identifier.
    pub id: String,
    /// Record text.
    pub content: String,
    /// Tags such as `type` and `topic`.
    pub metadata: Metadata,
}

impl Record {
    /// Build a record tagged with a `type` and a `topic`.
    pub fn tagged(
        id: impl Into<String>,
        content: impl Into<String>,
        kind: &str,
        topic: &str,
    ) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("type".to_string(), kind.to_string());
        metadata.insert("topic".to_string(), topic.to_string());
        Self {
            id: id.into(),
            content: content.into(),
            metadata,
        }
    }
}

/// Record plus its embedding, as stored in a similarity index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    pub fn new(record: &Record, embedding: Vec<f32>) -> Self {
        Self {
            id: record.id.clone(),
            content: record.content.clone(),
            metadata: record.metadata.clone(),
            embedding,
        }
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub content: String,
    pub metadata: Metadata,
    /// Cosine similarity to the query.
    pub score: f32,
}

/// Retrieved documents and their sources, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedContext {
    pub documents: Vec<String>,
    pub sources: Vec<Metadata>,
}

impl RetrievedContext {
    /// Context with no documents.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

impl From<Vec<SearchHit>> for RetrievedContext {
    fn from(hits: Vec<SearchHit>) -> Self {
        let mut context = Self {
            documents: Vec::with_capacity(hits.len()),
            sources: Vec::with_capacity(hits.len()),
        };
        for hit in hits {
            context.documents.push(hit.content);
            context.sources.push(hit.metadata);
        }
        context
    }
}
