//! Error types for embedding, indexing, and retrieval.

/// Errors returned by embedding functions.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Upstream provider failed (network, auth, rate limit).
    #[error("embedding provider error: {0}")]
    Provider(String),
    /// Provider replied with an unusable payload.
    #[error("malformed embedding response: {0}")]
    Malformed(String),
}

/// Errors returned by similarity indexes.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Embedding length does not match the index.
    #[error("embedding dimension mismatch (expected={expected}, actual={actual})")]
    DimensionMismatch { expected: usize, actual: usize },
    /// Record id already present in the batch or index.
    #[error("duplicate record id: {0}")]
    DuplicateId(String),
    /// Entry carried an empty embedding.
    #[error("empty embedding for record: {0}")]
    EmptyEmbedding(String),
}

/// Errors returned by the retriever.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Embedding the query or corpus failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),
    /// Similarity index failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
    /// Requested result count is not positive.
    #[error("top_k must be at least 1 (got {0})")]
    InvalidTopK(usize),
    /// Query text is blank.
    #[error("query must not be empty")]
    EmptyQuery,
}
