//! Knowledge-base embedding and nearest-neighbour retrieval for AIDA.

pub mod embedding;
pub mod error;
pub mod index;
pub mod model;
pub mod retriever;
pub mod seed;
pub mod similarity;

/// Embedding function interface and the local hashing embedder.
pub use embedding::{EmbeddingFunction, HashingEmbedder};
/// Error types.
pub use error::{EmbeddingError, IndexError, RetrievalError};
/// Similarity index interface and implementations.
pub use index::{FileIndex, InMemoryIndex, SimilarityIndex};
/// Retrieval data model.
pub use model::{IndexEntry, Record, RetrievedContext, SearchHit};
/// Retriever service.
pub use retriever::{DEFAULT_TOP_K, Retriever};
/// Built-in conference corpus.
pub use seed::conference_corpus;
