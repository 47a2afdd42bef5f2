use aida_rs_retrieval::{EmbeddingError, EmbeddingFunction};
use async_trait::async_trait;

/// Embedder returning the same vector for every text.
#[derive(Debug, Clone)]
pub struct FixedEmbedder {
    embedding: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(embedding: Vec<f32>) -> Self {
        Self { embedding }
    }
}

#[async_trait]
impl EmbeddingFunction for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.embedding.clone())
    }

    fn model_name(&self) -> &str {
        "fixed"
    }

    fn dimensions(&self) -> usize {
        self.embedding.len()
    }
}

/// Embedder failing every call with a provider error.
#[derive(Debug, Clone)]
pub struct FailingEmbedder {
    message: String,
    dimensions: usize,
}

impl FailingEmbedder {
    pub fn new(message: impl Into<String>, dimensions: usize) -> Self {
        Self {
            message: message.into(),
            dimensions,
        }
    }
}

#[async_trait]
impl EmbeddingFunction for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Provider(self.message.clone()))
    }

    fn model_name(&self) -> &str {
        "failing"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
