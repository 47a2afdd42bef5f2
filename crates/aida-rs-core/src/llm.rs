//! Adapters from `autoagents-llm` providers to AIDA collaborator traits.

use crate::error::AidaCoreError;
use crate::generation::{GenerationBackend, GenerationError, GenerationRequest};
use aida_rs_retrieval::{EmbeddingError, EmbeddingFunction};
use async_trait::async_trait;
use autoagents_llm::LLMProvider;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use autoagents_llm::chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType};
use autoagents_llm::embedding::EmbeddingProvider;
use log::{debug, info};
use std::sync::Arc;

/// Build an OpenAI provider.
///
/// Sampling settings are bound here; the chat API used by the adapters
/// does not take them per call.
pub fn build_openai_provider(
    api_key: impl Into<String>,
    model: impl Into<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
) -> Result<Arc<dyn LLMProvider>, AidaCoreError> {
    let model = model.into();
    info!("building OpenAI provider (model={model})");
    let mut builder = LLMBuilder::<OpenAI>::new().api_key(api_key).model(model);
    if let Some(max_tokens) = max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(temperature) = temperature {
        builder = builder.temperature(temperature);
    }
    let provider: Arc<dyn LLMProvider> = builder
        .build()
        .map_err(|err| AidaCoreError::Provider(err.to_string()))?;
    Ok(provider)
}

/// Generation backend backed by a chat provider.
#[derive(Clone)]
pub struct LlmGenerationBackend {
    provider: Arc<dyn LLMProvider>,
    name: String,
}

impl LlmGenerationBackend {
    pub fn new(provider: Arc<dyn LLMProvider>, name: impl Into<String>) -> Self {
        Self {
            provider,
            name: name.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for LlmGenerationBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let messages = vec![
            ChatMessage {
                role: ChatRole::System,
                message_type: MessageType::Text,
                content: request.system_prompt.clone(),
            },
            ChatMessage {
                role: ChatRole::User,
                message_type: MessageType::Text,
                content: request.user_prompt.clone(),
            },
        ];
        let response = self
            .provider
            .chat_with_tools(&messages, None, None)
            .await
            .map_err(|err| GenerationError::Provider(err.to_string()))?;
        let text = response.text().ok_or(GenerationError::EmptyResponse)?;
        debug!(
            "chat completion received (backend={}, text_len={})",
            self.name,
            text.len()
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Embedding function backed by an embedding provider.
#[derive(Clone)]
pub struct LlmEmbeddingFunction {
    provider: Arc<dyn LLMProvider>,
    model: String,
    dimensions: usize,
}

impl LlmEmbeddingFunction {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            dimensions,
        }
    }

    fn check(&self, embedding: &[f32]) -> Result<(), EmbeddingError> {
        if embedding.len() != self.dimensions {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingFunction for LlmEmbeddingFunction {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::Malformed("no embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let embeddings = self
            .provider
            .embed(texts.to_vec())
            .await
            .map_err(|err| EmbeddingError::Provider(err.to_string()))?;
        if embeddings.len() != texts.len() {
            return Err(EmbeddingError::Malformed(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        for embedding in &embeddings {
            self.check(embedding)?;
        }
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
