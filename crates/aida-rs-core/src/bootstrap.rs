//! Assemble an [`Assistant`] from configuration.

use crate::assistant::Assistant;
use crate::error::AidaCoreError;
use crate::generation::{ExtractiveBackend, GenerationBackend};
use crate::llm::{LlmEmbeddingFunction, LlmGenerationBackend, build_openai_provider};
use crate::responder::Responder;
use aida_rs_config::{
    AidaConfig, EmbeddingConfig, EmbeddingProviderKind, GenerationProviderKind,
};
use aida_rs_conversations::{ConversationLog, FileConversationLog, NoopConversationLog};
use aida_rs_retrieval::{
    EmbeddingFunction, FileIndex, HashingEmbedder, InMemoryIndex, RetrievalError, Retriever,
    SimilarityIndex, conference_corpus,
};
use autoagents_llm::LLMProvider;
use log::info;
use std::sync::Arc;

/// Default directory for conversation logs.
pub const DEFAULT_CONVERSATIONS_DIR: &str = ".aida/conversations";

/// Provider credentials and switches that do not live in config files.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// OpenAI API key.
    pub api_key: Option<String>,
    /// Force local providers regardless of config.
    pub offline: bool,
}

impl ProviderSettings {
    /// Read `OPENAI_API_KEY` from the environment.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            offline: false,
        }
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    fn require_key(&self, purpose: &str) -> Result<String, AidaCoreError> {
        self.api_key
            .clone()
            .ok_or_else(|| AidaCoreError::Provider(format!("OPENAI_API_KEY is required for {purpose}")))
    }
}

/// Build every collaborator named by `config` and seed the index.
pub async fn build_assistant(
    config: &AidaConfig,
    settings: &ProviderSettings,
) -> Result<Assistant, AidaCoreError> {
    let embedder = build_embedder(config, settings)?;
    let backend = build_backend(config, settings)?;

    let index: Arc<dyn SimilarityIndex> = match config.index.path.as_deref() {
        Some(path) => Arc::new(FileIndex::open(path).map_err(RetrievalError::from)?),
        None => Arc::new(InMemoryIndex::new()),
    };
    let retriever = Retriever::load(index, embedder, conference_corpus()).await?;

    let conversations: Arc<dyn ConversationLog> = if config.conversations.enabled {
        let root = config
            .conversations
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_CONVERSATIONS_DIR.to_string());
        Arc::new(FileConversationLog::new(root)?)
    } else {
        Arc::new(NoopConversationLog)
    };

    info!(
        "assistant ready (records={}, backend={}, conversations_enabled={})",
        retriever.len(),
        backend.name(),
        config.conversations.enabled
    );
    let responder = Responder::from_config(backend, &config.generation);
    Ok(Assistant::new(retriever, responder, conversations).with_retrieval_config(&config.retrieval))
}

fn build_embedder(
    config: &AidaConfig,
    settings: &ProviderSettings,
) -> Result<Arc<dyn EmbeddingFunction>, AidaCoreError> {
    let embedding = &config.embedding;
    if settings.offline || embedding.provider == EmbeddingProviderKind::Hashing {
        return Ok(Arc::new(HashingEmbedder::new(
            embedding.resolved_dimensions(),
        )));
    }
    let provider = build_openai_provider(
        settings.require_key("openai embeddings")?,
        embedding.model.clone(),
        None,
        None,
    )?;
    Ok(Arc::new(openai_embedder(embedding, provider)))
}

fn openai_embedder(
    embedding: &EmbeddingConfig,
    provider: Arc<dyn LLMProvider>,
) -> LlmEmbeddingFunction {
    let dimensions = embedding.resolved_dimensions();
    info!(
        "using openai embeddings (model={}, dimensions={dimensions})",
        embedding.model
    );
    LlmEmbeddingFunction::new(provider, embedding.model.clone(), dimensions)
}

fn build_backend(
    config: &AidaConfig,
    settings: &ProviderSettings,
) -> Result<Arc<dyn GenerationBackend>, AidaCoreError> {
    let generation = &config.generation;
    if settings.offline || generation.provider == GenerationProviderKind::Extractive {
        return Ok(Arc::new(ExtractiveBackend));
    }
    let provider = build_openai_provider(
        settings.require_key("openai generation")?,
        generation.model.clone(),
        Some(generation.max_tokens),
        Some(generation.temperature),
    )?;
    Ok(Arc::new(LlmGenerationBackend::new(provider, "openai")))
}
