//! Configuration schema for AIDA.

use serde::{Deserialize, Serialize};

/// Root config for the AIDA service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AidaConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub conversations: ConversationsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AidaConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> AidaConfigBuilder {
        AidaConfigBuilder::new()
    }
}

/// Builder for assembling an `AidaConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct AidaConfigBuilder {
    config: AidaConfig,
}

impl AidaConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: AidaConfig::default(),
        }
    }

    /// Replace the retrieval configuration.
    pub fn retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.config.retrieval = retrieval;
        self
    }

    /// Replace the embedding configuration.
    pub fn embedding(mut self, embedding: EmbeddingConfig) -> Self {
        self.config.embedding = embedding;
        self
    }

    /// Replace the generation configuration.
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    /// Replace the similarity index configuration.
    pub fn index(mut self, index: IndexConfig) -> Self {
        self.config.index = index;
        self
    }

    /// Replace the conversation log configuration.
    pub fn conversations(mut self, conversations: ConversationsConfig) -> Self {
        self.config.conversations = conversations;
        self
    }

    /// Replace the HTTP server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Finalize and return the built `AidaConfig`.
    pub fn build(self) -> AidaConfig {
        self.config
    }
}

/// What to do when retrieval fails during a chat exchange.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalFailurePolicy {
    /// Fail the whole exchange.
    #[default]
    Abort,
    /// Continue with an empty context.
    Ungrounded,
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,
    #[serde(default)]
    pub on_failure: RetrievalFailurePolicy,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            on_failure: RetrievalFailurePolicy::default(),
        }
    }
}

fn default_top_k() -> usize {
    3
}

fn default_max_top_k() -> usize {
    20
}

/// Embedding provider selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    /// Local deterministic feature-hashing embedder.
    #[default]
    Hashing,
    /// OpenAI embeddings endpoint.
    OpenAI,
}

/// Embedding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProviderKind,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Vector width. When unset, [`EmbeddingConfig::resolved_dimensions`]
    /// picks the width the provider and model produce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: default_embedding_model(),
            dimensions: None,
        }
    }
}

impl EmbeddingConfig {
    /// Configured width, or the native width of the provider and model.
    pub fn resolved_dimensions(&self) -> usize {
        if let Some(dimensions) = self.dimensions {
            return dimensions;
        }
        match self.provider {
            EmbeddingProviderKind::Hashing => HASHING_DIMENSIONS,
            EmbeddingProviderKind::OpenAI => match self.model.as_str() {
                "text-embedding-3-large" => 3072,
                _ => 1536,
            },
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Width used by the hashing embedder when none is configured.
pub const HASHING_DIMENSIONS: usize = 384;

/// Generation backend selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationProviderKind {
    /// OpenAI chat completions.
    #[default]
    OpenAI,
    /// Offline backend answering from the supplied context.
    Extractive,
}

/// Generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub provider: GenerationProviderKind,
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Replaces the built-in system instruction when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: GenerationProviderKind::default(),
            model: default_generation_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: None,
        }
    }
}

fn default_generation_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.7
}

/// Similarity index persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexConfig {
    /// JSONL file backing the index; in-memory when unset.
    #[serde(default)]
    pub path: Option<String>,
}

/// Conversation log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for ConversationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// HTTP host settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}
