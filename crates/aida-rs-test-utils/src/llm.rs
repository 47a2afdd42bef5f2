//! Scripted `autoagents-llm` provider for the OpenAI adapter tests.

use async_trait::async_trait;
use autoagents_llm::LLMProvider;
use autoagents_llm::ToolCall;
use autoagents_llm::chat::{ChatMessage, ChatProvider, ChatResponse, StructuredOutputFormat, Tool};
use autoagents_llm::completion::{CompletionProvider, CompletionRequest, CompletionResponse};
use autoagents_llm::embedding::EmbeddingProvider;
use autoagents_llm::error::LLMError;
use autoagents_llm::models::ModelsProvider;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Chat reply carrying optional text and no tool calls.
#[derive(Debug, Clone)]
pub struct ScriptedReply(Option<String>);

impl fmt::Display for ScriptedReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or_default())
    }
}

impl ChatResponse for ScriptedReply {
    fn text(&self) -> Option<String> {
        self.0.clone()
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        None
    }
}

/// Provider with a fixed chat outcome and a fixed embedding.
///
/// Every chat call and every embedded input is recorded.
#[derive(Debug, Clone)]
pub struct ScriptedLLM {
    chat: Result<Option<String>, String>,
    embedding: Result<Vec<f32>, String>,
    pub chats: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    pub embedded: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLLM {
    fn scripted(chat: Result<Option<String>, String>, embedding: Result<Vec<f32>, String>) -> Self {
        Self {
            chat,
            embedding,
            chats: Arc::new(Mutex::new(Vec::new())),
            embedded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::scripted(Ok(Some(text.into())), Ok(vec![0.0, 0.0]))
    }

    /// Chat succeeds but carries no text.
    pub fn silent() -> Self {
        Self::scripted(Ok(None), Ok(vec![0.0, 0.0]))
    }

    /// Every call fails with `LLMError::ProviderError(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::scripted(Err(message.clone()), Err(message))
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Ok(embedding);
        self
    }

    pub fn last_chat(&self) -> Vec<ChatMessage> {
        self.chats.lock().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for ScriptedLLM {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        self.chats.lock().push(messages.to_vec());
        match &self.chat {
            Ok(text) => Ok(Box::new(ScriptedReply(text.clone()))),
            Err(message) => Err(LLMError::ProviderError(message.clone())),
        }
    }
}

#[async_trait]
impl CompletionProvider for ScriptedLLM {
    async fn complete(
        &self,
        _req: &CompletionRequest,
        _json_schema: Option<StructuredOutputFormat>,
    ) -> Result<CompletionResponse, LLMError> {
        match &self.chat {
            Ok(text) => Ok(CompletionResponse {
                text: text.clone().unwrap_or_default(),
            }),
            Err(message) => Err(LLMError::ProviderError(message.clone())),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedLLM {
    async fn embed(&self, input: Vec<String>) -> Result<Vec<Vec<f32>>, LLMError> {
        let vector = self
            .embedding
            .clone()
            .map_err(LLMError::ProviderError)?;
        let count = input.len();
        self.embedded.lock().extend(input);
        Ok(vec![vector; count])
    }
}

#[async_trait]
impl ModelsProvider for ScriptedLLM {}

impl LLMProvider for ScriptedLLM {}
