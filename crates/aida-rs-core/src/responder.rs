//! Grounded answer generation with a fixed fallback.

use crate::generation::{CONTEXT_MARKER, GenerationBackend, GenerationRequest, QUESTION_MARKER};
use aida_rs_config::GenerationConfig;
use aida_rs_retrieval::RetrievedContext;
use log::{debug, warn};
use std::sync::Arc;

/// Answer returned whenever generation fails.
pub const FALLBACK_ANSWER: &str = "I apologize, but I'm having trouble processing your request right now. Please try again later.";

/// System instruction sent with every generation call.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are AIDA, a friendly and helpful conference assistant.";

const PROMPT_PREAMBLE: &str = "You are AIDA, a helpful AI assistant for the Vant4ge Tech Conference.
Use the following context to answer the user's question. If the context doesn't contain
relevant information, provide a helpful general response about being a conference assistant.";

/// Result of a generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Backend produced an answer.
    Answer(String),
    /// Backend failed; the user sees [`FALLBACK_ANSWER`].
    Fallback { reason: String },
}

impl GenerationOutcome {
    /// User-visible text.
    pub fn text(&self) -> &str {
        match self {
            Self::Answer(text) => text,
            Self::Fallback { .. } => FALLBACK_ANSWER,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Answer(text) => text,
            Self::Fallback { .. } => FALLBACK_ANSWER.to_string(),
        }
    }
}

/// Build the user prompt embedding `context` and the raw `query`.
pub fn build_user_prompt(query: &str, context: &RetrievedContext) -> String {
    let context_block = context.documents.join("\n");
    format!("{PROMPT_PREAMBLE}\n\n\n{CONTEXT_MARKER}{context_block}{QUESTION_MARKER}{query}\n\nResponse:")
}

/// Turns a query plus retrieved context into an answer.
#[derive(Clone)]
pub struct Responder {
    backend: Arc<dyn GenerationBackend>,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl Responder {
    /// Responder with default prompt and sampling settings.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self::from_config(backend, &GenerationConfig::default())
    }

    pub fn from_config(backend: Arc<dyn GenerationBackend>, config: &GenerationConfig) -> Self {
        Self {
            backend,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Request sent to the backend for `query`.
    pub fn build_request(&self, query: &str, context: &RetrievedContext) -> GenerationRequest {
        GenerationRequest {
            system_prompt: self.system_prompt.clone(),
            user_prompt: build_user_prompt(query, context),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Generate an answer. Never fails: errors become [`GenerationOutcome::Fallback`].
    pub async fn generate(&self, query: &str, context: &RetrievedContext) -> GenerationOutcome {
        let request = self.build_request(query, context);
        match self.backend.generate(&request).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!(
                        "generation returned empty text, using fallback (backend={})",
                        self.backend.name()
                    );
                    return GenerationOutcome::Fallback {
                        reason: "empty response".to_string(),
                    };
                }
                debug!(
                    "generated answer (backend={}, context_docs={}, answer_len={})",
                    self.backend.name(),
                    context.len(),
                    text.len()
                );
                GenerationOutcome::Answer(text.to_string())
            }
            Err(err) => {
                warn!(
                    "generation failed, using fallback (backend={}, error={err})",
                    self.backend.name()
                );
                GenerationOutcome::Fallback {
                    reason: err.to_string(),
                }
            }
        }
    }
}
