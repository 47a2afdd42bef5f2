//! Core retrieval-augmented answering for AIDA.
//!
//! This crate owns the responder, the generation backend seam, the
//! `autoagents-llm` adapters, and the assistant service used by the server.

pub mod assistant;
pub mod bootstrap;
pub mod error;
pub mod generation;
pub mod llm;
pub mod responder;

pub use assistant::{Assistant, ChatReply};
pub use bootstrap::{DEFAULT_CONVERSATIONS_DIR, ProviderSettings, build_assistant};
pub use error::AidaCoreError;
/// Generation backend interface and the offline backend.
pub use generation::{ExtractiveBackend, GenerationBackend, GenerationError, GenerationRequest};
pub use llm::{LlmEmbeddingFunction, LlmGenerationBackend, build_openai_provider};
pub use responder::{DEFAULT_SYSTEM_PROMPT, FALLBACK_ANSWER, GenerationOutcome, Responder};
