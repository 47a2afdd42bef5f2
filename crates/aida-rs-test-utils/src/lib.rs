//! Test helpers shared across AIDA crates.

pub mod conversations;
pub mod embedding;
pub mod generation;
pub mod llm;

pub use conversations::{FailingConversationLog, RecordingConversationLog};
pub use embedding::{FailingEmbedder, FixedEmbedder};
pub use generation::{EchoBackend, FailingBackend, FixedBackend, RecordingBackend};
pub use llm::{ScriptedLLM, ScriptedReply};
