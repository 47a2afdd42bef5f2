//! Conversation logging for AIDA chat exchanges.

pub mod error;
pub mod store;

/// Conversation log error type.
pub use error::ConversationError;
/// Conversation log interface and implementations.
pub use store::{ConversationLog, FileConversationLog, NoopConversationLog};
