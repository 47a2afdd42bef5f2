//! Error types for the core assistant crate.

use aida_rs_conversations::ConversationError;
use aida_rs_retrieval::RetrievalError;
use thiserror::Error;

/// Errors returned by assistant operations.
#[derive(Debug, Error)]
pub enum AidaCoreError {
    /// Context retrieval failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),
    /// Request failed validation.
    #[error("invalid request: {0}")]
    Invalid(String),
    /// Conversation log could not be opened.
    #[error("conversation log error: {0}")]
    Conversation(#[from] ConversationError),
    /// Provider construction or wiring failed.
    #[error("provider error: {0}")]
    Provider(String),
}

impl AidaCoreError {
    /// Whether the error was caused by caller input rather than the service.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Invalid(_)
                | Self::Retrieval(RetrievalError::InvalidTopK(_) | RetrievalError::EmptyQuery)
        )
    }
}
