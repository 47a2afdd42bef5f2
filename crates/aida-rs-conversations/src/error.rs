//! Error types for conversation logging.

/// Errors returned by conversation logs.
#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Log root exists but is not a directory.
    #[error("invalid conversation root: {0}")]
    InvalidRoot(String),
}
