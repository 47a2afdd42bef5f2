//! Wire protocol types for the AIDA chat API and shared data records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a chat session.
pub type SessionId = Uuid;

/// String-to-string metadata attached to knowledge records.
pub type Metadata = BTreeMap<String, String>;

/// Chat request submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// User message to answer.
    pub message: String,
    /// Session the exchange belongs to.
    pub session_id: SessionId,
    /// Optional override for the number of retrieved snippets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
}

/// Chat response returned to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatResponse {
    /// Generated answer text.
    pub response: String,
    /// Metadata of the snippets used for grounding, in retrieval order.
    #[serde(default)]
    pub sources: Vec<Metadata>,
}

/// Health probe payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    /// Healthy status value.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Error body returned by the HTTP host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable error description.
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// One completed user/assistant exchange as written to the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatExchange {
    /// Exchange identifier.
    pub id: Uuid,
    /// Session identifier.
    pub session_id: SessionId,
    /// Message sent by the user.
    pub user_message: String,
    /// Answer returned to the user.
    pub ai_response: String,
    /// Whether the answer is the fixed fallback text.
    #[serde(default)]
    pub fallback: bool,
    /// Sources used to ground the answer.
    #[serde(default)]
    pub sources: Vec<Metadata>,
    /// Time the exchange completed.
    pub timestamp: DateTime<Utc>,
}

impl ChatExchange {
    /// Build a new exchange stamped with the current time.
    pub fn new(
        session_id: SessionId,
        user_message: impl Into<String>,
        ai_response: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            user_message: user_message.into(),
            ai_response: ai_response.into(),
            fallback: false,
            sources: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Attach the grounding sources.
    pub fn with_sources(mut self, sources: Vec<Metadata>) -> Self {
        self.sources = sources;
        self
    }

    /// Mark whether the answer is a fallback.
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }
}
