use aida_rs_conversations::{ConversationError, ConversationLog};
use aida_rs_protocol::{ChatExchange, SessionId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Log keeping exchanges in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingConversationLog {
    pub exchanges: Arc<Mutex<Vec<ChatExchange>>>,
}

impl RecordingConversationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationLog for RecordingConversationLog {
    async fn log_exchange(&self, exchange: &ChatExchange) -> Result<(), ConversationError> {
        self.exchanges.lock().push(exchange.clone());
        Ok(())
    }

    async fn history(&self, session_id: SessionId) -> Result<Vec<ChatExchange>, ConversationError> {
        Ok(self
            .exchanges
            .lock()
            .iter()
            .filter(|exchange| exchange.session_id == session_id)
            .cloned()
            .collect())
    }
}

/// Log failing every write and read.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingConversationLog;

#[async_trait]
impl ConversationLog for FailingConversationLog {
    async fn log_exchange(&self, _exchange: &ChatExchange) -> Result<(), ConversationError> {
        Err(ConversationError::Io(std::io::Error::other("log unavailable")))
    }

    async fn history(&self, _session_id: SessionId) -> Result<Vec<ChatExchange>, ConversationError> {
        Err(ConversationError::Io(std::io::Error::other("log unavailable")))
    }
}
