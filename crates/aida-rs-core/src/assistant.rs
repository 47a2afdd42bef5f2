//! Assistant service composing retrieval, generation, and conversation logging.

use crate::error::AidaCoreError;
use crate::responder::{GenerationOutcome, Responder};
use aida_rs_config::{RetrievalConfig, RetrievalFailurePolicy};
use aida_rs_conversations::ConversationLog;
use aida_rs_protocol::{ChatExchange, ChatResponse, Metadata, SessionId};
use aida_rs_retrieval::{DEFAULT_TOP_K, RetrievedContext, Retriever};
use log::{debug, info, warn};
use std::sync::Arc;

/// Outcome of one chat exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    /// Answer text shown to the user.
    pub response: String,
    /// Metadata of the grounding snippets, in retrieval order.
    pub sources: Vec<Metadata>,
    /// Whether `response` is the fallback answer.
    pub fallback: bool,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            response: reply.response,
            sources: reply.sources,
        }
    }
}

/// Request-scoped entry point shared by the host.
///
/// Stateless between requests apart from its collaborators, so one instance
/// is shared behind an `Arc`.
#[derive(Clone)]
pub struct Assistant {
    retriever: Retriever,
    responder: Responder,
    conversations: Arc<dyn ConversationLog>,
    default_top_k: usize,
    max_top_k: usize,
    on_failure: RetrievalFailurePolicy,
}

impl Assistant {
    pub fn new(
        retriever: Retriever,
        responder: Responder,
        conversations: Arc<dyn ConversationLog>,
    ) -> Self {
        let defaults = RetrievalConfig::default();
        Self {
            retriever,
            responder,
            conversations,
            default_top_k: DEFAULT_TOP_K,
            max_top_k: defaults.max_top_k,
            on_failure: defaults.on_failure,
        }
    }

    /// Apply retrieval limits and the failure policy from config.
    pub fn with_retrieval_config(mut self, config: &RetrievalConfig) -> Self {
        self.default_top_k = config.top_k;
        self.max_top_k = config.max_top_k;
        self.on_failure = config.on_failure;
        self
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Validate a caller-supplied `top_k`, falling back to the configured default.
    pub fn resolve_top_k(&self, requested: Option<i64>) -> Result<usize, AidaCoreError> {
        let Some(requested) = requested else {
            return Ok(self.default_top_k);
        };
        if requested <= 0 {
            return Err(AidaCoreError::Invalid(format!(
                "top_k must be a positive integer (got {requested})"
            )));
        }
        let top_k = usize::try_from(requested).unwrap_or(usize::MAX);
        if top_k > self.max_top_k {
            return Err(AidaCoreError::Invalid(format!(
                "top_k must not exceed {} (got {requested})",
                self.max_top_k
            )));
        }
        Ok(top_k)
    }

    /// Retrieve the `top_k` snippets most similar to `query`.
    pub async fn retrieve_context(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<RetrievedContext, AidaCoreError> {
        let hits = self.retriever.search(query, top_k).await?;
        Ok(RetrievedContext::from(hits))
    }

    /// Generate an answer for `query` grounded in `context`.
    pub async fn generate_response(
        &self,
        query: &str,
        context: &RetrievedContext,
    ) -> GenerationOutcome {
        self.responder.generate(query, context).await
    }

    /// Run one exchange: retrieve, generate, log.
    pub async fn chat(
        &self,
        session_id: SessionId,
        message: &str,
        top_k: Option<i64>,
    ) -> Result<ChatReply, AidaCoreError> {
        if message.trim().is_empty() {
            return Err(AidaCoreError::Invalid("message must not be empty".to_string()));
        }
        let top_k = self.resolve_top_k(top_k)?;
        info!(
            "chat request (session_id={session_id}, message_len={}, top_k={top_k})",
            message.len()
        );

        let context = match self.retrieve_context(message, top_k).await {
            Ok(context) => context,
            Err(err)
                if self.on_failure == RetrievalFailurePolicy::Ungrounded
                    && !err.is_validation() =>
            {
                warn!("retrieval failed, answering without context (session_id={session_id}, error={err})");
                RetrievedContext::empty()
            }
            Err(err) => return Err(err),
        };

        let outcome = self.generate_response(message, &context).await;
        let fallback = outcome.is_fallback();
        let reply = ChatReply {
            response: outcome.into_text(),
            sources: context.sources,
            fallback,
        };

        let exchange = ChatExchange::new(session_id, message, reply.response.clone())
            .with_sources(reply.sources.clone())
            .with_fallback(fallback);
        if let Err(err) = self.conversations.log_exchange(&exchange).await {
            warn!("failed to log exchange (session_id={session_id}, error={err})");
        }
        debug!(
            "chat completed (session_id={session_id}, sources={}, fallback={fallback})",
            reply.sources.len()
        );
        Ok(reply)
    }

    /// Logged exchanges for a session, oldest first.
    pub async fn history(&self, session_id: SessionId) -> Vec<ChatExchange> {
        match self.conversations.history(session_id).await {
            Ok(history) => history,
            Err(err) => {
                warn!("failed to read history (session_id={session_id}, error={err})");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Assistant;
    use crate::error::AidaCoreError;
    use crate::generation::ExtractiveBackend;
    use crate::responder::Responder;
    use aida_rs_config::{RetrievalConfig, RetrievalFailurePolicy};
    use aida_rs_conversations::NoopConversationLog;
    use aida_rs_retrieval::{HashingEmbedder, InMemoryIndex, Retriever, conference_corpus};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    async fn assistant() -> Assistant {
        let retriever = Retriever::load(
            Arc::new(InMemoryIndex::new()),
            Arc::new(HashingEmbedder::default()),
            conference_corpus(),
        )
        .await
        .expect("load");
        Assistant::new(
            retriever,
            Responder::new(Arc::new(ExtractiveBackend)),
            Arc::new(NoopConversationLog),
        )
    }

    #[tokio::test]
    async fn resolve_top_k_defaults_and_validates() {
        let assistant = assistant().await;
        assert_eq!(assistant.resolve_top_k(None).expect("default"), 3);
        assert_eq!(assistant.resolve_top_k(Some(5)).expect("explicit"), 5);
        assert!(matches!(
            assistant.resolve_top_k(Some(0)),
            Err(AidaCoreError::Invalid(_))
        ));
        assert!(matches!(
            assistant.resolve_top_k(Some(-2)),
            Err(AidaCoreError::Invalid(_))
        ));
        assert!(matches!(
            assistant.resolve_top_k(Some(21)),
            Err(AidaCoreError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn retrieval_config_changes_default_top_k() {
        let assistant = assistant().await.with_retrieval_config(&RetrievalConfig {
            top_k: 2,
            max_top_k: 4,
            on_failure: RetrievalFailurePolicy::Abort,
        });
        assert_eq!(assistant.resolve_top_k(None).expect("default"), 2);
        assert!(assistant.resolve_top_k(Some(5)).is_err());
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let assistant = assistant().await;
        let err = assistant
            .chat(uuid::Uuid::new_v4(), "  ", None)
            .await
            .expect_err("blank");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn extractive_chat_answers_from_best_snippet() {
        let assistant = assistant().await;
        let reply = assistant
            .chat(uuid::Uuid::new_v4(), "When is the keynote?", None)
            .await
            .expect("chat");
        assert!(!reply.fallback);
        assert!(reply.response.contains("June 16"));
        assert_eq!(reply.sources.len(), 3);
        assert_eq!(
            reply.sources[0].get("topic").map(String::as_str),
            Some("keynote")
        );
    }
}
