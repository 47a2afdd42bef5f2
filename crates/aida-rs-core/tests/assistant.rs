use aida_rs_config::{RetrievalConfig, RetrievalFailurePolicy};
use aida_rs_conversations::{ConversationLog, NoopConversationLog};
use aida_rs_core::{AidaCoreError, Assistant, FALLBACK_ANSWER, GenerationBackend, Responder};
use aida_rs_retrieval::{
    EmbeddingFunction, HashingEmbedder, InMemoryIndex, RetrievalError, RetrievedContext,
    Retriever, SimilarityIndex, conference_corpus,
};
use aida_rs_test_utils::{
    EchoBackend, FailingBackend, FailingConversationLog, FailingEmbedder, FixedBackend,
    RecordingBackend, RecordingConversationLog,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use uuid::Uuid;

async fn conference_retriever() -> Retriever {
    Retriever::load(
        Arc::new(InMemoryIndex::new()),
        Arc::new(HashingEmbedder::default()),
        conference_corpus(),
    )
    .await
    .expect("load")
}

async fn assistant_with(
    backend: Arc<dyn GenerationBackend>,
    conversations: Arc<dyn ConversationLog>,
) -> Assistant {
    Assistant::new(
        conference_retriever().await,
        Responder::new(backend),
        conversations,
    )
}

#[tokio::test]
async fn keynote_question_end_to_end() {
    let log = RecordingConversationLog::new();
    let assistant = assistant_with(Arc::new(EchoBackend), Arc::new(log.clone())).await;
    let session_id = Uuid::new_v4();

    let reply = assistant
        .chat(session_id, "When is the keynote?", Some(3))
        .await
        .expect("chat");

    assert!(!reply.fallback);
    assert!(reply.response.contains("June 16"));
    assert!(reply.response.contains("User Question: When is the keynote?"));
    assert_eq!(reply.sources.len(), 3);
    assert_eq!(
        reply.sources[0].get("topic").map(String::as_str),
        Some("keynote")
    );

    let logged = log.exchanges.lock().clone();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].session_id, session_id);
    assert_eq!(logged[0].user_message, "When is the keynote?");
    assert_eq!(logged[0].ai_response, reply.response);
    assert_eq!(logged[0].sources, reply.sources);
}

#[tokio::test]
async fn retrieve_context_is_bounded_and_aligned() {
    let assistant = assistant_with(Arc::new(EchoBackend), Arc::new(NoopConversationLog)).await;
    for top_k in 1..=5 {
        let context = assistant
            .retrieve_context("AIDA integrations", top_k)
            .await
            .expect("retrieve");
        assert_eq!(context.documents.len(), top_k);
        assert_eq!(context.sources.len(), top_k);
    }
}

#[tokio::test]
async fn backend_failure_returns_fallback_and_is_logged() {
    let log = RecordingConversationLog::new();
    let assistant = assistant_with(
        Arc::new(FailingBackend::new("rate limited")),
        Arc::new(log.clone()),
    )
    .await;

    let reply = assistant
        .chat(Uuid::new_v4(), "Where is lunch?", None)
        .await
        .expect("chat");

    assert!(reply.fallback);
    assert_eq!(reply.response, FALLBACK_ANSWER);
    let logged = log.exchanges.lock().clone();
    assert!(logged[0].fallback);
    assert_eq!(logged[0].ai_response, FALLBACK_ANSWER);
}

#[tokio::test]
async fn generate_response_with_empty_context_is_not_empty() {
    let assistant = assistant_with(
        Arc::new(FixedBackend::new("I'm AIDA, your conference assistant.")),
        Arc::new(NoopConversationLog),
    )
    .await;
    let outcome = assistant
        .generate_response("Hello?", &RetrievedContext::empty())
        .await;
    assert!(!outcome.text().is_empty());
}

#[tokio::test]
async fn failing_log_does_not_fail_the_exchange() {
    let assistant = assistant_with(
        Arc::new(FixedBackend::new("Lunch is at noon.")),
        Arc::new(FailingConversationLog),
    )
    .await;
    let session_id = Uuid::new_v4();
    let reply = assistant
        .chat(session_id, "When is lunch?", None)
        .await
        .expect("chat");
    assert_eq!(reply.response, "Lunch is at noon.");
    assert!(assistant.history(session_id).await.is_empty());
}

#[tokio::test]
async fn history_returns_session_exchanges() {
    let log = RecordingConversationLog::new();
    let assistant =
        assistant_with(Arc::new(FixedBackend::new("ok")), Arc::new(log.clone())).await;
    let session_id = Uuid::new_v4();
    assistant.chat(session_id, "first", None).await.expect("chat");
    assistant.chat(Uuid::new_v4(), "other", None).await.expect("chat");
    assistant.chat(session_id, "second", None).await.expect("chat");

    let history = assistant.history(session_id).await;
    let messages: Vec<&str> = history
        .iter()
        .map(|exchange| exchange.user_message.as_str())
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[tokio::test]
async fn invalid_top_k_is_rejected_before_generation() {
    let backend = RecordingBackend::new("unused");
    let assistant = assistant_with(Arc::new(backend.clone()), Arc::new(NoopConversationLog)).await;
    for top_k in [0, -1] {
        let err = assistant
            .chat(Uuid::new_v4(), "When is lunch?", Some(top_k))
            .await
            .expect_err("invalid top_k");
        assert!(matches!(err, AidaCoreError::Invalid(_)));
        assert!(err.is_validation());
    }
    assert!(backend.requests.lock().is_empty());
}

async fn assistant_with_broken_retrieval(policy: RetrievalFailurePolicy) -> (Assistant, RecordingBackend) {
    let index: Arc<dyn SimilarityIndex> = Arc::new(InMemoryIndex::new());
    Retriever::load(
        index.clone(),
        Arc::new(HashingEmbedder::new(8)),
        conference_corpus(),
    )
    .await
    .expect("seed");
    let embedder: Arc<dyn EmbeddingFunction> = Arc::new(FailingEmbedder::new("offline", 8));
    let backend = RecordingBackend::new("general answer");
    let assistant = Assistant::new(
        Retriever::new(index, embedder),
        Responder::new(Arc::new(backend.clone())),
        Arc::new(NoopConversationLog),
    )
    .with_retrieval_config(&RetrievalConfig {
        on_failure: policy,
        ..RetrievalConfig::default()
    });
    (assistant, backend)
}

#[tokio::test]
async fn retrieval_failure_aborts_by_default() {
    let (assistant, backend) = assistant_with_broken_retrieval(RetrievalFailurePolicy::Abort).await;
    let err = assistant
        .chat(Uuid::new_v4(), "When is lunch?", None)
        .await
        .expect_err("abort");
    assert!(matches!(err, AidaCoreError::Retrieval(RetrievalError::Embedding(_))));
    assert!(!err.is_validation());
    assert!(backend.requests.lock().is_empty());
}

#[tokio::test]
async fn ungrounded_policy_answers_without_context() {
    let (assistant, backend) =
        assistant_with_broken_retrieval(RetrievalFailurePolicy::Ungrounded).await;
    let reply = assistant
        .chat(Uuid::new_v4(), "When is lunch?", None)
        .await
        .expect("ungrounded");
    assert_eq!(reply.response, "general answer");
    assert!(reply.sources.is_empty());
    let requests = backend.requests.lock();
    assert!(requests[0].user_prompt.contains("Context:\n\n\nUser Question: When is lunch?"));
}
