use aida_rs_config::ServerConfig;
use aida_rs_conversations::ConversationLog;
use aida_rs_core::{Assistant, FALLBACK_ANSWER, GenerationBackend, Responder};
use aida_rs_protocol::{ChatExchange, ChatResponse, ErrorBody, HealthStatus};
use aida_rs_retrieval::{HashingEmbedder, InMemoryIndex, Retriever, conference_corpus};
use aida_rs_server::build_rocket;
use aida_rs_test_utils::{EchoBackend, FailingBackend, RecordingConversationLog};
use pretty_assertions::assert_eq;
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

async fn client_with(
    backend: Arc<dyn GenerationBackend>,
    conversations: Arc<dyn ConversationLog>,
) -> Client {
    client_for(backend, conversations, ServerConfig::default()).await
}

async fn client_for(
    backend: Arc<dyn GenerationBackend>,
    conversations: Arc<dyn ConversationLog>,
    server: ServerConfig,
) -> Client {
    let retriever = Retriever::load(
        Arc::new(InMemoryIndex::new()),
        Arc::new(HashingEmbedder::default()),
        conference_corpus(),
    )
    .await
    .expect("load");
    let assistant = Arc::new(Assistant::new(
        retriever,
        Responder::new(backend),
        conversations,
    ));
    Client::tracked(build_rocket(assistant, &server))
        .await
        .expect("client")
}

async fn echo_client() -> Client {
    client_with(Arc::new(EchoBackend), Arc::new(RecordingConversationLog::new())).await
}

#[tokio::test]
async fn health_reports_healthy() {
    let client = echo_client().await;
    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body: HealthStatus = response.into_json().await.expect("json");
    assert_eq!(body, HealthStatus::healthy());
}

#[tokio::test]
async fn chat_returns_answer_and_sources() {
    let client = echo_client().await;
    let response = client
        .post("/chat")
        .header(ContentType::JSON)
        .body(
            json!({
                "message": "When is the keynote?",
                "session_id": Uuid::new_v4(),
                "top_k": 3,
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: ChatResponse = response.into_json().await.expect("json");
    assert!(body.response.contains("June 16"));
    assert_eq!(body.sources.len(), 3);
    assert_eq!(
        body.sources[0].get("topic").map(String::as_str),
        Some("keynote")
    );
}

#[tokio::test]
async fn chat_with_failing_backend_returns_fallback() {
    let client = client_with(
        Arc::new(FailingBackend::new("upstream down")),
        Arc::new(RecordingConversationLog::new()),
    )
    .await;
    let response = client
        .post("/chat")
        .header(ContentType::JSON)
        .body(json!({ "message": "Where is lunch?", "session_id": Uuid::new_v4() }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body: ChatResponse = response.into_json().await.expect("json");
    assert_eq!(body.response, FALLBACK_ANSWER);
}

#[tokio::test]
async fn chat_rejects_non_positive_top_k() {
    let client = echo_client().await;
    for top_k in [0, -3] {
        let response = client
            .post("/chat")
            .header(ContentType::JSON)
            .body(
                json!({ "message": "hi", "session_id": Uuid::new_v4(), "top_k": top_k })
                    .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body: ErrorBody = response.into_json().await.expect("json");
        assert!(body.detail.contains("top_k"));
    }
}

#[tokio::test]
async fn chat_requires_session_id() {
    let client = echo_client().await;
    let response = client
        .post("/chat")
        .header(ContentType::JSON)
        .body(json!({ "message": "hi" }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
}

#[tokio::test]
async fn history_lists_session_exchanges() {
    let client = echo_client().await;
    let session_id = Uuid::new_v4();
    for message in ["When is lunch?", "Where is the conference?"] {
        let response = client
            .post("/chat")
            .header(ContentType::JSON)
            .body(json!({ "message": message, "session_id": session_id }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    let response = client
        .get(format!("/history/{session_id}"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let history: Vec<ChatExchange> = response.into_json().await.expect("json");
    let messages: Vec<&str> = history
        .iter()
        .map(|exchange| exchange.user_message.as_str())
        .collect();
    assert_eq!(messages, vec!["When is lunch?", "Where is the conference?"]);
}

#[tokio::test]
async fn history_rejects_malformed_session_id() {
    let client = echo_client().await;
    let response = client.get("/history/not-a-uuid").dispatch().await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
}

#[tokio::test]
async fn cors_headers_only_for_allowed_origins() {
    let client = echo_client().await;
    let allowed = client
        .get("/health")
        .header(Header::new("Origin", "http://localhost:3000"))
        .dispatch()
        .await;
    assert_eq!(
        allowed.headers().get_one("Access-Control-Allow-Origin"),
        Some("http://localhost:3000")
    );

    let denied = client
        .get("/health")
        .header(Header::new("Origin", "http://evil.example"))
        .dispatch()
        .await;
    assert_eq!(denied.headers().get_one("Access-Control-Allow-Origin"), None);
}

#[tokio::test]
async fn wildcard_origin_never_allows_credentials() {
    let server = ServerConfig {
        allowed_origins: vec!["*".to_string()],
        ..ServerConfig::default()
    };
    let client = client_for(
        Arc::new(EchoBackend),
        Arc::new(RecordingConversationLog::new()),
        server,
    )
    .await;
    let response = client
        .get("/health")
        .header(Header::new("Origin", "http://anywhere.example"))
        .dispatch()
        .await;
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Credentials"),
        None
    );
}

#[tokio::test]
async fn listed_origin_gets_credentials() {
    let client = echo_client().await;
    let response = client
        .get("/health")
        .header(Header::new("Origin", "http://localhost:3000"))
        .dispatch()
        .await;
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Credentials"),
        Some("true")
    );
}

#[tokio::test]
async fn preflight_is_answered() {
    let client = echo_client().await;
    let response = client
        .options("/chat")
        .header(Header::new("Origin", "http://localhost:3000"))
        .header(Header::new("Access-Control-Request-Method", "POST"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Methods"),
        Some("GET, POST, OPTIONS")
    );
}
