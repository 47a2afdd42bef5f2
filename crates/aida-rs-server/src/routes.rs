//! Route handlers and error catchers.

use crate::error::ApiError;
use aida_rs_core::Assistant;
use aida_rs_protocol::{ChatExchange, ChatRequest, ChatResponse, ErrorBody, HealthStatus};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Catcher, Request, Route, State, catch, catchers, get, options, post, routes};
use std::sync::Arc;
use uuid::Uuid;

pub(crate) fn routes() -> Vec<Route> {
    routes![health, chat, history, preflight]
}

pub(crate) fn catchers() -> Vec<Catcher> {
    catchers![bad_request, not_found, unprocessable, internal_error]
}

#[get("/health")]
fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}

#[post("/chat", data = "<request>")]
async fn chat(
    assistant: &State<Arc<Assistant>>,
    request: Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = request.into_inner();
    let reply = assistant
        .chat(request.session_id, &request.message, request.top_k)
        .await?;
    Ok(Json(reply.into()))
}

#[get("/history/<session_id>")]
async fn history(
    assistant: &State<Arc<Assistant>>,
    session_id: &str,
) -> Result<Json<Vec<ChatExchange>>, ApiError> {
    let session_id = Uuid::parse_str(session_id)
        .map_err(|err| ApiError::unprocessable(format!("invalid session id: {err}")))?;
    Ok(Json(assistant.history(session_id).await))
}

/// CORS preflight; headers are added by the fairing.
#[options("/<_..>")]
fn preflight() -> Status {
    Status::NoContent
}

#[catch(400)]
fn bad_request(_request: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody::new("malformed request body"))
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody::new(format!("no route for {}", request.uri())))
}

#[catch(422)]
fn unprocessable(_request: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody::new("request body failed validation"))
}

#[catch(500)]
fn internal_error(_request: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody::new("internal server error"))
}
