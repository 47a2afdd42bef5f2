//! HTTP error responses.

use aida_rs_core::AidaCoreError;
use aida_rs_protocol::ErrorBody;
use log::warn;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;

/// Error returned by route handlers as `{"detail": ...}` with a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: Status,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: Status, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// Caller input was rejected.
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(Status::UnprocessableEntity, detail)
    }
}

impl From<AidaCoreError> for ApiError {
    fn from(err: AidaCoreError) -> Self {
        if err.is_validation() {
            return Self::unprocessable(err.to_string());
        }
        warn!("request failed (error={err})");
        Self::new(Status::InternalServerError, err.to_string())
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Json(ErrorBody::new(self.detail)).respond_to(request)?;
        response.set_status(self.status);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use aida_rs_core::AidaCoreError;
    use aida_rs_retrieval::{EmbeddingError, RetrievalError};
    use pretty_assertions::assert_eq;
    use rocket::http::Status;

    #[test]
    fn validation_errors_map_to_422() {
        let err = ApiError::from(AidaCoreError::Invalid("top_k must be positive".to_string()));
        assert_eq!(err.status, Status::UnprocessableEntity);
        assert!(err.detail.contains("top_k"));
    }

    #[test]
    fn internal_errors_map_to_500_with_description() {
        let err = ApiError::from(AidaCoreError::Retrieval(RetrievalError::Embedding(
            EmbeddingError::Provider("connection refused".to_string()),
        )));
        assert_eq!(err.status, Status::InternalServerError);
        assert!(err.detail.contains("connection refused"));
    }
}
