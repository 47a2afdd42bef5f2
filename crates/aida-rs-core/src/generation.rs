//! Text generation backend interface and the offline extractive backend.

use async_trait::async_trait;

/// Marker preceding the context block in the user prompt.
pub const CONTEXT_MARKER: &str = "Context:\n";
/// Marker following the context block in the user prompt.
pub const QUESTION_MARKER: &str = "\n\nUser Question: ";

/// One single-turn generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Errors returned by generation backends.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Upstream provider failed.
    #[error("generation provider error: {0}")]
    Provider(String),
    /// Provider replied without text.
    #[error("generation returned no text")]
    EmptyResponse,
}

#[async_trait]
/// Produces answer text for a prompt.
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    /// Backend identifier, used in logs.
    fn name(&self) -> &str;
}

/// Offline backend that answers with the first line of the prompt context.
///
/// Lets the service run without credentials; the answer is always a
/// verbatim knowledge-base snippet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveBackend;

impl ExtractiveBackend {
    pub const NAME: &'static str = "extractive";
}

#[async_trait]
impl GenerationBackend for ExtractiveBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        first_context_line(&request.user_prompt)
            .map(str::to_string)
            .ok_or_else(|| GenerationError::Provider("prompt carries no context".to_string()))
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// First non-blank line between the context and question markers.
fn first_context_line(prompt: &str) -> Option<&str> {
    let (_, rest) = prompt.split_once(CONTEXT_MARKER)?;
    let context = rest
        .split_once(QUESTION_MARKER)
        .map(|(context, _)| context)
        .unwrap_or(rest);
    context.lines().map(str::trim).find(|line| !line.is_empty())
}
