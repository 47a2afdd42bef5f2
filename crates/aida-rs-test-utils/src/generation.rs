use aida_rs_core::{GenerationBackend, GenerationError, GenerationRequest};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Backend answering every request with one reply.
#[derive(Debug, Clone)]
pub struct FixedBackend {
    reply: String,
}

impl FixedBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for FixedBackend {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Backend failing every request.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for FailingBackend {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Provider(self.message.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Backend replying with the user prompt it was given.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoBackend;

#[async_trait]
impl GenerationBackend for EchoBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        Ok(request.user_prompt.clone())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

/// Backend recording every request and replying with a fixed answer.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    reply: String,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl RecordingBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl GenerationBackend for RecordingBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().push(request.clone());
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
