use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmClientError {
    #[error("llm request failed: {0}")]
    ApiRequestFailed(String),
    #[error("llm provider rate limited the request")]
    RateLimited,
    #[error("llm response was invalid: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends one prompt and returns the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError>;
}
