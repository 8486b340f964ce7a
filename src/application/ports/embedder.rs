use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Embedding;

#[derive(Debug, Error)]
pub enum EmbedderError {
    #[error("embedding request failed: {0}")]
    ApiRequestFailed(String),
    #[error("embedding provider rate limited the request")]
    RateLimited,
    #[error("embedding response was invalid: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError>;

    /// Embeds many texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError>;
}
