use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Chunk, PageText};

#[derive(Debug, Error)]
pub enum ChunkingError {
    #[error("invalid chunker configuration: {0}")]
    InvalidConfiguration(String),
}

/// Splits page text into overlapping chunks with document-wide,
/// contiguous indexes.
#[async_trait]
pub trait TextSplitter: Send + Sync {
    async fn split(&self, pages: &[PageText]) -> Result<Vec<Chunk>, ChunkingError>;
}
