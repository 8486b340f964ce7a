use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Embedding, VectorRecord};

use super::SearchResult;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("vector store connection failed: {0}")]
    ConnectionFailed(String),
    #[error("vector store operation failed: {0}")]
    OperationFailed(String),
}

/// Tenant scoping applied to similarity search. Both fields must match
/// when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub owner_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the collection if it does not exist yet. Idempotent.
    async fn ensure_collection(&self, dimensions: u64) -> Result<(), VectorStoreError>;

    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError>;

    async fn search(
        &self,
        query: &Embedding,
        top_k: u64,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;
}
