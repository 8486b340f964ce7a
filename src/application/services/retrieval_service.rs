use std::sync::Arc;

use crate::application::ports::{
    Embedder, EmbedderError, LlmClient, LlmClientError, SearchFilter, VectorStore,
    VectorStoreError,
};

/// Answers questions over previously ingested documents, scoped to the
/// caller's tenant.
pub struct RetrievalService {
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<dyn LlmClient>,
    vector_store: Arc<dyn VectorStore>,
    top_k: u64,
}

impl RetrievalService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm_client: Arc<dyn LlmClient>,
        vector_store: Arc<dyn VectorStore>,
        top_k: u64,
    ) -> Self {
        Self {
            embedder,
            llm_client,
            vector_store,
            top_k,
        }
    }

    pub async fn query(
        &self,
        question: &str,
        filter: Option<&SearchFilter>,
    ) -> Result<QueryResponse, RetrievalError> {
        let query_embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(RetrievalError::Embedding)?;

        let results = self
            .vector_store
            .search(&query_embedding, self.top_k, filter)
            .await
            .map_err(RetrievalError::Search)?;

        if results.is_empty() {
            return Ok(QueryResponse {
                answer: "No relevant context found.".to_string(),
                sources: Vec::new(),
            });
        }

        let context = results
            .iter()
            .map(|r| r.payload.text_excerpt.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Answer the question using only the context below. If the context is \
             insufficient, say so.\n\nContext:\n{context}\n\nQuestion: {question}"
        );
        let answer = self
            .llm_client
            .complete(&prompt)
            .await
            .map_err(RetrievalError::Completion)?;

        let sources = results
            .into_iter()
            .map(|r| SourceChunk {
                file_name: r.payload.file_name,
                page: r.payload.page,
                text_excerpt: r.payload.text_excerpt,
                score: r.score,
            })
            .collect();

        Ok(QueryResponse { answer, sources })
    }
}

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceChunk>,
}

#[derive(Debug, Clone)]
pub struct SourceChunk {
    pub file_name: String,
    pub page: u32,
    pub text_excerpt: String,
    pub score: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("search: {0}")]
    Search(#[from] VectorStoreError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
