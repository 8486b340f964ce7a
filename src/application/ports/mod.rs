mod embedder;
mod job_repository;
mod llm_client;
mod recommendation_repository;
mod repository_error;
mod search_result;
mod text_extractor;
mod text_splitter;
mod upload_repository;
mod vector_store;

pub use embedder::{Embedder, EmbedderError};
pub use job_repository::JobRepository;
pub use llm_client::{LlmClient, LlmClientError};
pub use recommendation_repository::{
    DEFAULT_LIST_LIMIT, RecommendationFilter, RecommendationRepository,
};
pub use repository_error::RepositoryError;
pub use search_result::SearchResult;
pub use text_extractor::{ExtractionError, TextExtractor};
pub use text_splitter::{ChunkingError, TextSplitter};
pub use upload_repository::UploadRepository;
pub use vector_store::{SearchFilter, VectorStore, VectorStoreError};
