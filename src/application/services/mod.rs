mod ingestion_service;
mod llm_output;
mod recommendation_service;
mod retrieval_service;

pub use ingestion_service::{
    IngestionError, IngestionQueryError, IngestionReceipt, IngestionService,
};
pub use llm_output::{LlmOutputError, parse_recommendation_output, score_confidence};
pub use recommendation_service::RecommendationService;
pub use retrieval_service::{QueryResponse, RetrievalError, RetrievalService, SourceChunk};
