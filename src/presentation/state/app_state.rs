use std::sync::Arc;

use crate::application::ports::RecommendationRepository;
use crate::application::services::{IngestionService, RecommendationService, RetrievalService};

#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<IngestionService>,
    pub retrieval_service: Arc<RetrievalService>,
    pub recommendation_service: Arc<RecommendationService>,
    pub recommendation_repository: Arc<dyn RecommendationRepository>,
}

impl AppState {
    pub fn new(
        ingestion_service: Arc<IngestionService>,
        retrieval_service: Arc<RetrievalService>,
        recommendation_service: Arc<RecommendationService>,
        recommendation_repository: Arc<dyn RecommendationRepository>,
    ) -> Self {
        Self {
            ingestion_service,
            retrieval_service,
            recommendation_service,
            recommendation_repository,
        }
    }
}
