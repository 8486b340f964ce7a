use async_trait::async_trait;

use crate::domain::{Recommendation, RecommendationId, RecommendationStatus};

use super::RepositoryError;

pub const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationFilter {
    pub status: Option<RecommendationStatus>,
    pub supplier_id: Option<String>,
    pub limit: Option<i64>,
}

#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    async fn insert(&self, recommendation: &Recommendation) -> Result<(), RepositoryError>;

    /// Newest first, capped at the filter limit (default
    /// [`DEFAULT_LIST_LIMIT`]).
    async fn list(
        &self,
        filter: &RecommendationFilter,
    ) -> Result<Vec<Recommendation>, RepositoryError>;

    async fn update_status(
        &self,
        id: RecommendationId,
        status: RecommendationStatus,
    ) -> Result<Recommendation, RepositoryError>;
}
