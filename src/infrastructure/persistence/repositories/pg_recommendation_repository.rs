use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder, Row, postgres::PgRow};
use tracing::instrument;

use crate::application::ports::{
    DEFAULT_LIST_LIMIT, RecommendationFilter, RecommendationRepository, RepositoryError,
};
use crate::domain::{Recommendation, RecommendationId, RecommendationStatus};

pub struct PgRecommendationRepository {
    pool: PgPool,
}

impl PgRecommendationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_recommendation(row: &PgRow) -> Result<Recommendation, RepositoryError> {
    let db = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());
    let status_raw: String = row.try_get("status").map_err(db)?;
    let status = RecommendationStatus::parse(&status_raw).ok_or_else(|| {
        RepositoryError::QueryFailed(format!("unknown recommendation status: {status_raw}"))
    })?;
    let feasibility: i16 = row.try_get("feasibility").map_err(db)?;

    Ok(Recommendation {
        id: RecommendationId::from_uuid(row.try_get("id").map_err(db)?),
        hotspot_id: row.try_get("hotspot_id").map_err(db)?,
        supplier_id: row.try_get("supplier_id").map_err(db)?,
        title: row.try_get("title").map_err(db)?,
        description: row.try_get("description").map_err(db)?,
        co2_reduction: row.try_get("co2_reduction").map_err(db)?,
        cost_impact: row.try_get("cost_impact").map_err(db)?,
        feasibility: feasibility.clamp(0, 10) as u8,
        confidence: row.try_get("confidence").map_err(db)?,
        root_cause: row.try_get("root_cause").map_err(db)?,
        status,
        created_at: row.try_get("created_at").map_err(db)?,
        updated_at: row.try_get("updated_at").map_err(db)?,
    })
}

#[async_trait]
impl RecommendationRepository for PgRecommendationRepository {
    #[instrument(skip(self, recommendation), fields(id = %recommendation.id.as_uuid()))]
    async fn insert(&self, recommendation: &Recommendation) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO recommendations
                (id, hotspot_id, supplier_id, title, description, co2_reduction, cost_impact,
                 feasibility, confidence, root_cause, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(recommendation.id.as_uuid())
        .bind(recommendation.hotspot_id)
        .bind(&recommendation.supplier_id)
        .bind(&recommendation.title)
        .bind(&recommendation.description)
        .bind(recommendation.co2_reduction)
        .bind(&recommendation.cost_impact)
        .bind(recommendation.feasibility as i16)
        .bind(recommendation.confidence)
        .bind(&recommendation.root_cause)
        .bind(recommendation.status.as_str())
        .bind(recommendation.created_at)
        .bind(recommendation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self, filter))]
    async fn list(
        &self,
        filter: &RecommendationFilter,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        let mut query = QueryBuilder::new(
            "SELECT id, hotspot_id, supplier_id, title, description, co2_reduction, cost_impact, \
             feasibility, confidence, root_cause, status, created_at, updated_at \
             FROM recommendations WHERE 1 = 1",
        );

        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(supplier_id) = &filter.supplier_id {
            query.push(" AND supplier_id = ").push_bind(supplier_id);
        }
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT));

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(map_recommendation).collect()
    }

    #[instrument(skip(self), fields(id = %id.as_uuid(), status = %status))]
    async fn update_status(
        &self,
        id: RecommendationId,
        status: RecommendationStatus,
    ) -> Result<Recommendation, RepositoryError> {
        let row = sqlx::query(
            r#"
            UPDATE recommendations
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, hotspot_id, supplier_id, title, description, co2_reduction, cost_impact,
                      feasibility, confidence, root_cause, status, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => map_recommendation(&row),
            None => Err(RepositoryError::NotFound),
        }
    }
}
