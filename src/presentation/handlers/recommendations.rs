use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::{RecommendationFilter, RepositoryError};
use crate::domain::{HotspotContext, Recommendation, RecommendationId, RecommendationStatus};
use crate::presentation::state::AppState;

use super::error_body;

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub hotspot_id: Option<i64>,
    pub supplier: Option<String>,
    pub entity: Option<String>,
    pub category: Option<String>,
    pub period: Option<String>,
    pub predicted_emissions: Option<f64>,
    pub baseline_emissions: Option<f64>,
    pub reason: Option<String>,
    pub recent_events: Option<Vec<serde_json::Value>>,
    /// Set to false to get recommendations without persisting them.
    pub save_to_db: Option<bool>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub root_cause: String,
    pub actions: Vec<ActionBody>,
    pub saved: usize,
    pub recommendations: Vec<RecommendationBody>,
}

#[derive(Serialize)]
pub struct ActionBody {
    pub title: String,
    pub description: String,
    pub co2_reduction: f64,
    pub cost_impact: String,
    pub feasibility: u8,
    pub confidence: f64,
}

#[derive(Serialize)]
pub struct RecommendationBody {
    pub id: String,
    pub hotspot_id: Option<i64>,
    pub supplier_id: Option<String>,
    pub title: String,
    pub description: String,
    pub co2_reduction: f64,
    pub cost_impact: String,
    pub feasibility: u8,
    pub confidence: f64,
    pub root_cause: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recommendation> for RecommendationBody {
    fn from(row: Recommendation) -> Self {
        Self {
            id: row.id.as_uuid().to_string(),
            hotspot_id: row.hotspot_id,
            supplier_id: row.supplier_id,
            title: row.title,
            description: row.description,
            co2_reduction: row.co2_reduction,
            cost_impact: row.cost_impact,
            feasibility: row.feasibility,
            confidence: row.confidence,
            root_cause: row.root_cause,
            status: row.status.to_string(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn generate_recommendations_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> impl IntoResponse {
    if request.predicted_emissions.is_none() || request.baseline_emissions.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            error_body("Missing required fields: predicted_emissions and baseline_emissions are required"),
        )
            .into_response();
    }
    if request.baseline_emissions.is_some_and(|b| b <= 0.0) {
        return (
            StatusCode::BAD_REQUEST,
            error_body("baseline_emissions must be greater than zero"),
        )
            .into_response();
    }

    let save_to_db = request.save_to_db.unwrap_or(true);
    let hotspot = HotspotContext {
        hotspot_id: request.hotspot_id,
        supplier: request.supplier,
        entity: request.entity,
        category: request.category,
        period: request.period,
        predicted_emissions: request.predicted_emissions,
        baseline_emissions: request.baseline_emissions,
        reason: request.reason,
        recent_events: request.recent_events,
    };

    tracing::info!(
        entity = %hotspot.entity_name(),
        predicted = ?hotspot.predicted_emissions,
        baseline = ?hotspot.baseline_emissions,
        "Generating recommendations for hotspot"
    );

    let response = state.recommendation_service.generate(&hotspot).await;

    let saved_rows = if save_to_db {
        state.recommendation_service.save(&hotspot, &response).await
    } else {
        Vec::new()
    };

    (
        StatusCode::OK,
        Json(GenerateResponse {
            root_cause: response.root_cause,
            actions: response
                .actions
                .into_iter()
                .map(|a| ActionBody {
                    title: a.title,
                    description: a.description,
                    co2_reduction: a.co2_reduction,
                    cost_impact: a.cost_impact,
                    feasibility: a.feasibility,
                    confidence: a.confidence,
                })
                .collect(),
            saved: saved_rows.len(),
            recommendations: saved_rows.into_iter().map(RecommendationBody::from).collect(),
        }),
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub supplier_id: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub recommendations: Vec<RecommendationBody>,
}

#[tracing::instrument(skip(state, params))]
pub async fn list_recommendations_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let status = match params.status.as_deref() {
        Some(raw) => match RecommendationStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return (StatusCode::BAD_REQUEST, error_body("Invalid status")).into_response();
            }
        },
        None => None,
    };

    let filter = RecommendationFilter {
        status,
        supplier_id: params.supplier_id,
        limit: params.limit,
    };

    match state.recommendation_repository.list(&filter).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ListResponse {
                recommendations: rows.into_iter().map(RecommendationBody::from).collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch recommendations");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to fetch recommendations"),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct UpdateStatusResponse {
    pub recommendation: RecommendationBody,
}

#[tracing::instrument(skip(state, request))]
pub async fn update_recommendation_status_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let Some(status) = RecommendationStatus::parse(&request.status) else {
        return (StatusCode::BAD_REQUEST, error_body("Invalid status")).into_response();
    };

    match state
        .recommendation_repository
        .update_status(RecommendationId::from_uuid(id), status)
        .await
    {
        Ok(row) => {
            tracing::info!(id = %id, status = %status, "Updated recommendation status");
            (
                StatusCode::OK,
                Json(UpdateStatusResponse {
                    recommendation: RecommendationBody::from(row),
                }),
            )
                .into_response()
        }
        Err(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, error_body("Recommendation not found")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to update recommendation");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to update recommendation"),
            )
                .into_response()
        }
    }
}
