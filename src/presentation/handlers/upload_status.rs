use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::IngestionQueryError;
use crate::domain::UploadId;
use crate::presentation::state::AppState;

use super::error_body;

#[derive(Serialize)]
pub struct UploadStatusResponse {
    pub upload_id: String,
    pub job_id: String,
    pub status: String,
    pub chunk_count: u32,
    pub processed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

#[tracing::instrument(skip(state))]
pub async fn upload_status_handler(
    State(state): State<AppState>,
    Path(upload_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .ingestion_service
        .job_for_upload(UploadId::from_uuid(upload_id))
        .await
    {
        Ok(job) => (
            StatusCode::OK,
            Json(UploadStatusResponse {
                upload_id: job.upload_id.as_uuid().to_string(),
                job_id: job.id.as_uuid().to_string(),
                status: job.status.to_string(),
                chunk_count: job.chunk_count,
                processed_at: job.processed_at,
                error_message: job.error_message,
            }),
        )
            .into_response(),
        Err(IngestionQueryError::NotFound) => {
            (StatusCode::NOT_FOUND, error_body("Upload not found")).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load job status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to load job status"),
            )
                .into_response()
        }
    }
}
