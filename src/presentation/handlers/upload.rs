use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::presentation::state::AppState;

use super::error_body;

#[derive(Serialize)]
pub struct UploadResponse {
    pub upload_id: String,
    pub job_id: String,
    pub status: String,
}

/// Accepts a multipart form with a `file` part plus `owner_id` and
/// `group_id` text parts. Responds 202 as soon as the job is recorded;
/// processing continues in the background.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut owner_id: Option<String> = None;
    let mut group_id: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return (
                    StatusCode::BAD_REQUEST,
                    error_body(format!("Failed to read multipart: {}", e)),
                )
                    .into_response();
            }
        };

        match field.name().unwrap_or_default() {
            "file" => {
                let file_name = field.file_name().unwrap_or("unknown").to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((file_name, bytes.to_vec())),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read file bytes");
                        return (
                            StatusCode::BAD_REQUEST,
                            error_body(format!("Failed to read file: {}", e)),
                        )
                            .into_response();
                    }
                }
            }
            "owner_id" => owner_id = field.text().await.ok(),
            "group_id" => group_id = field.text().await.ok(),
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    let Some((file_name, data)) = file else {
        tracing::warn!("Upload request with no file");
        return (StatusCode::BAD_REQUEST, error_body("No file uploaded")).into_response();
    };

    if !file_name.to_lowercase().ends_with(".pdf") {
        tracing::warn!(file_name = %file_name, "Unsupported document type");
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            error_body("Only PDF documents are supported"),
        )
            .into_response();
    }

    let owner_id = match owner_id.as_deref().map(Uuid::parse_str) {
        Some(Ok(id)) => id,
        Some(Err(_)) => {
            return (StatusCode::BAD_REQUEST, error_body("owner_id must be a UUID"))
                .into_response();
        }
        None => {
            return (StatusCode::BAD_REQUEST, error_body("owner_id is required")).into_response();
        }
    };
    let group_id = match group_id.as_deref().map(Uuid::parse_str) {
        Some(Ok(id)) => id,
        Some(Err(_)) => {
            return (StatusCode::BAD_REQUEST, error_body("group_id must be a UUID"))
                .into_response();
        }
        None => {
            return (StatusCode::BAD_REQUEST, error_body("group_id is required")).into_response();
        }
    };

    tracing::debug!(file_name = %file_name, bytes = data.len(), "Processing file upload");

    match state
        .ingestion_service
        .start_ingestion(file_name.clone(), owner_id, group_id, data)
        .await
    {
        Ok(receipt) => {
            tracing::info!(
                upload_id = %receipt.upload_id.as_uuid(),
                job_id = %receipt.job_id.as_uuid(),
                file_name = %file_name,
                "Document ingestion started"
            );
            (
                StatusCode::ACCEPTED,
                Json(UploadResponse {
                    upload_id: receipt.upload_id.as_uuid().to_string(),
                    job_id: receipt.job_id.as_uuid().to_string(),
                    status: "pending".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start ingestion");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Failed to start ingestion"),
            )
                .into_response()
        }
    }
}
