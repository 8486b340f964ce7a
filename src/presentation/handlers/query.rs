use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::SearchFilter;
use crate::presentation::state::AppState;

use super::error_body;

#[derive(Deserialize)]
pub struct QueryRequest {
    pub question: String,
    pub owner_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct QueryResponseBody {
    pub answer: String,
    pub sources: Vec<SourceBody>,
}

#[derive(Serialize)]
pub struct SourceBody {
    pub file_name: String,
    pub page: u32,
    pub text_excerpt: String,
    pub score: f32,
}

#[tracing::instrument(skip(state, request))]
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    if request.question.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, error_body("question must not be empty"))
            .into_response();
    }

    let filter = SearchFilter {
        owner_id: request.owner_id,
        group_id: request.group_id,
    };
    let filter = (filter != SearchFilter::default()).then_some(filter);

    match state
        .retrieval_service
        .query(&request.question, filter.as_ref())
        .await
    {
        Ok(response) => (
            StatusCode::OK,
            Json(QueryResponseBody {
                answer: response.answer,
                sources: response
                    .sources
                    .into_iter()
                    .map(|s| SourceBody {
                        file_name: s.file_name,
                        page: s.page,
                        text_excerpt: s.text_excerpt,
                        score: s.score,
                    })
                    .collect(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Query failed"),
            )
                .into_response()
        }
    }
}
