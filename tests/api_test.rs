use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use uuid::Uuid;

use carbonpilot::application::ports::{
    Embedder, ExtractionError, JobRepository, LlmClient, RecommendationRepository, TextExtractor,
    UploadRepository, VectorStore,
};
use carbonpilot::application::services::{
    IngestionService, RecommendationService, RetrievalService,
};
use carbonpilot::domain::{PageText, Upload};
use carbonpilot::infrastructure::llm::{MockEmbedder, MockLlmClient};
use carbonpilot::infrastructure::persistence::repositories::{
    InMemoryJobRepository, InMemoryRecommendationRepository, InMemoryUploadRepository,
};
use carbonpilot::infrastructure::persistence::vector_store::RecordingVectorStore;
use carbonpilot::infrastructure::text_processing::OverlapChunker;
use carbonpilot::presentation::router::create_router;
use carbonpilot::presentation::state::AppState;

struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract_pages(
        &self,
        data: &[u8],
        _upload: &Upload,
    ) -> Result<Vec<PageText>, ExtractionError> {
        let text = String::from_utf8(data.to_vec())
            .map_err(|e| ExtractionError::Malformed(e.to_string()))?;
        Ok(vec![PageText::new(1, text)])
    }
}

fn test_app(llm: Arc<MockLlmClient>) -> axum::Router {
    let embedder: Arc<dyn Embedder> = Arc::new(MockEmbedder::new(16));
    let vector_store: Arc<dyn VectorStore> = Arc::new(RecordingVectorStore::new());
    let uploads: Arc<dyn UploadRepository> = Arc::new(InMemoryUploadRepository::new());
    let jobs: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let recommendations: Arc<dyn RecommendationRepository> =
        Arc::new(InMemoryRecommendationRepository::new());

    let ingestion_service = Arc::new(IngestionService::new(
        Arc::new(PlainTextExtractor),
        Arc::new(OverlapChunker::new(400, 80).unwrap()),
        Arc::clone(&embedder),
        Arc::clone(&vector_store),
        uploads,
        jobs,
        "test_collection".to_string(),
    ));
    let retrieval_service = Arc::new(RetrievalService::new(
        embedder,
        Arc::clone(&llm) as Arc<dyn LlmClient>,
        vector_store,
        5,
    ));
    let recommendation_service = Arc::new(RecommendationService::new(
        llm as Arc<dyn LlmClient>,
        Arc::clone(&recommendations),
    ));

    create_router(AppState::new(
        ingestion_service,
        retrieval_service,
        recommendation_service,
        recommendations,
    ))
}

fn app() -> axum::Router {
    test_app(Arc::new(MockLlmClient::new()))
}

fn multipart_upload_body(boundary: &str, owner_id: Uuid, group_id: Uuid) -> String {
    format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"report.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n\
         diesel generators ran overnight at depot four\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"owner_id\"\r\n\r\n\
         {owner_id}\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"group_id\"\r\n\r\n\
         {group_id}\r\n\
         --{boundary}--\r\n"
    )
}

#[tokio::test]
async fn given_running_server_when_health_check_then_returns_ok() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_request_without_id_when_any_endpoint_then_response_contains_request_id() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn given_valid_multipart_upload_when_posting_then_accepted_with_ids() {
    let boundary = "carbonpilot-test-boundary";
    let body = multipart_upload_body(boundary, Uuid::new_v4(), Uuid::new_v4());

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/uploads")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(Uuid::parse_str(json["upload_id"].as_str().unwrap()).is_ok());
    assert!(Uuid::parse_str(json["job_id"].as_str().unwrap()).is_ok());
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn given_upload_without_file_when_posting_then_bad_request() {
    let boundary = "carbonpilot-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"owner_id\"\r\n\r\n\
         {}\r\n\
         --{boundary}--\r\n",
        Uuid::new_v4()
    );

    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/uploads")
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unknown_upload_when_polling_status_then_not_found() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/uploads/{}/status", Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_empty_question_when_querying_then_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/query")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"question": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_generate_without_baseline_when_posting_then_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/recommendations/generate")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"supplier": "Acme"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_zero_baseline_when_generating_then_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/recommendations/generate")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"supplier": "Acme", "predicted_emissions": 150.0, "baseline_emissions": 0.0}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unparseable_model_output_when_generating_then_fallback_body_is_returned() {
    let llm = Arc::new(MockLlmClient::replying("cannot answer"));
    let app = test_app(llm);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/recommendations/generate")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"supplier": "Acme", "predicted_emissions": 150, "baseline_emissions": 100}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(
        json["root_cause"],
        "Unable to determine root cause automatically"
    );
    assert_eq!(json["actions"][0]["title"], "Review supplier operations");
    assert_eq!(json["saved"], 1);
}

#[tokio::test]
async fn given_saved_recommendations_when_listing_then_rows_are_returned() {
    let llm = Arc::new(MockLlmClient::replying(
        r#"{"root_cause": "idle fleet", "actions": [{"title": "Idle shutdown policy", "description": "Cut engines after five minutes", "co2_reduction": 12.0, "cost_impact": "0%", "feasibility": 9}]}"#,
    ));
    let app = test_app(llm);

    let generate = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/recommendations/generate")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"supplier": "Acme", "predicted_emissions": 150, "baseline_emissions": 100}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(generate.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/recommendations?status=pending&supplier_id=Acme")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let rows = json["recommendations"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Idle shutdown policy");
    assert_eq!(rows[0]["status"], "pending");
}

#[tokio::test]
async fn given_invalid_status_when_listing_then_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/recommendations?status=archived")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_invalid_status_when_updating_then_bad_request() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/v1/recommendations/{}", Uuid::new_v4()))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status": "archived"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_unknown_recommendation_when_updating_then_not_found() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/v1/recommendations/{}", Uuid::new_v4()))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"status": "approved"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
