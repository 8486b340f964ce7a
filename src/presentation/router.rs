use axum::Router;
use axum::middleware;
use axum::routing::{get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    generate_recommendations_handler, health_handler, list_recommendations_handler,
    query_handler, update_recommendation_status_handler, upload_handler, upload_status_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/uploads", post(upload_handler))
        .route(
            "/api/v1/uploads/{upload_id}/status",
            get(upload_status_handler),
        )
        .route("/api/v1/query", post(query_handler))
        .route(
            "/api/v1/recommendations/generate",
            post(generate_recommendations_handler),
        )
        .route("/api/v1/recommendations", get(list_recommendations_handler))
        .route(
            "/api/v1/recommendations/{id}",
            patch(update_recommendation_status_handler),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
