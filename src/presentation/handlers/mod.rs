mod health;
mod query;
mod recommendations;
mod upload;
mod upload_status;

pub use health::health_handler;
pub use query::query_handler;
pub use recommendations::{
    generate_recommendations_handler, list_recommendations_handler,
    update_recommendation_status_handler,
};
pub use upload::upload_handler;
pub use upload_status::upload_status_handler;

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) fn error_body(message: impl Into<String>) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: message.into(),
    })
}
