use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("row not found")]
    NotFound,
    #[error("status transition is not allowed from the current state")]
    InvalidTransition,
}
