mod mock_repository;
mod pg_job_repository;
mod pg_recommendation_repository;
mod pg_upload_repository;

pub use mock_repository::{InMemoryJobRepository, InMemoryRecommendationRepository, InMemoryUploadRepository};
pub use pg_job_repository::PgJobRepository;
pub use pg_recommendation_repository::PgRecommendationRepository;
pub use pg_upload_repository::PgUploadRepository;
