use async_trait::async_trait;

use crate::domain::{IngestionJob, JobId, UploadId};

use super::RepositoryError;

/// Persistence for ingestion jobs. The `mark_*` operations enforce the
/// job state machine at the storage layer: a transition attempted from
/// the wrong state returns [`RepositoryError::InvalidTransition`] and
/// leaves the row untouched.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &IngestionJob) -> Result<(), RepositoryError>;

    async fn get_by_upload_id(&self, upload_id: UploadId) -> Result<IngestionJob, RepositoryError>;

    /// pending -> processing
    async fn mark_processing(&self, id: JobId) -> Result<(), RepositoryError>;

    /// processing -> done, recording the produced chunk count.
    async fn mark_done(&self, id: JobId, chunk_count: u32) -> Result<(), RepositoryError>;

    /// processing -> failed, recording the failure reason.
    async fn mark_failed(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError>;
}
