use async_trait::async_trait;

use crate::domain::{Upload, UploadId};

use super::RepositoryError;

#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn create(&self, upload: &Upload) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: UploadId) -> Result<Upload, RepositoryError>;
}
