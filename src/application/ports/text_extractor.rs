use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{PageText, Upload};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document is malformed: {0}")]
    Malformed(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Turns raw document bytes into per-page sanitized text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_pages(
        &self,
        data: &[u8],
        upload: &Upload,
    ) -> Result<Vec<PageText>, ExtractionError>;
}
