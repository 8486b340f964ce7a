use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::application::ports::{
    ChunkingError, Embedder, EmbedderError, ExtractionError, JobRepository, RepositoryError,
    TextExtractor, TextSplitter, UploadRepository, VectorStore, VectorStoreError,
};
use crate::domain::{IngestionJob, JobId, Upload, UploadId, VectorRecord};

/// Handed back to the caller as soon as the upload is accepted; the
/// pipeline keeps running after the response is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionReceipt {
    pub upload_id: UploadId,
    pub job_id: JobId,
}

/// Orchestrates the ingestion pipeline: records the upload and a
/// pending job synchronously, then runs extract, chunk, embed and
/// upsert on a detached task. The job row is the only progress channel
/// callers can observe.
#[derive(Clone)]
pub struct IngestionService {
    extractor: Arc<dyn TextExtractor>,
    splitter: Arc<dyn TextSplitter>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
    uploads: Arc<dyn UploadRepository>,
    jobs: Arc<dyn JobRepository>,
    collection: String,
}

impl IngestionService {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        splitter: Arc<dyn TextSplitter>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
        uploads: Arc<dyn UploadRepository>,
        jobs: Arc<dyn JobRepository>,
        collection: String,
    ) -> Self {
        Self {
            extractor,
            splitter,
            embedder,
            vector_store,
            uploads,
            jobs,
            collection,
        }
    }

    /// Accepts a document and schedules its pipeline. Returns once the
    /// upload and pending job rows exist; never waits for processing.
    pub async fn start_ingestion(
        &self,
        file_name: String,
        owner_id: Uuid,
        group_id: Uuid,
        data: Vec<u8>,
    ) -> Result<IngestionReceipt, IngestionError> {
        let upload = Upload::new(file_name, owner_id, group_id, self.collection.clone());
        let job = IngestionJob::pending(upload.id);
        let receipt = IngestionReceipt {
            upload_id: upload.id,
            job_id: job.id,
        };

        self.uploads
            .create(&upload)
            .await
            .map_err(IngestionError::Repository)?;
        self.jobs
            .create(&job)
            .await
            .map_err(IngestionError::Repository)?;

        let span = tracing::info_span!(
            "ingestion_job",
            job_id = %receipt.job_id.as_uuid(),
            upload_id = %upload.id.as_uuid(),
            file_name = %upload.file_name,
        );
        let service = self.clone();
        tokio::spawn(
            async move {
                service.process_job(receipt.job_id, upload, data).await;
            }
            .instrument(span),
        );

        Ok(receipt)
    }

    /// Current job for an upload, for status polling.
    pub async fn job_for_upload(
        &self,
        upload_id: UploadId,
    ) -> Result<IngestionJob, IngestionQueryError> {
        match self.jobs.get_by_upload_id(upload_id).await {
            Ok(job) => Ok(job),
            Err(RepositoryError::NotFound) => Err(IngestionQueryError::NotFound),
            Err(e) => Err(IngestionQueryError::Repository(e)),
        }
    }

    async fn process_job(&self, job_id: JobId, upload: Upload, data: Vec<u8>) {
        if let Err(e) = self.jobs.mark_processing(job_id).await {
            tracing::error!(error = %e, "Could not move job to processing");
            return;
        }

        match self.run_pipeline(&upload, &data).await {
            Ok(chunk_count) => {
                if let Err(e) = self.jobs.mark_done(job_id, chunk_count).await {
                    tracing::error!(error = %e, "Could not mark job done");
                } else {
                    tracing::info!(chunk_count, "Ingestion completed");
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(error = %message, "Ingestion failed");
                if let Err(mark_err) = self.jobs.mark_failed(job_id, &message).await {
                    tracing::error!(error = %mark_err, "Could not mark job failed");
                }
            }
        }
    }

    async fn run_pipeline(&self, upload: &Upload, data: &[u8]) -> Result<u32, IngestionError> {
        let pages = self.extractor.extract_pages(data, upload).await?;
        let chunks = self.splitter.split(&pages).await?;

        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(IngestionError::Embedding(EmbedderError::InvalidResponse(
                format!(
                    "expected {} embeddings, got {}",
                    chunks.len(),
                    embeddings.len()
                ),
            )));
        }

        if let Some(first) = embeddings.first() {
            self.vector_store
                .ensure_collection(first.dimensions() as u64)
                .await?;
        }

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| VectorRecord::from_chunk(upload, chunk, embedding))
            .collect();

        self.vector_store.upsert(&records).await?;

        Ok(records.len() as u32)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("chunking: {0}")]
    Chunking(#[from] ChunkingError),
    #[error("embedding: {0}")]
    Embedding(#[from] EmbedderError),
    #[error("vector store: {0}")]
    VectorStore(#[from] VectorStoreError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionQueryError {
    #[error("no job found for this upload")]
    NotFound,
    #[error("repository: {0}")]
    Repository(RepositoryError),
}
