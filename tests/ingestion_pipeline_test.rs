use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use carbonpilot::application::ports::{
    EmbedderError, ExtractionError, JobRepository, TextExtractor, UploadRepository,
};
use carbonpilot::application::services::{IngestionQueryError, IngestionService};
use carbonpilot::domain::{JobStatus, PageText, Upload, UploadId};
use carbonpilot::infrastructure::llm::MockEmbedder;
use carbonpilot::infrastructure::persistence::repositories::{
    InMemoryJobRepository, InMemoryUploadRepository,
};
use carbonpilot::infrastructure::persistence::vector_store::RecordingVectorStore;
use carbonpilot::infrastructure::text_processing::OverlapChunker;

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
        Ok(text
            .split("\x0c")
            .enumerate()
            .map(|(i, page)| PageText::new(i as u32 + 1, page))
            .collect())
    }
}

struct BrokenExtractor;

#[async_trait]
impl TextExtractor for BrokenExtractor {
    async fn extract_pages(
        &self,
        _data: &[u8],
        _upload: &Upload,
    ) -> Result<Vec<PageText>, ExtractionError> {
        Err(ExtractionError::Malformed("not a pdf".to_string()))
    }
}

struct Harness {
    service: Arc<IngestionService>,
    jobs: Arc<InMemoryJobRepository>,
    vector_store: Arc<RecordingVectorStore>,
    embedder: Arc<MockEmbedder>,
}

fn harness(extractor: Arc<dyn TextExtractor>) -> Harness {
    let jobs = Arc::new(InMemoryJobRepository::new());
    let vector_store = Arc::new(RecordingVectorStore::new());
    let embedder = Arc::new(MockEmbedder::new(16));
    let uploads = Arc::new(InMemoryUploadRepository::new());

    let service = Arc::new(IngestionService::new(
        extractor,
        Arc::new(OverlapChunker::new(400, 80).unwrap()),
        Arc::clone(&embedder) as Arc<dyn carbonpilot::application::ports::Embedder>,
        Arc::clone(&vector_store)
            as Arc<dyn carbonpilot::application::ports::VectorStore>,
        Arc::clone(&uploads) as Arc<dyn UploadRepository>,
        Arc::clone(&jobs) as Arc<dyn JobRepository>,
        "test_collection".to_string(),
    ));

    Harness {
        service,
        jobs,
        vector_store,
        embedder,
    }
}

async fn wait_for_terminal(
    jobs: &InMemoryJobRepository,
    upload_id: UploadId,
) -> carbonpilot::domain::IngestionJob {
    for _ in 0..100 {
        let job = jobs.get_by_upload_id(upload_id).await.unwrap();
        if job.status.is_terminal() {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job never reached a terminal state");
}

#[tokio::test]
async fn given_valid_document_when_ingesting_then_job_finishes_with_matching_chunk_count() {
    let h = harness(Arc::new(PlainTextExtractor));
    let text = "logistics fleet idled overnight at depot four ".repeat(60);

    let receipt = h
        .service
        .start_ingestion(
            "fleet-report.pdf".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            text.into_bytes(),
        )
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, receipt.upload_id).await;

    assert_eq!(job.status, JobStatus::Done);
    assert!(job.processed_at.is_some());
    assert_eq!(job.chunk_count as usize, h.vector_store.records().len());
    assert!(job.chunk_count > 0);
}

#[tokio::test]
async fn given_empty_document_when_ingesting_then_job_finishes_with_zero_chunks() {
    let h = harness(Arc::new(PlainTextExtractor));

    let receipt = h
        .service
        .start_ingestion(
            "blank.pdf".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            b"   \n  ".to_vec(),
        )
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, receipt.upload_id).await;

    assert_eq!(job.status, JobStatus::Done);
    assert_eq!(job.chunk_count, 0);
    assert!(h.vector_store.records().is_empty());
}

#[tokio::test]
async fn given_extraction_failure_when_ingesting_then_job_fails_with_message() {
    let h = harness(Arc::new(BrokenExtractor));

    let receipt = h
        .service
        .start_ingestion(
            "corrupt.pdf".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            b"garbage".to_vec(),
        )
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, receipt.upload_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    let message = job.error_message.unwrap();
    assert!(message.contains("not a pdf"));
    assert!(h.vector_store.records().is_empty());
}

#[tokio::test]
async fn given_embedder_failure_when_ingesting_then_job_fails_and_nothing_is_stored() {
    let h = harness(Arc::new(PlainTextExtractor));
    h.embedder
        .fail_next(EmbedderError::ApiRequestFailed("connection reset".to_string()));

    let receipt = h
        .service
        .start_ingestion(
            "report.pdf".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "diesel usage by site".repeat(30).into_bytes(),
        )
        .await
        .unwrap();

    let job = wait_for_terminal(&h.jobs, receipt.upload_id).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error_message.unwrap().contains("connection reset"));
    assert!(h.vector_store.records().is_empty());
}

#[tokio::test]
async fn given_unknown_upload_when_polling_status_then_not_found_is_returned() {
    let h = harness(Arc::new(PlainTextExtractor));

    let result = h.service.job_for_upload(UploadId::new()).await;

    assert!(matches!(result, Err(IngestionQueryError::NotFound)));
}

#[tokio::test]
async fn given_repeated_ingestion_of_same_text_when_done_then_vector_store_grows_per_upload() {
    let h = harness(Arc::new(PlainTextExtractor));
    let text = "quarterly audit summary for supplier nine ".repeat(40);

    let first = h
        .service
        .start_ingestion(
            "audit.pdf".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            text.clone().into_bytes(),
        )
        .await
        .unwrap();
    let first_job = wait_for_terminal(&h.jobs, first.upload_id).await;

    let second = h
        .service
        .start_ingestion(
            "audit.pdf".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            text.into_bytes(),
        )
        .await
        .unwrap();
    let second_job = wait_for_terminal(&h.jobs, second.upload_id).await;

    // Distinct uploads get distinct point ids even for identical text.
    assert_eq!(
        h.vector_store.records().len() as u32,
        first_job.chunk_count + second_job.chunk_count
    );
}
