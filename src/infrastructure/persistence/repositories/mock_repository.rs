use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    DEFAULT_LIST_LIMIT, JobRepository, RecommendationFilter, RecommendationRepository,
    RepositoryError, UploadRepository,
};
use crate::domain::{
    IngestionJob, JobId, JobStatus, Recommendation, RecommendationId, RecommendationStatus,
    Upload, UploadId,
};

/// In-memory stores for tests and local development. The job store
/// enforces the same transition rules as the SQL guards.
#[derive(Default)]
pub struct InMemoryUploadRepository {
    uploads: Mutex<HashMap<UploadId, Upload>>,
}

impl InMemoryUploadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UploadRepository for InMemoryUploadRepository {
    async fn create(&self, upload: &Upload) -> Result<(), RepositoryError> {
        self.uploads
            .lock()
            .unwrap()
            .insert(upload.id, upload.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: UploadId) -> Result<Upload, RepositoryError> {
        self.uploads
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<JobId, IngestionJob>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn transition(
        &self,
        id: JobId,
        next: JobStatus,
        apply: impl FnOnce(&mut IngestionJob),
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if !job.status.can_transition_to(next) {
            return Err(RepositoryError::InvalidTransition);
        }
        job.status = next;
        job.updated_at = chrono::Utc::now();
        apply(job);
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &IngestionJob) -> Result<(), RepositoryError> {
        self.jobs.lock().unwrap().insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_upload_id(&self, upload_id: UploadId) -> Result<IngestionJob, RepositoryError> {
        self.jobs
            .lock()
            .unwrap()
            .values()
            .find(|j| j.upload_id == upload_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn mark_processing(&self, id: JobId) -> Result<(), RepositoryError> {
        self.transition(id, JobStatus::Processing, |_| {})
    }

    async fn mark_done(&self, id: JobId, chunk_count: u32) -> Result<(), RepositoryError> {
        self.transition(id, JobStatus::Done, |job| {
            job.chunk_count = chunk_count;
            job.processed_at = Some(chrono::Utc::now());
        })
    }

    async fn mark_failed(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError> {
        self.transition(id, JobStatus::Failed, |job| {
            job.error_message = Some(error_message.to_string());
            job.processed_at = Some(chrono::Utc::now());
        })
    }
}

#[derive(Default)]
pub struct InMemoryRecommendationRepository {
    rows: Mutex<Vec<Recommendation>>,
    fail_titles: Mutex<Vec<String>>,
}

impl InMemoryRecommendationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the store to reject inserts whose title matches, for
    /// exercising partial-save behavior.
    pub fn fail_inserts_titled(&self, title: impl Into<String>) {
        self.fail_titles.lock().unwrap().push(title.into());
    }

    pub fn rows(&self) -> Vec<Recommendation> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationRepository for InMemoryRecommendationRepository {
    async fn insert(&self, recommendation: &Recommendation) -> Result<(), RepositoryError> {
        if self
            .fail_titles
            .lock()
            .unwrap()
            .contains(&recommendation.title)
        {
            return Err(RepositoryError::QueryFailed("simulated failure".to_string()));
        }
        self.rows.lock().unwrap().push(recommendation.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: &RecommendationFilter,
    ) -> Result<Vec<Recommendation>, RepositoryError> {
        let mut rows: Vec<Recommendation> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| {
                filter
                    .supplier_id
                    .as_ref()
                    .is_none_or(|s| r.supplier_id.as_deref() == Some(s.as_str()))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT).max(0) as usize);
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: RecommendationId,
        status: RecommendationStatus,
    ) -> Result<Recommendation, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RepositoryError::NotFound)?;
        row.status = status;
        row.updated_at = chrono::Utc::now();
        Ok(row.clone())
    }
}
