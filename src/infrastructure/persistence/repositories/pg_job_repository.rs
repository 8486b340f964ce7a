use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{IngestionJob, JobId, JobStatus, UploadId};

/// Postgres-backed job store. Transition guards live in the SQL: every
/// `mark_*` statement names the required current status in its WHERE
/// clause, so a stale or duplicate worker update matches zero rows
/// instead of clobbering a terminal state.
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_job(row: &PgRow) -> Result<IngestionJob, RepositoryError> {
    let db = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());
    let status_raw: String = row.try_get("status").map_err(db)?;
    let status = JobStatus::parse(&status_raw)
        .ok_or_else(|| RepositoryError::QueryFailed(format!("unknown job status: {status_raw}")))?;
    let chunk_count: i32 = row.try_get("chunk_count").map_err(db)?;

    Ok(IngestionJob {
        id: JobId::from_uuid(row.try_get("id").map_err(db)?),
        upload_id: UploadId::from_uuid(row.try_get("upload_id").map_err(db)?),
        status,
        processed_at: row.try_get("processed_at").map_err(db)?,
        chunk_count: chunk_count.max(0) as u32,
        error_message: row.try_get("error_message").map_err(db)?,
        created_at: row.try_get("created_at").map_err(db)?,
        updated_at: row.try_get("updated_at").map_err(db)?,
    })
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    async fn create(&self, job: &IngestionJob) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO ingestion_jobs
                (id, upload_id, status, processed_at, chunk_count, error_message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.upload_id.as_uuid())
        .bind(job.status.as_str())
        .bind(job.processed_at)
        .bind(job.chunk_count as i32)
        .bind(&job.error_message)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(upload_id = %upload_id.as_uuid()))]
    async fn get_by_upload_id(&self, upload_id: UploadId) -> Result<IngestionJob, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, upload_id, status, processed_at, chunk_count, error_message, created_at, updated_at
            FROM ingestion_jobs
            WHERE upload_id = $1
            "#,
        )
        .bind(upload_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => map_job(&row),
            None => Err(RepositoryError::NotFound),
        }
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn mark_processing(&self, id: JobId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE ingestion_jobs
            SET status = 'processing', updated_at = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::InvalidTransition);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid(), chunk_count))]
    async fn mark_done(&self, id: JobId, chunk_count: u32) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE ingestion_jobs
            SET status = 'done', chunk_count = $2, processed_at = $3, updated_at = $3
            WHERE id = $1 AND status = 'processing'
            "#,
        )
        .bind(id.as_uuid())
        .bind(chunk_count as i32)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::InvalidTransition);
        }
        Ok(())
    }

    #[instrument(skip(self, error_message), fields(job_id = %id.as_uuid()))]
    async fn mark_failed(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE ingestion_jobs
            SET status = 'failed', error_message = $2, processed_at = $3, updated_at = $3
            WHERE id = $1 AND status = 'processing'
            "#,
        )
        .bind(id.as_uuid())
        .bind(error_message)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::InvalidTransition);
        }
        Ok(())
    }
}
