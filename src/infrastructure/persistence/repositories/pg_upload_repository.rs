use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::instrument;

use crate::application::ports::{RepositoryError, UploadRepository};
use crate::domain::{Upload, UploadId};

pub struct PgUploadRepository {
    pool: PgPool,
}

impl PgUploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_upload(row: &PgRow) -> Result<Upload, RepositoryError> {
    let db = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());
    Ok(Upload {
        id: UploadId::from_uuid(row.try_get("id").map_err(db)?),
        file_name: row.try_get("file_name").map_err(db)?,
        storage_ref: row.try_get("storage_ref").map_err(db)?,
        owner_id: row.try_get("owner_id").map_err(db)?,
        group_id: row.try_get("group_id").map_err(db)?,
        collection: row.try_get("collection").map_err(db)?,
        created_at: row.try_get("created_at").map_err(db)?,
    })
}

#[async_trait]
impl UploadRepository for PgUploadRepository {
    #[instrument(skip(self, upload), fields(upload_id = %upload.id.as_uuid()))]
    async fn create(&self, upload: &Upload) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO uploads (id, file_name, storage_ref, owner_id, group_id, collection, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(upload.id.as_uuid())
        .bind(&upload.file_name)
        .bind(&upload.storage_ref)
        .bind(upload.owner_id)
        .bind(upload.group_id)
        .bind(&upload.collection)
        .bind(upload.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(upload_id = %id.as_uuid()))]
    async fn get_by_id(&self, id: UploadId) -> Result<Upload, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, file_name, storage_ref, owner_id, group_id, collection, created_at
            FROM uploads
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => map_upload(&row),
            None => Err(RepositoryError::NotFound),
        }
    }
}
