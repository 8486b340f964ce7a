use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One user-submitted document. Immutable once created; the ingestion
/// orchestrator owns the matching [`super::IngestionJob`].
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub id: UploadId,
    pub file_name: String,
    pub storage_ref: String,
    pub owner_id: Uuid,
    pub group_id: Uuid,
    pub collection: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl Upload {
    pub fn new(file_name: String, owner_id: Uuid, group_id: Uuid, collection: String) -> Self {
        let created_at = Utc::now();
        let storage_ref = format!("staging/{}_{}", created_at.timestamp_millis(), file_name);
        Self {
            id: UploadId::new(),
            file_name,
            storage_ref,
            owner_id,
            group_id,
            collection,
            created_at,
        }
    }
}
