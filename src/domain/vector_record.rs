use uuid::Uuid;

use super::{Chunk, Embedding, Upload};

/// Payload stored next to each vector point. Tenant fields double as
/// search filters so one collection can serve many owners.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPayload {
    pub upload_id: Uuid,
    pub owner_id: Uuid,
    pub group_id: Uuid,
    pub file_name: String,
    pub page: u32,
    pub chunk_index: u32,
    pub text_excerpt: String,
}

/// One point ready for upsert into the vector store.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub point_id: Uuid,
    pub embedding: Embedding,
    pub payload: ChunkPayload,
}

impl VectorRecord {
    pub fn from_chunk(upload: &Upload, chunk: &Chunk, embedding: Embedding) -> Self {
        Self {
            point_id: point_id_for(upload.id.as_uuid(), chunk.index),
            embedding,
            payload: ChunkPayload {
                upload_id: upload.id.as_uuid(),
                owner_id: upload.owner_id,
                group_id: upload.group_id,
                file_name: upload.file_name.clone(),
                page: chunk.page,
                chunk_index: chunk.index,
                text_excerpt: chunk.excerpt(),
            },
        }
    }
}

/// Deterministic point id derived from the upload and chunk index, so
/// re-running a pipeline overwrites its own points instead of
/// duplicating them.
pub fn point_id_for(upload_id: Uuid, chunk_index: u32) -> Uuid {
    Uuid::new_v5(&upload_id, &chunk_index.to_be_bytes())
}
