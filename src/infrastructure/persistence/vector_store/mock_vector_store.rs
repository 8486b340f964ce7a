use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{SearchFilter, SearchResult, VectorStore, VectorStoreError};
use crate::domain::{Embedding, VectorRecord};

/// In-memory vector store for tests: keeps every upserted record and
/// ranks searches by cosine similarity, honoring tenant filters. Can
/// be armed to fail the next operation.
#[derive(Default)]
pub struct RecordingVectorStore {
    records: Mutex<Vec<VectorRecord>>,
    fail_next: Mutex<Option<VectorStoreError>>,
}

impl RecordingVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, error: VectorStoreError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn records(&self) -> Vec<VectorRecord> {
        self.records.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Option<VectorStoreError> {
        self.fail_next.lock().unwrap().take()
    }
}

#[async_trait]
impl VectorStore for RecordingVectorStore {
    async fn ensure_collection(&self, _dimensions: u64) -> Result<(), VectorStoreError> {
        match self.take_failure() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let mut stored = self.records.lock().unwrap();
        for record in records {
            // Same point id overwrites, like a real upsert.
            stored.retain(|r| r.point_id != record.point_id);
            stored.push(record.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: u64,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        if let Some(error) = self.take_failure() {
            return Err(error);
        }

        let mut scored: Vec<SearchResult> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| match filter {
                Some(f) => {
                    f.owner_id.is_none_or(|owner| r.payload.owner_id == owner)
                        && f.group_id.is_none_or(|group| r.payload.group_id == group)
                }
                None => true,
            })
            .map(|r| SearchResult {
                payload: r.payload.clone(),
                score: query.cosine_similarity(&r.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k as usize);
        Ok(scored)
    }
}
