use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
    Filter, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    VectorsConfig,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{SearchFilter, SearchResult, VectorStore, VectorStoreError};
use crate::domain::{ChunkPayload, Embedding, VectorRecord};

// Indexed so tenant-scoped searches stay fast as collections grow.
const KEYWORD_INDEXES: [&str; 3] = ["upload_id", "owner_id", "group_id"];

pub struct QdrantAdapter {
    client: Arc<Qdrant>,
    collection_name: String,
}

impl QdrantAdapter {
    pub async fn new(url: &str, collection_name: String) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            collection_name,
        })
    }

    pub fn with_client(client: Arc<Qdrant>, collection_name: String) -> Self {
        Self {
            client,
            collection_name,
        }
    }

    fn payload_map(payload: &ChunkPayload) -> HashMap<String, serde_json::Value> {
        let mut map: HashMap<String, serde_json::Value> = HashMap::new();
        map.insert(
            "upload_id".to_string(),
            serde_json::Value::String(payload.upload_id.to_string()),
        );
        map.insert(
            "owner_id".to_string(),
            serde_json::Value::String(payload.owner_id.to_string()),
        );
        map.insert(
            "group_id".to_string(),
            serde_json::Value::String(payload.group_id.to_string()),
        );
        map.insert(
            "file_name".to_string(),
            serde_json::Value::String(payload.file_name.clone()),
        );
        map.insert(
            "page".to_string(),
            serde_json::Value::Number(payload.page.into()),
        );
        map.insert(
            "chunk_index".to_string(),
            serde_json::Value::Number(payload.chunk_index.into()),
        );
        map.insert(
            "text_excerpt".to_string(),
            serde_json::Value::String(payload.text_excerpt.clone()),
        );
        map
    }

    fn tenant_filter(filter: &SearchFilter) -> Option<Filter> {
        let mut conditions = Vec::new();
        if let Some(owner_id) = filter.owner_id {
            conditions.push(Condition::matches("owner_id", owner_id.to_string()));
        }
        if let Some(group_id) = filter.group_id {
            conditions.push(Condition::matches("group_id", group_id.to_string()));
        }
        if conditions.is_empty() {
            None
        } else {
            Some(Filter::must(conditions))
        }
    }
}

#[async_trait]
impl VectorStore for QdrantAdapter {
    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn ensure_collection(&self, dimensions: u64) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::ConnectionFailed(e.to_string()))?;
        if exists {
            return Ok(());
        }

        let vectors_config =
            VectorsConfig::from(VectorParamsBuilder::new(dimensions, Distance::Cosine));

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(vectors_config),
            )
            .await
            .map_err(|e| VectorStoreError::OperationFailed(e.to_string()))?;

        info!(collection = %self.collection_name, dimensions, "collection_created");

        for field in KEYWORD_INDEXES {
            self.client
                .create_field_index(CreateFieldIndexCollectionBuilder::new(
                    &self.collection_name,
                    field,
                    FieldType::Keyword,
                ))
                .await
                .map_err(|e| VectorStoreError::OperationFailed(e.to_string()))?;

            info!(collection = %self.collection_name, field, "payload_index_applied");
        }

        Ok(())
    }

    #[instrument(skip(self, records), fields(collection = %self.collection_name, count = records.len()))]
    async fn upsert(&self, records: &[VectorRecord]) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records
            .iter()
            .map(|record| {
                PointStruct::new(
                    PointId::from(record.point_id.to_string()),
                    record.embedding.as_slice().to_vec(),
                    Self::payload_map(&record.payload),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points))
            .await
            .map_err(|e| VectorStoreError::OperationFailed(e.to_string()))?;

        info!(collection = %self.collection_name, count = records.len(), "points_upserted");
        Ok(())
    }

    #[instrument(skip(self, query, filter), fields(collection = %self.collection_name, top_k))]
    async fn search(
        &self,
        query: &Embedding,
        top_k: u64,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        let mut builder = SearchPointsBuilder::new(
            &self.collection_name,
            query.as_slice().to_vec(),
            top_k,
        )
        .with_payload(true);

        if let Some(tenant) = filter.and_then(Self::tenant_filter) {
            builder = builder.filter(tenant);
        }

        let search_result = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| VectorStoreError::OperationFailed(e.to_string()))?;

        let results: Vec<SearchResult> = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let upload_id = Uuid::parse_str(payload.get("upload_id")?.as_str()?).ok()?;
                let owner_id = Uuid::parse_str(payload.get("owner_id")?.as_str()?).ok()?;
                let group_id = Uuid::parse_str(payload.get("group_id")?.as_str()?).ok()?;
                let file_name = payload.get("file_name")?.as_str()?.to_string();
                let page = payload.get("page")?.as_integer()? as u32;
                let chunk_index = payload.get("chunk_index")?.as_integer()? as u32;
                let text_excerpt = payload.get("text_excerpt")?.as_str()?.to_string();

                Some(SearchResult {
                    payload: ChunkPayload {
                        upload_id,
                        owner_id,
                        group_id,
                        file_name,
                        page,
                        chunk_index,
                        text_excerpt,
                    },
                    score: point.score,
                })
            })
            .collect();

        Ok(results)
    }
}
