mod chunk;
mod embedding;
mod hotspot;
mod ingestion_job;
mod page_text;
mod recommendation;
mod upload;
mod vector_record;

pub use chunk::{Chunk, EXCERPT_CHARS};
pub use embedding::Embedding;
pub use hotspot::HotspotContext;
pub use ingestion_job::{IngestionJob, JobId, JobStatus};
pub use page_text::PageText;
pub use recommendation::{
    Recommendation, RecommendationAction, RecommendationId, RecommendationResponse,
    RecommendationStatus,
};
pub use upload::{Upload, UploadId};
pub use vector_record::{ChunkPayload, VectorRecord};
