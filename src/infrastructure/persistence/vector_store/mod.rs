mod mock_vector_store;
mod qdrant_adapter;

pub use mock_vector_store::RecordingVectorStore;
pub use qdrant_adapter::QdrantAdapter;
