use crate::domain::ChunkPayload;

/// One similarity-search hit, highest score first.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub payload: ChunkPayload,
    pub score: f32,
}
