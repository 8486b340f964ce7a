use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{Embedder, EmbedderError};
use crate::domain::Embedding;

/// Deterministic embedder for tests: hashes characters into a small
/// fixed-dimension vector so equal texts embed equally. Can be armed
/// to fail the next call.
pub struct MockEmbedder {
    dimensions: usize,
    fail_next: Mutex<Option<EmbedderError>>,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail_next: Mutex::new(None),
        }
    }

    pub fn fail_next(&self, error: EmbedderError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    fn embed_text(&self, text: &str) -> Embedding {
        let mut values = vec![0.0f32; self.dimensions];
        for (i, ch) in text.chars().enumerate() {
            values[i % self.dimensions] += (ch as u32 % 97) as f32 / 97.0;
        }
        Embedding::new(values)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbedderError> {
        if let Some(error) = self.fail_next.lock().unwrap().take() {
            return Err(error);
        }
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}
