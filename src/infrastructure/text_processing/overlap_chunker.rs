use async_trait::async_trait;

use crate::application::ports::{ChunkingError, TextSplitter};
use crate::domain::{Chunk, PageText};

/// How far back from a hard cut we look for whitespace before giving
/// up and cutting mid-word.
const WORD_BOUNDARY_LOOKBACK: usize = 48;

/// Sliding-window chunker. Windows never cross page boundaries;
/// consecutive windows on the same page share `overlap_chars`
/// characters. Chunk indexes are document-wide and contiguous.
pub struct OverlapChunker {
    max_chunk_chars: usize,
    overlap_chars: usize,
}

impl OverlapChunker {
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Result<Self, ChunkingError> {
        if max_chunk_chars == 0 {
            return Err(ChunkingError::InvalidConfiguration(
                "max_chunk_chars must be positive".to_string(),
            ));
        }
        if overlap_chars >= max_chunk_chars {
            return Err(ChunkingError::InvalidConfiguration(format!(
                "overlap_chars ({overlap_chars}) must be smaller than max_chunk_chars ({max_chunk_chars})"
            )));
        }
        Ok(Self {
            max_chunk_chars,
            overlap_chars,
        })
    }

    fn split_page(&self, page: &PageText, next_index: &mut u32, out: &mut Vec<Chunk>) {
        let chars: Vec<char> = page.text.chars().collect();
        let mut start = 0usize;

        while start < chars.len() {
            let mut end = usize::min(start + self.max_chunk_chars, chars.len());

            if end < chars.len() {
                // Prefer cutting on whitespace close to the hard limit.
                let floor = end.saturating_sub(WORD_BOUNDARY_LOOKBACK).max(start + 1);
                if let Some(boundary) = (floor..end).rev().find(|&i| chars[i].is_whitespace()) {
                    end = boundary;
                }
            }

            let text: String = chars[start..end].iter().collect();
            if !text.trim().is_empty() {
                out.push(Chunk::new(*next_index, page.page, text));
                *next_index += 1;
            }

            if end >= chars.len() {
                break;
            }
            // Guaranteed to advance because overlap_chars < max_chunk_chars.
            start = usize::max(end.saturating_sub(self.overlap_chars), start + 1);
        }
    }
}

#[async_trait]
impl TextSplitter for OverlapChunker {
    async fn split(&self, pages: &[PageText]) -> Result<Vec<Chunk>, ChunkingError> {
        let mut chunks = Vec::new();
        let mut next_index = 0u32;

        for page in pages {
            if page.is_blank() {
                continue;
            }
            self.split_page(page, &mut next_index, &mut chunks);
        }

        Ok(chunks)
    }
}
