/// Maximum length, in characters, of the excerpt stored alongside a
/// vector point. Keeps vector payloads small while leaving enough text
/// for citation rendering.
pub const EXCERPT_CHARS: usize = 500;

/// A contiguous slice of page text produced by the chunker. The index
/// is document-wide and contiguous, not per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: u32,
    /// Page the chunk starts on, 1-based.
    pub page: u32,
    pub text: String,
}

impl Chunk {
    pub fn new(index: u32, page: u32, text: impl Into<String>) -> Self {
        Self {
            index,
            page,
            text: text.into(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// First [`EXCERPT_CHARS`] characters of the chunk, cut on a char
    /// boundary so multi-byte text never panics.
    pub fn excerpt(&self) -> String {
        self.text.chars().take(EXCERPT_CHARS).collect()
    }
}
