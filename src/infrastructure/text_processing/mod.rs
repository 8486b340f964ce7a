mod overlap_chunker;
mod pdf_extractor;
mod text_sanitizer;

pub use overlap_chunker::OverlapChunker;
pub use pdf_extractor::PdfExtractor;
pub use text_sanitizer::sanitize_page_text;
