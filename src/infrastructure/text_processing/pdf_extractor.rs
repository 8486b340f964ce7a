use std::time::Duration;

use async_trait::async_trait;
use lopdf::Document;
use tracing::{debug, instrument, warn};

use crate::application::ports::{ExtractionError, TextExtractor};
use crate::domain::{PageText, Upload};

use super::sanitize_page_text;

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// PDF text extraction via lopdf. Parsing runs on the blocking pool
/// with a hard timeout so a pathological document cannot wedge the
/// pipeline.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextExtractor for PdfExtractor {
    #[instrument(skip(self, data), fields(file_name = %upload.file_name, bytes = data.len()))]
    async fn extract_pages(
        &self,
        data: &[u8],
        upload: &Upload,
    ) -> Result<Vec<PageText>, ExtractionError> {
        let bytes = data.to_vec();
        let parse = tokio::task::spawn_blocking(move || extract_raw_pages(&bytes));

        let pages = match tokio::time::timeout(EXTRACTION_TIMEOUT, parse).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => {
                return Err(ExtractionError::ExtractionFailed(join_err.to_string()));
            }
            Err(_) => {
                return Err(ExtractionError::ExtractionFailed(
                    "pdf parsing timed out".to_string(),
                ));
            }
        };

        // All-blank output (a scanned document, say) is not an error:
        // the job completes with zero chunks.
        debug!(pages = pages.len(), "Extracted pdf pages");
        Ok(pages)
    }
}

fn extract_raw_pages(bytes: &[u8]) -> Result<Vec<PageText>, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let mut pages = Vec::new();
    for (page_number, _) in document.get_pages() {
        // Pages that fail individually are kept blank so numbering
        // stays aligned with the source document.
        let raw = match document.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = page_number, error = %e, "Could not extract page text");
                String::new()
            }
        };
        pages.push(PageText::new(page_number, sanitize_page_text(&raw)));
    }

    if pages.is_empty() {
        return Err(ExtractionError::Malformed("document has no pages".to_string()));
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use lopdf::{Object, dictionary};
    use uuid::Uuid;

    use super::*;

    fn sample_upload(file_name: &str) -> Upload {
        Upload::new(
            file_name.to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "carbon_documents".to_string(),
        )
    }

    // One-page PDF with no content stream, like a scan without an OCR
    // layer.
    fn pdf_without_text() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test]
    async fn given_pdf_without_text_when_extracting_then_blank_pages_come_back() {
        let upload = sample_upload("scan.pdf");

        let pages = PdfExtractor::new()
            .extract_pages(&pdf_without_text(), &upload)
            .await
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages.iter().all(PageText::is_blank));
    }

    #[tokio::test]
    async fn given_unparseable_bytes_when_extracting_then_document_is_rejected() {
        let upload = sample_upload("corrupt.pdf");

        let result = PdfExtractor::new()
            .extract_pages(b"not a pdf at all", &upload)
            .await;

        assert!(matches!(result, Err(ExtractionError::Malformed(_))));
    }
}
