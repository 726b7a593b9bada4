use crate::error::PipelineError;
use crate::file::TextExtractor;
use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// PDF text extractor
///
/// Text is read page by page with lopdf. When no page yields anything,
/// pdf-extract gets a second look at the whole document before the file is
/// reported as unreadable.
#[derive(Debug, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Concatenate the text of every page, one newline after each non-empty page
    fn page_text(doc: &Document) -> String {
        let mut text_content = String::new();

        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    let page_text = page_text.trim_end();
                    if !page_text.trim().is_empty() {
                        text_content.push_str(page_text);
                        text_content.push('\n');
                    }
                }
                Err(e) => {
                    debug!(page = page_num, error = %e, "no extractable text on page");
                }
            }
        }

        text_content
    }

    /// Whole-document extraction with pdf-extract; failures count as no text
    fn fallback_text(bytes: &[u8]) -> String {
        // pdf-extract panics on some malformed font tables
        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                debug!(error = %e, "pdf-extract fallback failed");
                String::new()
            }
            Err(_) => {
                debug!("pdf-extract fallback panicked");
                String::new()
            }
        }
    }
}

impl TextExtractor for PdfExtractor {
    fn extract_bytes(&self, bytes: &[u8]) -> Result<String, PipelineError> {
        let doc = Document::load_mem(bytes).map_err(PipelineError::pdf_processing)?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PipelineError::corrupted_pdf());
        }

        let mut text = Self::page_text(&doc);
        if text.trim().is_empty() {
            text = Self::fallback_text(bytes);
        }

        if text.trim().is_empty() {
            return Err(PipelineError::unreadable_pdf());
        }

        debug!(pages = page_count, chars = text.len(), "extracted PDF text");
        Ok(text)
    }

    fn processing_error(&self, detail: String) -> PipelineError {
        PipelineError::pdf_processing(detail)
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}
