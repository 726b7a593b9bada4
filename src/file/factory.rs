use crate::constants::DEFAULT_ALLOWED_EXTENSIONS;
use crate::error::PipelineError;
use crate::file::types::{DocxExtractor, PdfExtractor};
use crate::file::{DocumentSource, TextExtractor};
use crate::utils::extension_of;
use std::sync::Arc;
use tracing::debug;

/// Factory routing an upload to the extractor for its extension
pub struct ExtractorFactory {
    supported_formats: Vec<String>,
}

impl ExtractorFactory {
    /// `supported_formats` is what error details report as accepted
    pub fn new(supported_formats: Vec<String>) -> Self {
        Self { supported_formats }
    }

    /// Create the extractor for a lowercase extension
    ///
    /// Legacy DOC is recognised but never parsed.
    pub fn create(&self, extension: &str) -> Result<Arc<dyn TextExtractor>, PipelineError> {
        match extension {
            "pdf" => Ok(Arc::new(PdfExtractor::new())),
            "docx" => Ok(Arc::new(DocxExtractor::new())),
            "doc" => Err(PipelineError::legacy_doc()),
            other => Err(PipelineError::unsupported_format(
                other,
                &self.supported_formats,
            )),
        }
    }

    /// Extract text from a source, choosing the extractor from `filename`
    ///
    /// The extension is derived here again rather than trusted from the caller.
    pub fn extract(
        &self,
        source: &mut dyn DocumentSource,
        filename: &str,
    ) -> Result<String, PipelineError> {
        let extension = extension_of(filename).unwrap_or_default();
        let extractor = self.create(&extension)?;
        debug!(extractor = extractor.extension(), "dispatching extraction");
        extractor.extract(source)
    }
}

impl Default for ExtractorFactory {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect())
    }
}
