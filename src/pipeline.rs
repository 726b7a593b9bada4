use crate::config::UploadConfig;
use crate::error::PipelineError;
use crate::file::{DocumentSource, ExtractorFactory};
use crate::models::{UploadOutcome, UploadedFile};
use crate::storage::FileStore;
use crate::utils::{extension_of, sanitize_filename, truncate_preview};
use crate::validator::FormatValidator;
use std::fmt;
use tracing::{debug, info};

/// Progress of one upload through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    ExtensionChecked,
    SizeChecked,
    Extracted,
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::ExtensionChecked => "extension_checked",
            Self::SizeChecked => "size_checked",
            Self::Extracted => "extracted",
            Self::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Upload orchestrator: validation, extraction, best-effort storage
///
/// Stages run strictly in order and the first failure is returned unchanged.
/// Only storage failures are absorbed, the outcome then carries a
/// `temporary-` placeholder path instead.
pub struct UploadPipeline {
    validator: FormatValidator,
    factory: ExtractorFactory,
    store: FileStore,
    preview_chars: usize,
}

impl UploadPipeline {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            validator: FormatValidator::new(config),
            factory: ExtractorFactory::new(config.allowed_extensions.clone()),
            store: FileStore::new(config.storage_path()),
            preview_chars: config.preview_chars,
        }
    }

    /// Run the pipeline over an uploaded file
    pub fn process<R: DocumentSource>(
        &self,
        file: &mut UploadedFile<R>,
    ) -> Result<UploadOutcome, PipelineError> {
        let filename = file.filename().to_string();
        self.process_source(file.source(), &filename)
    }

    /// Run the pipeline over a raw source and its declared filename
    pub fn process_source(
        &self,
        source: &mut dyn DocumentSource,
        filename: &str,
    ) -> Result<UploadOutcome, PipelineError> {
        let mut stage = Stage::Start;
        let result = self.run(source, filename, &mut stage);

        if let Err(e) = &result {
            debug!(filename, stage = %stage, code = %e.code(), "upload rejected");
        }
        result
    }

    fn run(
        &self,
        source: &mut dyn DocumentSource,
        filename: &str,
        stage: &mut Stage,
    ) -> Result<UploadOutcome, PipelineError> {
        if !self.validator.validate_extension(filename) {
            return Err(PipelineError::invalid_file_type(
                filename,
                self.validator.allowed_extensions(),
            ));
        }
        *stage = Stage::ExtensionChecked;

        let size_bytes = self.validator.validate_size(source)?;
        *stage = Stage::SizeChecked;

        let file_type = extension_of(filename).unwrap_or_default();
        let content = self.factory.extract(source, filename)?;
        *stage = Stage::Extracted;

        let safe_name = sanitize_filename(filename);
        let full_path = self.store.save_or_placeholder(source, &safe_name);
        *stage = Stage::Persisted;

        info!(
            filename = %safe_name,
            file_type = %file_type,
            size_bytes,
            chars = content.chars().count(),
            "processed upload"
        );

        Ok(UploadOutcome::new(
            safe_name,
            size_bytes,
            truncate_preview(&content, self.preview_chars),
            file_type,
            full_path,
        ))
    }
}
