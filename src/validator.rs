use crate::config::UploadConfig;
use crate::error::PipelineError;
use crate::file::r#trait::{measure_size, DocumentSource};
use crate::utils::{bytes_to_mb, extension_of};

/// Checks an upload's extension and size before any extraction
#[derive(Debug, Clone)]
pub struct FormatValidator {
    allowed_extensions: Vec<String>,
    max_size_mb: u64,
    max_size_bytes: u64,
}

impl FormatValidator {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            allowed_extensions: config.allowed_extensions.clone(),
            max_size_mb: config.max_file_size_mb,
            max_size_bytes: config.max_file_size_bytes(),
        }
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// True iff the filename has an extension in the allow-list
    pub fn validate_extension(&self, filename: &str) -> bool {
        extension_of(filename)
            .map(|ext| self.allowed_extensions.iter().any(|allowed| *allowed == ext))
            .unwrap_or(false)
    }

    /// Measure the source and reject empty or oversized uploads
    ///
    /// Returns the size in bytes. The read position is back at byte 0 afterwards.
    pub fn validate_size(&self, source: &mut dyn DocumentSource) -> Result<u64, PipelineError> {
        let size = measure_size(source).map_err(PipelineError::server_error)?;

        if size == 0 {
            return Err(PipelineError::empty_file());
        }

        if size > self.max_size_bytes {
            return Err(PipelineError::file_too_large(self.max_size_mb, bytes_to_mb(size)));
        }

        Ok(size)
    }
}

impl Default for FormatValidator {
    fn default() -> Self {
        Self::new(&UploadConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BYTES_PER_MB;
    use crate::error::ErrorCode;
    use serde_json::json;
    use std::io::{Cursor, Seek};

    #[test]
    fn test_allowed_extensions() {
        let validator = FormatValidator::default();
        assert!(validator.validate_extension("resume.pdf"));
        assert!(validator.validate_extension("resume.DOCX"));
        assert!(validator.validate_extension("old.resume.doc"));
    }

    #[test]
    fn test_rejected_extensions() {
        let validator = FormatValidator::default();
        for name in ["notes.txt", "resume", "resume.", "pdf", "image.png", "resume.pdf.exe"] {
            assert!(!validator.validate_extension(name), "{} should be rejected", name);
        }
    }

    #[test]
    fn test_custom_allow_list() {
        let config = UploadConfig {
            allowed_extensions: vec!["pdf".to_string()],
            ..UploadConfig::default()
        };
        let validator = FormatValidator::new(&config);
        assert!(validator.validate_extension("cv.pdf"));
        assert!(!validator.validate_extension("cv.docx"));
    }

    #[test]
    fn test_empty_file() {
        let mut source = Cursor::new(Vec::new());
        let err = FormatValidator::default().validate_size(&mut source).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyFile);
        assert_eq!(err.details()["file_size_bytes"], json!(0));
    }

    #[test]
    fn test_file_too_large() {
        let size = 15 * BYTES_PER_MB + 300_000;
        let mut source = Cursor::new(vec![0u8; size as usize]);
        let err = FormatValidator::default().validate_size(&mut source).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileTooLarge);
        assert_eq!(err.details()["max_size_mb"], json!(10));
        assert_eq!(err.details()["file_size_mb"], json!(15.29));
    }

    #[test]
    fn test_exact_limit_accepted() {
        let mut source = Cursor::new(vec![1u8; (10 * BYTES_PER_MB) as usize]);
        let size = FormatValidator::default().validate_size(&mut source).unwrap();
        assert_eq!(size, 10 * BYTES_PER_MB);
    }

    #[test]
    fn test_size_check_rewinds() {
        let mut source = Cursor::new(vec![1u8; 64]);
        source.seek(std::io::SeekFrom::Start(10)).unwrap();

        assert_eq!(FormatValidator::default().validate_size(&mut source).unwrap(), 64);
        assert_eq!(source.position(), 0);
    }
}
