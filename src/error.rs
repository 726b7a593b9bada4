use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Structured error details attached to every [`PipelineError`].
pub type Details = Map<String, Value>;

/// Closed set of failure kinds an upload can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    MissingFile,
    InvalidFileType,
    EmptyFile,
    FileTooLarge,
    CorruptedFile,
    UnreadablePdf,
    PdfProcessingError,
    DocxProcessingError,
    UnsupportedFormat,
    ServerError,
}

impl ErrorCode {
    /// Stable machine-readable identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::InvalidFileType => "invalid_file_type",
            Self::EmptyFile => "empty_file",
            Self::FileTooLarge => "file_too_large",
            Self::CorruptedFile => "corrupted_file",
            Self::UnreadablePdf => "unreadable_pdf",
            Self::PdfProcessingError => "pdf_processing_error",
            Self::DocxProcessingError => "docx_processing_error",
            Self::UnsupportedFormat => "unsupported_format",
            Self::ServerError => "server_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed upload: code, human message, and structured details.
///
/// Every stage of the pipeline returns this one type, so a caller can map
/// any failure to a response without inspecting where it came from.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code}: {message}")]
pub struct PipelineError {
    code: ErrorCode,
    message: String,
    details: Details,
}

impl PipelineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Details::new(),
        }
    }

    /// Attach one detail field
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn missing_file(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingFile, message)
    }

    pub fn invalid_file_type(filename: &str, supported_formats: &[String]) -> Self {
        Self::new(
            ErrorCode::InvalidFileType,
            "File type not supported. Please upload a PDF, DOCX, or DOC file.",
        )
        .with_detail("uploaded_filename", filename)
        .with_detail("supported_formats", supported_formats.to_vec())
    }

    pub fn empty_file() -> Self {
        Self::new(ErrorCode::EmptyFile, "The uploaded file is empty").with_detail("file_size_bytes", 0)
    }

    pub fn file_too_large(max_size_mb: u64, file_size_mb: f64) -> Self {
        Self::new(
            ErrorCode::FileTooLarge,
            format!("File size exceeds maximum limit of {}MB", max_size_mb),
        )
        .with_detail("max_size_mb", max_size_mb)
        .with_detail("file_size_mb", file_size_mb)
    }

    pub fn corrupted_pdf() -> Self {
        Self::new(ErrorCode::CorruptedFile, "PDF file appears to be corrupted or empty")
            .with_detail("file_type", "pdf")
    }

    pub fn unreadable_pdf() -> Self {
        Self::new(
            ErrorCode::UnreadablePdf,
            "PDF file could not be processed. It may be image-based or corrupted.",
        )
        .with_detail("file_type", "pdf")
    }

    pub fn pdf_processing(detail: impl fmt::Display) -> Self {
        Self::new(ErrorCode::PdfProcessingError, "Failed to process PDF file")
            .with_detail("file_type", "pdf")
            .with_detail("error_detail", detail.to_string())
    }

    pub fn corrupted_docx() -> Self {
        Self::new(ErrorCode::CorruptedFile, "DOCX file appears to be empty or corrupted")
            .with_detail("file_type", "docx")
    }

    /// A structurally valid DOCX whose paragraphs and tables hold no text
    pub fn empty_docx() -> Self {
        Self::new(ErrorCode::EmptyFile, "DOCX file contains no readable text")
            .with_detail("file_type", "docx")
    }

    pub fn docx_processing(detail: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DocxProcessingError, "Failed to process DOCX file")
            .with_detail("file_type", "docx")
            .with_detail("error_detail", detail.to_string())
    }

    pub fn legacy_doc() -> Self {
        Self::new(
            ErrorCode::UnsupportedFormat,
            "Legacy DOC format is not fully supported. Please use DOCX instead.",
        )
        .with_detail("file_type", "doc")
        .with_detail("suggestion", "Convert to DOCX and try again")
    }

    pub fn unsupported_format(extension: &str, supported_formats: &[String]) -> Self {
        Self::new(
            ErrorCode::UnsupportedFormat,
            format!("File format \".{}\" is not supported", extension),
        )
        .with_detail("uploaded_format", extension)
        .with_detail("supported_formats", supported_formats.to_vec())
    }

    pub fn server_error(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ServerError,
            "An unexpected error occurred while processing your CV",
        )
        .with_detail("error_detail", detail.to_string())
    }
}
