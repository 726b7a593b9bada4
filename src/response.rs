use crate::error::{Details, PipelineError};
use crate::models::UploadOutcome;
use serde::Serialize;

/// `{success: true, message, data}` envelope
#[derive(Debug, Serialize)]
pub struct SuccessBody<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> SuccessBody<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// `{success: false, error_code, message, details}` envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error_code: String,
    pub message: String,
    pub details: Details,
}

impl ErrorBody {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_code: error_code.into(),
            message: message.into(),
            details: Details::new(),
        }
    }
}

impl From<&PipelineError> for ErrorBody {
    fn from(err: &PipelineError) -> Self {
        Self {
            success: false,
            error_code: err.code().as_str().to_string(),
            message: err.message().to_string(),
            details: err.details().clone(),
        }
    }
}

/// Upload summary returned to clients
#[derive(Debug, Serialize)]
pub struct UploadData {
    pub filename: String,
    pub file_size_mb: f64,
    pub file_type: String,
    pub content_preview: String,
    pub full_path: String,
}

impl From<&UploadOutcome> for UploadData {
    fn from(outcome: &UploadOutcome) -> Self {
        Self {
            filename: outcome.filename().to_string(),
            file_size_mb: outcome.file_size_mb(),
            file_type: outcome.file_type().to_string(),
            content_preview: outcome.content().to_string(),
            full_path: outcome.full_path().to_string(),
        }
    }
}

/// Success envelope for a processed upload
pub fn upload_success(outcome: &UploadOutcome) -> SuccessBody<UploadData> {
    SuccessBody::new(
        format!("CV '{}' uploaded successfully", outcome.filename()),
        UploadData::from(outcome),
    )
}
