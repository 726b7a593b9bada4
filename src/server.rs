use crate::config::UploadConfig;
use crate::constants::UPLOAD_FIELD_NAME;
use crate::error::{ErrorCode, PipelineError};
use crate::models::{UploadOutcome, UploadedFile};
use crate::pipeline::UploadPipeline;
use crate::response::{upload_success, ErrorBody, SuccessBody};
use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

const NO_FILE_MESSAGE: &str = "No file provided. Please upload a CV file.";
const NO_SELECTION_MESSAGE: &str = "No file selected. Please choose a CV file to upload.";

/// Shared state accessible from all handlers
pub struct AppState {
    pipeline: UploadPipeline,
    max_file_size_mb: u64,
}

impl AppState {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            pipeline: UploadPipeline::new(config),
            max_file_size_mb: config.max_file_size_mb,
        }
    }
}

/// HTTP status for each failure kind
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::CorruptedFile | ErrorCode::UnreadablePdf => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (status_for(self.code()), Json(ErrorBody::from(&self))).into_response()
    }
}

/// Build the API router
///
/// `body_limit_bytes` caps the whole request and should sit above the file
/// size limit, so oversized files are diagnosed by the validator.
pub fn router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    let upload: MethodRouter<Arc<AppState>> = post(analyze_cv)
        .options(preflight)
        .fallback(upload_method_not_allowed);

    Router::new()
        .route("/api/analyze_cv", upload.clone())
        .route("/api/upload-cv", upload)
        .route(
            "/api/health",
            get(health).fallback(health_method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn analyze_cv(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match handle_upload(state, multipart).await {
        Ok(outcome) => (StatusCode::OK, Json(upload_success(&outcome))).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn handle_upload(
    state: Arc<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadOutcome, PipelineError> {
    let multipart = multipart.map_err(|e| {
        debug!(error = %e, "request is not a multipart upload");
        PipelineError::missing_file(NO_FILE_MESSAGE).with_detail("error_detail", e.to_string())
    })?;

    let (filename, data) = read_file_field(multipart, state.max_file_size_mb).await?;

    // Extraction is blocking parser work
    let outcome = tokio::task::spawn_blocking(move || {
        let mut file = UploadedFile::new(filename, Cursor::new(data));
        state.pipeline.process(&mut file)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "upload processing task failed");
        PipelineError::server_error(e)
    })??;

    Ok(outcome)
}

/// Pull the `file` field's name and bytes out of the form
async fn read_file_field(
    mut multipart: Multipart,
    max_file_size_mb: u64,
) -> Result<(String, Bytes), PipelineError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size_mb))?
    {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(PipelineError::missing_file(NO_SELECTION_MESSAGE));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_file_size_mb))?;
        return Ok((filename, data));
    }

    Err(PipelineError::missing_file(NO_FILE_MESSAGE))
}

fn multipart_error(err: MultipartError, max_file_size_mb: u64) -> PipelineError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return PipelineError::new(
            ErrorCode::FileTooLarge,
            format!("File size exceeds maximum limit of {}MB", max_file_size_mb),
        )
        .with_detail("max_size_mb", max_file_size_mb);
    }

    debug!(error = %err.body_text(), "malformed multipart body");
    PipelineError::missing_file(NO_FILE_MESSAGE).with_detail("error_detail", err.body_text())
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn method_not_allowed(allowed: &str) -> Response {
    let body = ErrorBody::new(
        "method_not_allowed",
        format!("Method not allowed. Use {}.", allowed),
    );
    (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response()
}

async fn upload_method_not_allowed() -> Response {
    method_not_allowed("POST")
}

async fn health_method_not_allowed() -> Response {
    method_not_allowed("GET")
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
}

async fn health() -> Json<SuccessBody<HealthData>> {
    Json(SuccessBody::new(
        "Backend is running",
        HealthData { status: "healthy" },
    ))
}
