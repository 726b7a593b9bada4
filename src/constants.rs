/// Constants used throughout cvdrop
/// This module centralizes defaults and fixed values of the upload pipeline

/// Extensions accepted by default (lowercase, without the dot)
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Default maximum upload size in MiB
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 10;

/// Default number of characters returned as content preview
pub const DEFAULT_PREVIEW_CHARS: usize = 5000;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Local storage directory used outside serverless environments
pub const DEFAULT_STORAGE_DIR: &str = ".uploads";

/// Ephemeral storage used when running on a serverless platform
pub const SERVERLESS_STORAGE_DIR: &str = "/tmp";

/// Environment variable set by the serverless platform
pub const SERVERLESS_ENV_VAR: &str = "VERCEL";

/// Environment variable that overrides the storage directory
pub const STORAGE_DIR_ENV_VAR: &str = "CVDROP_STORAGE_DIR";

/// Prefix of the placeholder path returned when the upload could not be stored
pub const TEMPORARY_PATH_PREFIX: &str = "temporary-";

/// Main document part inside a DOCX package
pub const DOCX_DOCUMENT_PART: &str = "word/document.xml";

/// Multipart form field carrying the upload
pub const UPLOAD_FIELD_NAME: &str = "file";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;

/// Request body cap; kept above the file cap so oversized files reach the validator
pub const DEFAULT_BODY_LIMIT_MB: u64 = 32;

pub const DEFAULT_LOG_FILTER: &str = "cvdrop=info,tower_http=info";
