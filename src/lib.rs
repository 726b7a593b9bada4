pub mod config;
pub mod constants;
pub mod error;
pub mod file;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod response;
pub mod server;
pub mod storage;
pub mod utils;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{ErrorCode, PipelineError};
pub use models::{UploadOutcome, UploadedFile};
pub use pipeline::UploadPipeline;
