use crate::constants::{
    BYTES_PER_MB, DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_BODY_LIMIT_MB, DEFAULT_HOST,
    DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_PORT, DEFAULT_PREVIEW_CHARS, DEFAULT_STORAGE_DIR,
    SERVERLESS_ENV_VAR, SERVERLESS_STORAGE_DIR, STORAGE_DIR_ENV_VAR,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Limits and storage used by the upload pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: u64,
}

fn default_max_file_size_mb() -> u64 {
    DEFAULT_MAX_FILE_SIZE_MB
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

fn default_allowed_extensions() -> Vec<String> {
    DEFAULT_ALLOWED_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_storage_dir() -> String {
    DEFAULT_STORAGE_DIR.to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_body_limit_mb() -> u64 {
    DEFAULT_BODY_LIMIT_MB
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            preview_chars: default_preview_chars(),
            allowed_extensions: default_allowed_extensions(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_mb: default_body_limit_mb(),
        }
    }
}

impl UploadConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Storage directory with `~` expanded
    pub fn storage_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.storage_dir).into_owned())
    }
}

impl ServerConfig {
    pub fn body_limit_bytes(&self) -> usize {
        usize::try_from(self.body_limit_mb.saturating_mul(BYTES_PER_MB)).unwrap_or(usize::MAX)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.normalized()
    }

    /// Load configuration from default location or return defaults
    ///
    /// Environment overrides for the storage directory are applied last.
    pub fn load() -> Result<Self> {
        let default_paths = [
            PathBuf::from("config/settings.toml"),
            PathBuf::from(shellexpand::tilde("~/.config/cvdrop/settings.toml").into_owned()),
        ];

        let mut config = Self::default();
        for path in &default_paths {
            if path.exists() {
                config = Self::from_file(path)?;
                break;
            }
        }

        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply storage overrides from the environment
    ///
    /// An explicit storage directory wins; otherwise a serverless platform
    /// forces ephemeral `/tmp` storage.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(STORAGE_DIR_ENV_VAR).filter(|d| !d.is_empty()) {
            self.upload.storage_dir = dir;
        } else if lookup(SERVERLESS_ENV_VAR).is_some() {
            self.upload.storage_dir = SERVERLESS_STORAGE_DIR.to_string();
        }
        self
    }

    fn normalized(mut self) -> Result<Self> {
        if self.upload.max_file_size_mb == 0 {
            bail!("upload.max_file_size_mb must be greater than zero");
        }
        if self.upload.allowed_extensions.is_empty() {
            bail!("upload.allowed_extensions must not be empty");
        }
        self.upload.allowed_extensions = self
            .upload
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        Ok(self)
    }
}
