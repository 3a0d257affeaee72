//! Runtime configuration.
//!
//! Layers, lowest to highest: compiled defaults, an optional TOML file, then
//! environment variables (a `.env` file in the working directory is loaded
//! first).

use crate::content::DEFAULT_STORAGE_KEY;
use crate::ingest::DEFAULT_MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
    pub generator: GeneratorConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot file. `None` keeps content in memory
    /// only.
    pub data_dir: Option<PathBuf>,
    pub key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct IngestConfig {
    pub max_upload_bytes: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AdminConfig {
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `lkc_cms_lib=debug`.
    pub filter: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from("data")),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-image".to_string(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            password: "admin123".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from `lookup` (the environment in production).
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup("LKC_DATA_DIR") {
            self.storage.data_dir = match dir.trim() {
                "" | ":memory:" => None,
                dir => Some(PathBuf::from(dir)),
            };
        }
        if let Some(key) = lookup("LKC_STORAGE_KEY") {
            self.storage.key = key;
        }
        if let Some(raw) = lookup("LKC_MAX_UPLOAD_BYTES") {
            self.ingest.max_upload_bytes = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "LKC_MAX_UPLOAD_BYTES",
                value: raw.clone(),
            })?;
        }
        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("API_KEY")) {
            self.generator.api_key = key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.generator.model = model;
        }
        if let Some(url) = lookup("GEMINI_API_URL") {
            self.generator.api_url = url;
        }
        if let Some(password) = lookup("LKC_ADMIN_PASSWORD") {
            self.admin.password = password;
        }
        if let Some(filter) = lookup("LKC_LOG") {
            self.logging.filter = filter;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage key must not be empty".into()));
        }
        if self.ingest.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("max_upload_bytes must be positive".into()));
        }
        if self.admin.password.is_empty() {
            return Err(ConfigError::Invalid("admin password must not be empty".into()));
        }
        Ok(())
    }
}

/// Check that the variables image generation needs are set.
///
/// # Required Environment Variables
/// - `GEMINI_API_KEY` (or `API_KEY`): key for the image service
pub fn validate_environment() -> Result<(), String> {
    let has_key = ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .any(|var| std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false));

    if has_key {
        Ok(())
    } else {
        Err("Missing required environment variables: GEMINI_API_KEY (or API_KEY)".to_string())
    }
}
