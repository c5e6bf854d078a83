//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load environment variables: {0}")]
    EnvLoad(#[from] dotenvy::Error),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directive string for the env filter when RUST_LOG is not set
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,modelsync=debug".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Model and schema-build configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model document to synchronize from, if any
    pub model_file: Option<PathBuf>,
    /// Node type the option groups extend
    pub base_node: String,
    /// Composite type names accepted as option groups
    pub editor_pattern: Regex,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_file: None,
            base_node: "ListView".to_string(),
            editor_pattern: Regex::new("Options").expect("default editor pattern is valid"),
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub model: ModelConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists; a malformed file is still an error
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue(format!(
                    "LOG_FORMAT must be 'compact' or 'json', got '{}'",
                    other
                )))
            }
        };

        let logging = LoggingConfig {
            filter: lookup("MODELSYNC_LOG").unwrap_or(defaults.logging.filter),
            format,
        };

        let base_node = lookup("MODELSYNC_BASE_NODE")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.model.base_node);
        if base_node.is_empty() {
            return Err(ConfigError::InvalidValue(
                "MODELSYNC_BASE_NODE must not be empty".to_string(),
            ));
        }

        let editor_pattern = match lookup("MODELSYNC_EDITOR_PATTERN") {
            Some(pattern) => Regex::new(&pattern).map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid MODELSYNC_EDITOR_PATTERN: {}", e))
            })?,
            None => defaults.model.editor_pattern,
        };

        let model = ModelConfig {
            model_file: lookup("MODELSYNC_MODEL_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            base_node,
            editor_pattern,
        };

        Ok(Self { logging, model })
    }
}
