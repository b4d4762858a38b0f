//! Configuration management for the transcription pipeline
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (`KATHA_` prefix, `__` separator)
//! - Built-in defaults (every option has one)

pub mod settings;

pub use settings::{
    load_settings, DenoiseSettings, DenoiseStrength, DomainMode, EngineSettings, FusionSettings,
    QuoteSettings, RetrySettings, ScriptSettings, Settings, UnicodeForm, VadSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
