//! Error types for the chat-insights library.
//!
//! Parsing itself never fails on bad input: malformed lines are recorded as
//! [`crate::parser::ParseIssue`]s and skipped. The errors here cover
//! configuration and pipeline construction.

use thiserror::Error;

/// Errors that can occur while configuring or building the analysis pipeline.
#[derive(Error, Debug)]
pub enum ChatAnalysisError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configured timestamp format that chrono cannot interpret
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestampFormat(String),

    /// Regular expression compilation errors
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Layered configuration errors
    #[error("Configuration source error: {0}")]
    Config(#[from] config::ConfigError),

    /// YAML configuration errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with `ChatAnalysisError`
pub type Result<T> = std::result::Result<T, ChatAnalysisError>;

impl From<anyhow::Error> for ChatAnalysisError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
