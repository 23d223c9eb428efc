//! Error types for the ladle pipeline.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application, including configuration, I/O, LLM, catalog, corpus,
//! prompt, and pipeline errors.

use thiserror::Error;

/// Unified error type for the ladle pipeline.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing credentials, bad YAML)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reasoning-service (LLM) errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Remote recipe catalog errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Corpus index and retrieval errors
    #[error("Corpus error: {0}")]
    Corpus(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Pipeline orchestration errors
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
