//! Ladle Core Library
//!
//! This crate provides the foundational utilities for the ladle pipeline:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Shared domain types (`RecipeCandidate`, `Origin`)

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use types::{Origin, RecipeCandidate};
